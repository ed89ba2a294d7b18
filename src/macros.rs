#[macro_export]
// Generates a test that runs `$test_name` once for every merge mode. The
// strict run panics on the first malformed node, so it doubles as a check
// of the tree invariants for whatever the test builds.
#[doc(hidden)]
macro_rules! both_merge_modes {
    ( $( $fn_name: ident; $test_name: ident ), * ) => {

        $(
            #[test]
            fn $fn_name() -> Result<(), Box<dyn std::error::Error>> {
                //------- Fast

                println!("fast merge starting...");
                $test_name(netmask::config::MergeMode::Fast)?;

                //------- Strict

                println!("strict merge starting...");
                $test_name(netmask::config::MergeMode::Strict)?;

                Ok(())
            }
        )*
    };
}
