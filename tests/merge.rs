mod common {
    use std::io::Write;

    pub fn init() {
        let _ = env_logger::builder()
            .format(|buf, record| writeln!(buf, "{}", record.args()))
            .is_test(true)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::net::IpAddr;

    use netmask::config::MergeMode;
    use netmask::errors::NetmaskError;
    use netmask::{af, Family, NetTree, U128};

    fn pfx(
        mode: MergeMode,
        addr: &str,
        len: u8,
    ) -> Result<NetTree, Box<dyn Error>> {
        let mut tree = NetTree::with_mode(mode);
        tree.insert(NetTree::from_addr(addr.parse()?, len)?);
        Ok(tree)
    }

    fn blocks(tree: &NetTree) -> Vec<String> {
        tree.iter().map(|c| c.to_string()).collect()
    }

    netmask::both_merge_modes![
        test_sibling_halves;
        sibling_halves
    ];

    fn sibling_halves(mode: MergeMode) -> Result<(), Box<dyn Error>> {
        crate::common::init();

        let merged =
            pfx(mode, "10.0.0.0", 25)?.merge(pfx(mode, "10.0.0.128", 25)?);
        assert_eq!(blocks(&merged), vec!["10.0.0.0/24"]);
        assert_eq!(merged.family(), Some(Family::V4));
        merged.check()?;
        Ok(())
    }

    netmask::both_merge_modes![
        test_collapse_cascades_up;
        collapse_cascades_up
    ];

    fn collapse_cascades_up(mode: MergeMode) -> Result<(), Box<dyn Error>> {
        crate::common::init();

        // Four /26s arriving out of order end up as a single /24.
        let mut tree = NetTree::with_mode(mode);
        for addr in ["10.0.0.192", "10.0.0.0", "10.0.0.128", "10.0.0.64"] {
            tree.insert(pfx(mode, addr, 26)?);
        }
        assert_eq!(blocks(&tree), vec!["10.0.0.0/24"]);

        // Two /25s under a /24 neighbour: 10.0.1.0/24 makes a /23.
        tree.insert(pfx(mode, "10.0.1.0", 25)?);
        tree.insert(pfx(mode, "10.0.1.128", 25)?);
        assert_eq!(blocks(&tree), vec!["10.0.0.0/23"]);
        tree.check()?;
        Ok(())
    }

    netmask::both_merge_modes![
        test_covered_blocks_vanish;
        covered_blocks_vanish
    ];

    fn covered_blocks_vanish(mode: MergeMode) -> Result<(), Box<dyn Error>> {
        crate::common::init();

        let tree = pfx(mode, "10.1.2.0", 24)?
            .merge(pfx(mode, "10.1.2.77", 32)?)
            .merge(pfx(mode, "10.0.0.0", 8)?)
            .merge(pfx(mode, "10.200.0.0", 16)?);
        assert_eq!(blocks(&tree), vec!["10.0.0.0/8"]);

        // The same, the other way round.
        let tree = pfx(mode, "10.0.0.0", 8)?
            .merge(pfx(mode, "10.1.2.0", 24)?)
            .merge(pfx(mode, "10.1.2.77", 32)?);
        assert_eq!(blocks(&tree), vec!["10.0.0.0/8"]);
        Ok(())
    }

    netmask::both_merge_modes![
        test_v6_absorbs_family;
        v6_absorbs_family
    ];

    fn v6_absorbs_family(mode: MergeMode) -> Result<(), Box<dyn Error>> {
        crate::common::init();

        let v4_all = pfx(mode, "0.0.0.0", 0)?;
        assert_eq!(v4_all.family(), Some(Family::V4));
        let merged = v4_all.merge(pfx(mode, "::1", 128)?);
        assert_eq!(merged.family(), Some(Family::V6));

        // Leaves keep their own tag, so the IPv4 block still prints as one.
        assert_eq!(blocks(&merged), vec!["::1/128", "0.0.0.0/0"]);
        Ok(())
    }

    netmask::both_merge_modes![
        test_family_never_reverts;
        family_never_reverts
    ];

    fn family_never_reverts(mode: MergeMode) -> Result<(), Box<dyn Error>> {
        crate::common::init();

        // An IPv6-tagged half and an IPv4 half of the same /24 aggregate
        // into a block that is shown as IPv6.
        let merged = pfx(mode, "::ffff:10.0.0.0", 121)?
            .merge(pfx(mode, "10.0.0.128", 25)?);
        let shown: Vec<_> =
            merged.iter().map(|c| (c.to_string(), c.family())).collect();
        assert_eq!(
            shown,
            vec![("::ffff:10.0.0.0/120".to_string(), Family::V6)]
        );
        assert_eq!(merged.family(), Some(Family::V6));

        // Adding more IPv4 next to it does not turn it back.
        let merged = merged.merge(pfx(mode, "10.0.1.0", 24)?);
        let shown: Vec<_> =
            merged.iter().map(|c| (c.to_string(), c.family())).collect();
        assert_eq!(
            shown,
            vec![("::ffff:10.0.0.0/119".to_string(), Family::V6)]
        );
        assert_eq!(merged.family(), Some(Family::V6));
        merged.check()?;
        Ok(())
    }

    #[test]
    fn test_leaf_length_limit() {
        crate::common::init();

        assert_eq!(
            NetTree::leaf(U128::ONE, 129, Family::V6).err(),
            Some(NetmaskError::PrefixLengthInvalid)
        );
        assert_eq!(
            NetTree::from_addr(IpAddr::from([10, 0, 0, 0]), 33).err(),
            Some(NetmaskError::PrefixLengthInvalid)
        );
        assert!(NetTree::leaf(U128::MAX, 128, Family::V6).is_ok());
    }

    #[test]
    fn test_leaf_is_truncated() -> Result<(), Box<dyn Error>> {
        crate::common::init();

        let tree = NetTree::from_addr("192.168.1.77".parse()?, 24)?;
        assert_eq!(blocks(&tree), vec!["192.168.1.0/24"]);
        Ok(())
    }

    netmask::both_merge_modes![
        test_walk_is_ascending;
        walk_is_ascending
    ];

    fn walk_is_ascending(mode: MergeMode) -> Result<(), Box<dyn Error>> {
        crate::common::init();

        let inputs = [("192.168.0.0", 16), ("10.0.0.0", 8), ("172.16.0.0", 12)];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in orders {
            let mut tree = NetTree::with_mode(mode);
            for i in order {
                if let Some((addr, len)) = inputs.get(i) {
                    tree.insert(pfx(mode, addr, *len)?);
                }
            }

            let mut seen = vec![];
            tree.walk(|c| seen.push(*c));
            assert_eq!(
                seen.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
                vec!["10.0.0.0/8", "172.16.0.0/12", "192.168.0.0/16"]
            );
            assert!(seen.windows(2).all(|w| match w {
                [a, b] => a.network() < b.network(),
                _ => false,
            }));
        }
        Ok(())
    }

    #[test]
    fn test_cidr_view_of_mapped_block() -> Result<(), Box<dyn Error>> {
        crate::common::init();

        let tree = NetTree::from_addr("203.0.113.0".parse()?, 24)?;
        let cidr = tree.iter().next().ok_or("empty tree")?;
        assert_eq!(cidr.family(), Family::V4);
        assert_eq!(cidr.prefix_len(), 24);
        assert_eq!(cidr.internal_len(), 120);
        assert_eq!(
            cidr.network(),
            af::v4_to_u128("203.0.113.0".parse()?)
        );
        assert_eq!(cidr.mask_addr().to_string(), "255.255.255.0");

        // A V6-tagged block inside ::ffff:0:0/96 stays V6 on display.
        let tree = NetTree::from_addr("::ffff:203.0.113.0".parse()?, 120)?;
        let cidr = tree.iter().next().ok_or("empty tree")?;
        assert_eq!(cidr.family(), Family::V6);
        assert_eq!(cidr.to_string(), "::ffff:203.0.113.0/120");
        Ok(())
    }

    #[test]
    fn test_empty_tree() {
        crate::common::init();

        let tree = NetTree::new().merge(NetTree::new());
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.iter().count(), 0);
        assert!(tree.check().is_ok());
        assert_eq!(tree.dump().to_string(), "(empty)\n");
    }
}
