pub mod af;
pub(crate) mod cidr;
pub(crate) mod uint128;

pub mod errors;
pub mod test_types;

#[cfg(test)]
mod tests;

pub use af::Family;
pub use cidr::Cidr;
pub use uint128::U128;
