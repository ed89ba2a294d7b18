use std::collections::HashMap;
use std::net::IpAddr;

use crate::errors::NetmaskError;
use crate::resolve::Resolver;

//------------ StaticResolver ------------------------------------------------

/// A resolver answering from a fixed table, so tests never touch the
/// network.
#[derive(Clone, Debug, Default)]
pub struct StaticResolver {
    names: HashMap<String, Vec<IpAddr>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table used throughout the tests: `example.com` with one IPv4
    /// address, `ipv6.example.com` with one IPv6 address and
    /// `multi.example.com` with two IPv4 addresses.
    pub fn fixture() -> Self {
        Self::new()
            .with("example.com", &[IpAddr::from([1, 2, 3, 4])])
            .with(
                "ipv6.example.com",
                &[IpAddr::from([
                    0x2600, 0x1406, 0x2e00, 0x4d, 0, 0, 0x172e, 0xd85e,
                ])],
            )
            .with(
                "multi.example.com",
                &[IpAddr::from([192, 0, 2, 1]), IpAddr::from([192, 0, 2, 3])],
            )
    }

    pub fn with(mut self, name: &str, addrs: &[IpAddr]) -> Self {
        self.names.insert(name.to_string(), addrs.to_vec());
        self
    }
}

impl Resolver for StaticResolver {
    fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, NetmaskError> {
        match self.names.get(host) {
            Some(addrs) if !addrs.is_empty() => Ok(addrs.clone()),
            _ => Err(NetmaskError::Unresolvable(host.to_string())),
        }
    }
}
