//! Hostname resolution.
//!
//! Parsing hands anything that is not an address literal to a [Resolver].
//! The tree itself never does any I/O.

use std::net::{IpAddr, ToSocketAddrs};

use log::debug;

use crate::types::errors::NetmaskError;

//------------ Resolver (trait) ----------------------------------------------

pub trait Resolver {
    /// All addresses `host` resolves to. An empty answer is an error.
    fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, NetmaskError>;
}

//------------ NoResolver ----------------------------------------------------

/// Refuses every name, for running without DNS.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoResolver;

impl Resolver for NoResolver {
    fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, NetmaskError> {
        Err(NetmaskError::Unresolvable(host.to_string()))
    }
}

//------------ SystemResolver ------------------------------------------------

/// Resolves names through the operating system's resolver.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemResolver;

impl Resolver for SystemResolver {
    fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, NetmaskError> {
        let addrs = (host, 0)
            .to_socket_addrs()
            .map_err(|err| {
                debug!("resolving {}: {}", host, err);
                NetmaskError::Unresolvable(host.to_string())
            })?
            .map(|sa| sa.ip())
            .collect::<Vec<_>>();
        if addrs.is_empty() {
            return Err(NetmaskError::Unresolvable(host.to_string()));
        }
        debug!("{} resolves to {:?}", host, addrs);
        Ok(addrs)
    }
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, NetmaskError> {
        (**self).resolve(host)
    }
}
