//! System resolver
//!
//! Resolves through the operating system (`getaddrinfo`), so `/etc/hosts`
//! and the local resolver configuration apply. IPv4 answers are preferred;
//! an IPv6 answer is only used when the name has no IPv4 address.

use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use tracing::debug;

use crate::Error;
use crate::traits::Resolver;

/// Resolver backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl SystemResolver {
    /// Create a new system resolver
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Resolver for SystemResolver {
    async fn resolve(&self, domain: &str) -> Result<String, Error> {
        // The port is required by the lookup API and otherwise ignored
        let addrs = tokio::net::lookup_host((domain, 0))
            .await
            .map_err(|e| Error::resolution(format!("{}: {}", domain, e)))?;

        let ip = pick_address(addrs)
            .ok_or_else(|| Error::resolution(format!("{}: no addresses returned", domain)))?;

        debug!("Resolved {} to {}", domain, ip);
        Ok(ip.to_string())
    }
}

/// First IPv4 answer, else the first answer of any family
fn pick_address<I>(addrs: I) -> Option<IpAddr>
where
    I: IntoIterator<Item = SocketAddr>,
{
    let mut first = None;
    for addr in addrs {
        if addr.is_ipv4() {
            return Some(addr.ip());
        }
        first.get_or_insert(addr.ip());
    }
    first
}
