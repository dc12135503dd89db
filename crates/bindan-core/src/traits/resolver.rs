// # Resolver Trait
//
// Maps the tracked domain to its current address. One lookup per run,
// no retry and no caching.

use async_trait::async_trait;

/// Trait for name resolution
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolve `domain` to a single address
    ///
    /// # Returns
    ///
    /// - `Ok(address)`: The address in its textual form
    /// - `Err(Error::Resolution)`: The lookup failed or returned nothing
    async fn resolve(&self, domain: &str) -> Result<String, crate::Error>;
}
