// # Service Reloader Trait
//
// Makes the name server re-read its configuration after the ACL changed.

use async_trait::async_trait;

/// Trait for reloading the name-server daemon
#[async_trait]
pub trait ServiceReloader: Send + Sync {
    /// Reload the service and wait for the reload to finish
    ///
    /// Blocks until the reload completes; no timeout is applied.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The reload completed successfully
    /// - `Err(Error::Reload { .. })`: Launch failed, the wait was
    ///   interrupted, or the reload exited unsuccessfully
    async fn reload(&self) -> Result<(), crate::Error>;
}
