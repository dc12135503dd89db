// # ACL Writer Trait
//
// Rewrites the address line of the ACL stanza in the name-server
// configuration. The implementation owns the file location and the marker
// line; the engine only supplies the new address.

use async_trait::async_trait;

/// Trait for ACL rewriting
#[async_trait]
pub trait AclWriter: Send + Sync {
    /// Replace the line following the marker with `\t<address>;`
    ///
    /// A missing marker is not an error: the document is written back
    /// unchanged.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: The address line was replaced
    /// - `Ok(false)`: No marker (or nothing after it); file left as it was
    /// - `Err(Error::ConfigIo)`: The file could not be read or written
    async fn rewrite(&self, address: &str) -> Result<bool, crate::Error>;
}
