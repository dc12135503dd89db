// # Address Store Trait
//
// Defines the interface to the durable record of resolved addresses.
//
// ## Purpose
//
// The store is the baseline for change detection: the address of the most
// recent record is the address currently written into the ACL. Records are
// only ever appended, never updated or deleted.
//
// ## Implementations
//
// - SQL: `bindan-store-sql` crate (table `bindAN_knownIPs`)
// - In-memory: [`crate::state::MemoryAddressStore`]

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One recorded address
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AddressRecord {
    /// The resolved address, exactly as the resolver returned it
    pub address: String,
    /// When the record was appended
    pub recorded_at: DateTime<Utc>,
}

impl AddressRecord {
    /// Create a record stamped with the current time
    pub fn new(address: impl Into<String>) -> Self {
        Self::at(address, Utc::now())
    }

    /// Create a record with an explicit timestamp
    pub fn at(address: impl Into<String>, recorded_at: DateTime<Utc>) -> Self {
        Self {
            address: address.into(),
            recorded_at,
        }
    }
}

/// Trait for address store implementations
///
/// A store is opened once per process and released with [`AddressStore::close`]
/// on every exit path. The engine is the only caller.
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Get the address of the most recent record
    ///
    /// # Returns
    ///
    /// - `Ok(Some(address))`: The address with the latest timestamp
    /// - `Ok(None)`: The store holds no records
    /// - `Err(Error::StoreRead)`: The query failed
    async fn last_address(&self) -> Result<Option<String>, crate::Error>;

    /// Append a new record for `address`, timestamped by the store
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Exactly one record was added
    /// - `Err(Error::StoreWrite)`: The insert failed
    async fn append_address(&self, address: &str) -> Result<(), crate::Error>;

    /// Release the underlying connection
    ///
    /// Must be safe to call more than once.
    async fn close(&self) -> Result<(), crate::Error>;
}
