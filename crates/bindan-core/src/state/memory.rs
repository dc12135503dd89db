// # Memory Address Store
//
// In-memory implementation of AddressStore.
//
// ## Purpose
//
// An append-only list of address records that does not survive the process.
// Useful for embedding bindAN in a long-running program that keeps its own
// baseline, and for tests.
//
// ## Crash Behavior
//
// - All records are lost on exit
// - The next run starts with no baseline and treats any address as changed

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::address_store::{AddressRecord, AddressStore};

/// In-memory address store implementation
///
/// Records are kept in insertion order behind a RwLock.
///
/// # Example
///
/// ```rust,no_run
/// use bindan_core::state::MemoryAddressStore;
/// use bindan_core::traits::AddressStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryAddressStore::new();
///
///     store.append_address("10.0.0.5").await?;
///
///     let last = store.last_address().await?;
///     assert_eq!(last.as_deref(), Some("10.0.0.5"));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAddressStore {
    inner: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<AddressRecord>,
    closed: bool,
}

impl MemoryAddressStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with records
    pub fn with_records(records: impl IntoIterator<Item = AddressRecord>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryState {
                records: records.into_iter().collect(),
                closed: false,
            })),
        }
    }

    /// Get a copy of all records in insertion order
    pub async fn records(&self) -> Vec<AddressRecord> {
        self.inner.read().await.records.clone()
    }

    /// Get the number of records in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }

    /// Whether [`AddressStore::close`] has been called
    pub async fn is_closed(&self) -> bool {
        self.inner.read().await.closed
    }
}

#[async_trait]
impl AddressStore for MemoryAddressStore {
    async fn last_address(&self) -> Result<Option<String>, Error> {
        let guard = self.inner.read().await;
        if guard.closed {
            return Err(Error::store_read("store is closed"));
        }

        // Ties on the timestamp resolve to the later insertion
        Ok(guard
            .records
            .iter()
            .max_by_key(|record| record.recorded_at)
            .map(|record| record.address.clone()))
    }

    async fn append_address(&self, address: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        if guard.closed {
            return Err(Error::store_write("store is closed"));
        }

        guard.records.push(AddressRecord::new(address));
        Ok(())
    }

    async fn close(&self) -> Result<(), Error> {
        self.inner.write().await.closed = true;
        Ok(())
    }
}
