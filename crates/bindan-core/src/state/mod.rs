// # Address Store Implementations
//
// In-process implementation of the AddressStore trait. The SQL-backed store
// lives in the `bindan-store-sql` crate.

pub mod memory;

pub use memory::MemoryAddressStore;
