// # bindan-core
//
// Core library for bindAN, which keeps an address entry of a BIND ACL in step
// with the current address of a dynamic DNS name.
//
// ## Architecture Overview
//
// - **AddressStore**: Append-only record of resolved addresses (the baseline)
// - **Resolver**: Domain name to address lookup
// - **AclWriter**: Rewrites the address line after the ACL marker
// - **ServiceReloader**: Makes the name server pick up the new ACL
// - **SyncEngine**: Runs fetch → resolve → compare → rewrite → reload → commit
//
// ## Design Principles
//
// 1. **Run Once**: One invocation is one run; scheduling is external (cron, timers)
// 2. **Explicit Dependencies**: Collaborators are passed to the engine, no globals
// 3. **Commit Last**: The store only records an address once the reload succeeded
// 4. **Library-First**: The binary is a thin wrapper around this crate

pub mod acl;
pub mod change;
pub mod config;
pub mod engine;
pub mod error;
pub mod reload;
pub mod resolver;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use acl::AclFile;
pub use change::has_changed;
pub use config::{BindanConfig, LogLevel};
pub use engine::{RunOutcome, RunStage, SyncEngine};
pub use error::{Error, ReloadFailure, Result};
pub use reload::CommandReloader;
pub use resolver::SystemResolver;
pub use state::MemoryAddressStore;
pub use traits::{AclWriter, AddressRecord, AddressStore, Resolver, ServiceReloader};
