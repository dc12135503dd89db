//! Collaborator traits for a bindAN run
//!
//! - [`AddressStore`]: Durable record of resolved addresses
//! - [`Resolver`]: Domain name to address lookup
//! - [`AclWriter`]: ACL line rewrite in the name-server configuration
//! - [`ServiceReloader`]: Name-server reload

pub mod acl_writer;
pub mod address_store;
pub mod resolver;
pub mod service_reloader;

pub use acl_writer::AclWriter;
pub use address_store::{AddressRecord, AddressStore};
pub use resolver::Resolver;
pub use service_reloader::ServiceReloader;
