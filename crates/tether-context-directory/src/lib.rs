//! # Directory Connection Context
//!
//! Connection context for LDAP directory targets.
//!
//! Besides the common lifecycle this crate carries the directory-specific
//! environment contract (protocol version, pooling, binary attributes), the
//! TLS housekeeping performed for secured transports, and
//! distinguished-name composition and escaping helpers.

pub mod config;
pub mod context;
pub mod dn;
pub mod transport;

pub use config::{DirectoryConfig, PORT_DEFAULT, PORT_DEFAULT_SECURE};
pub use context::DirectoryContext;
pub use transport::SecureTransport;
