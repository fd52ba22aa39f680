//! # Identity-Manager Connection Context
//!
//! Login context for an identity manager reached over an application-server
//! endpoint. Addressing and credentials are composed from the underlying
//! server configuration; login failures are classified structurally into
//! connectivity versus access-denied.

pub mod config;
pub mod context;

pub use config::IdentityConfig;
pub use context::{IdentityContext, LOGIN_CONFIG, LOGIN_PLATFORM};
