//! # Connection Context Framework
//!
//! Core abstractions for connecting the tether deployment tooling to
//! enterprise target systems.
//!
//! This crate provides the lifecycle every target-specific context crate
//! builds on: databases, LDAP directories, RMI/JNDI and JMX application
//! servers, metadata stores, identity managers and workflow servers.
//!
//! ## Architecture
//!
//! One trait plus composition, no inheritance tree:
//!
//! - [`ConnectionContext`] - lifecycle contract (`connect`/`disconnect`)
//! - [`ProviderClient`]/[`ProviderHandle`] - the seam to vendor SDKs
//! - [`ConnectionDescriptor`] + [`SecurityPrincipal`] - addressing bundle
//! - [`RetryPolicy`] - bounded retry with fixed delay
//! - [`template`] - `#{name}` substitution for generated connection strings
//!
//! ## Example
//!
//! ```ignore
//! use tether_context::prelude::*;
//!
//! let descriptor = ConnectionDescriptor::new("thin", "db.example.com", 1521)
//!     .with_principal(SecurityPrincipal::new("system", "manager"));
//!
//! let mut context = DatabaseContext::new(config, provider)?;
//! context.connect().await?;
//! assert!(context.established());
//! context.disconnect().await?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`ids`] - type-safe context identifiers
//! - [`types`] - the [`ContextType`] enum
//! - [`error`] - error taxonomy with transient/permanent classification
//! - [`principal`] - name/credential pair
//! - [`descriptor`] - protocol/host/port/timeouts bundle
//! - [`environment`] - the key/value bag handed to providers
//! - [`template`] - connection-string templating
//! - [`retry`] - the retry policy
//! - [`provider`] - provider seam traits
//! - [`context`] - the lifecycle trait and release helper
//!
//! [`ConnectionContext`]: context::ConnectionContext
//! [`ProviderClient`]: provider::ProviderClient
//! [`ProviderHandle`]: provider::ProviderHandle
//! [`ConnectionDescriptor`]: descriptor::ConnectionDescriptor
//! [`SecurityPrincipal`]: principal::SecurityPrincipal
//! [`RetryPolicy`]: retry::RetryPolicy
//! [`ContextType`]: types::ContextType

pub mod context;
pub mod descriptor;
pub mod environment;
pub mod error;
pub mod ids;
pub mod principal;
pub mod provider;
pub mod retry;
pub mod template;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```
/// use tether_context::prelude::*;
/// ```
pub mod prelude {
    pub use crate::context::{release_handle, ConnectionContext};
    pub use crate::descriptor::ConnectionDescriptor;
    pub use crate::environment::{keys, Environment};
    pub use crate::error::{ContextError, ContextResult};
    pub use crate::ids::ContextId;
    pub use crate::principal::SecurityPrincipal;
    pub use crate::provider::{ProviderClient, ProviderHandle};
    pub use crate::retry::RetryPolicy;
    pub use crate::template::{render, Bindings};
    pub use crate::types::ContextType;
}

// Re-export async_trait for context implementors
pub use async_trait::async_trait;
