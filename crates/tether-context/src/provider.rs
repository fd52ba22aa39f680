//! Provider seam
//!
//! The narrow contract between a connection context and the vendor client
//! that performs the actual network handshake (JDBC driver, JNDI context,
//! LDAP connection, JMX connector, metadata-store SDK, workflow SDK).
//! Contexts never touch wire protocols themselves; they assemble an
//! [`Environment`], resolve a service URL and hand both to a provider.
//!
//! Provider adapters own error translation: vendor-native failures are
//! classified into the [`ContextError`] taxonomy at this boundary, by
//! structure (error kinds and codes), never by sniffing message text.
//!
//! [`ContextError`]: crate::error::ContextError

use async_trait::async_trait;

use crate::environment::Environment;
use crate::error::ContextResult;

/// A client capable of opening live connections to one kind of target
/// system.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// The live-connection object returned by a successful open.
    type Handle: ProviderHandle;

    /// Open a connection to `service_url` with the given environment.
    async fn open(&self, service_url: &str, environment: &Environment)
        -> ContextResult<Self::Handle>;
}

/// An opaque live connection owned by exactly one context.
#[async_trait]
pub trait ProviderHandle: Send + Sync {
    /// Release the connection.
    ///
    /// Called at most once; contexts drop the handle afterwards. A handle
    /// that is already gone on the remote side should report success.
    async fn close(&mut self) -> ContextResult<()>;
}
