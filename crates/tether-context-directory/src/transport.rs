//! Secure transport seam
//!
//! Collaborator contract for the TLS housekeeping a secured directory
//! connect performs before opening: client-certificate inspection and
//! invalidation of any cached session for the target endpoint. The actual
//! TLS stack lives behind this trait, next to the provider adapter.

use async_trait::async_trait;

use tether_context::error::ContextResult;

/// TLS housekeeping performed before a secured directory connect.
#[async_trait]
pub trait SecureTransport: Send + Sync {
    /// Check whether the critical extensions of the client certificate at
    /// `path` are supported.
    ///
    /// The outcome is informational; an unsupported extension is logged, not
    /// enforced. Failures reading or parsing the certificate are real errors
    /// and propagate.
    async fn validate_certificate(&self, path: &str) -> ContextResult<bool>;

    /// Invalidate any cached TLS session for `host:port`.
    ///
    /// Connections already using the session keep it until they close;
    /// future connects negotiate fresh.
    async fn invalidate_session(&self, host: &str, port: u16) -> ContextResult<()>;
}
