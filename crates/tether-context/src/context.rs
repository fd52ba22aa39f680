//! Connection context lifecycle
//!
//! The contract every context variant implements, plus the shared
//! best-effort release helper.

use async_trait::async_trait;
use tracing::warn;

use crate::error::ContextResult;
use crate::ids::ContextId;
use crate::provider::ProviderHandle;
use crate::types::ContextType;

/// Lifecycle contract of a connection context.
///
/// A context wraps the addressing for one target endpoint and owns at most
/// one provider handle. The state machine is deliberately small:
///
/// ```text
/// Disconnected --connect()--> Connected
/// Connected    --connect()--> Connected      (idempotent no-op)
/// Connected    --disconnect()--> Disconnected
/// Disconnected --disconnect()--> Disconnected (no-op)
/// ```
///
/// A failed `connect()` leaves the context Disconnected and surfaces a typed
/// error; `established()` reflects reality after every operation returns.
/// Contexts are exclusively owned and driven sequentially by one caller,
/// which is why the lifecycle methods take `&mut self` and no internal
/// locking exists.
#[async_trait]
pub trait ConnectionContext: Send {
    /// The kind of target system this context addresses.
    fn context_type(&self) -> ContextType;

    /// Identifier of this context instance, for tracing.
    fn id(&self) -> ContextId;

    /// Validate the configuration without performing any I/O.
    fn validate(&self) -> ContextResult<()>;

    /// The service URL this context would dial.
    fn service_url(&self) -> ContextResult<String>;

    /// Whether a provider handle is currently held.
    fn established(&self) -> bool;

    /// Establish the connection.
    ///
    /// Validates first; no connection attempt is made on invalid
    /// configuration. A no-op when already established.
    async fn connect(&mut self) -> ContextResult<()>;

    /// Release the connection.
    ///
    /// A no-op when not established. Failures while closing the handle are
    /// reported but do not prevent the transition to Disconnected.
    async fn disconnect(&mut self) -> ContextResult<()>;
}

/// Release the handle in `slot`, if any, tolerating close failures.
///
/// The one place an error is deliberately not propagated: a handle that
/// refuses to close cleanly is logged and dropped so the owning context can
/// still transition to Disconnected.
pub async fn release_handle<H: ProviderHandle>(id: ContextId, slot: &mut Option<H>) {
    if let Some(mut handle) = slot.take() {
        if let Err(err) = handle.close().await {
            warn!(
                context = %id,
                error = %err,
                "closing provider handle failed; connection treated as released"
            );
        }
    }
}
