//! Identity-manager connection context
//!
//! Logs in against an identity manager running on an application server.
//! The platform discriminator travels inside the provider environment as an
//! ordinary entry; nothing here mutates process-wide state.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use tether_context::context::{release_handle, ConnectionContext};
use tether_context::environment::{keys, Environment};
use tether_context::error::{ContextError, ContextResult};
use tether_context::ids::ContextId;
use tether_context::provider::ProviderClient;
use tether_context::retry::RetryPolicy;
use tether_context::types::ContextType;

use crate::config::IdentityConfig;

/// Environment key naming the platform the login handler must target.
pub const LOGIN_PLATFORM: &str = "login.platform";
/// Environment key carrying the login configuration path.
pub const LOGIN_CONFIG: &str = "login.config";

/// Classify a login failure.
///
/// Connectivity faults keep their kind so callers can reattempt later;
/// every other failure surfaces as access-denied. Classification works on
/// the error's structure; provider adapters are responsible for mapping
/// vendor codes before the error arrives here.
fn classify_login_failure(err: ContextError) -> ContextError {
    if err.is_transient() {
        return err;
    }
    match err {
        ContextError::Authentication { .. } => err,
        other => ContextError::authentication(format!(
            "access denied by identity manager: {}",
            other.root_cause_message()
        )),
    }
}

/// Connection context for an identity-manager endpoint.
///
/// Composes the application-server configuration for addressing and
/// credentials; the identity manager itself is just a login performed over
/// that endpoint.
pub struct IdentityContext<P: ProviderClient> {
    id: ContextId,
    config: IdentityConfig,
    provider: P,
    handle: Option<P::Handle>,
}

impl<P: ProviderClient> IdentityContext<P> {
    /// Create a context for the given configuration and provider.
    pub fn new(config: IdentityConfig, provider: P) -> Self {
        Self {
            id: ContextId::new(),
            config,
            provider,
            handle: None,
        }
    }

    /// The configuration this context was built from.
    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// The live provider handle, when established.
    pub fn handle(&self) -> Option<&P::Handle> {
        self.handle.as_ref()
    }

    /// Build the provider environment.
    ///
    /// The underlying server environment plus the platform discriminator
    /// and, when configured, the login configuration path.
    pub fn environment(&self) -> ContextResult<Environment> {
        let server = &self.config.server;
        let mut environment = Environment::new()
            .with(keys::CONTEXT_FACTORY, server.effective_factory())
            .with(keys::PROVIDER_URL, self.service_url()?)
            .with(LOGIN_PLATFORM, server.platform.as_str());

        if let Some(principal) = &server.descriptor.principal {
            environment.insert(keys::SECURITY_PRINCIPAL, principal.name());
            environment.insert(keys::SECURITY_CREDENTIALS, principal.credential());
        }
        if let Some(path) = &self.config.login_config {
            environment.insert(LOGIN_CONFIG, path.clone());
        }
        Ok(environment)
    }
}

#[async_trait]
impl<P: ProviderClient> ConnectionContext for IdentityContext<P> {
    fn context_type(&self) -> ContextType {
        ContextType::Identity
    }

    fn id(&self) -> ContextId {
        self.id
    }

    fn validate(&self) -> ContextResult<()> {
        self.config.validate()
    }

    fn service_url(&self) -> ContextResult<String> {
        self.config.server.descriptor.service_url()
    }

    fn established(&self) -> bool {
        self.handle.is_some()
    }

    async fn connect(&mut self) -> ContextResult<()> {
        if self.established() {
            return Ok(());
        }
        self.validate()?;

        let url = self.service_url()?;
        let environment = self.environment()?;
        debug!(
            context = %self.id,
            platform = %self.config.server.platform,
            url = %url,
            "logging in to identity manager"
        );

        let handle = RetryPolicy::once()
            .run(|| self.provider.open(&url, &environment))
            .await
            .map_err(|err| {
                let classified = classify_login_failure(err);
                warn!(context = %self.id, error = %classified, "identity manager login failed");
                classified
            })?;
        self.handle = Some(handle);

        info!(context = %self.id, url = %url, "identity manager session established");
        Ok(())
    }

    async fn disconnect(&mut self) -> ContextResult<()> {
        release_handle(self.id, &mut self.handle).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tether_context::principal::SecurityPrincipal;
    use tether_context::provider::ProviderHandle;
    use tether_context_appserver::config::RmiConfig;

    enum Outcome {
        Succeed,
        FailConnectivity,
        FailProvider,
    }

    struct MockProvider {
        outcome: Outcome,
        opens: Arc<AtomicUsize>,
        seen_platform: Arc<std::sync::Mutex<Option<String>>>,
    }

    struct MockHandle;

    #[async_trait]
    impl ProviderHandle for MockHandle {
        async fn close(&mut self) -> ContextResult<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl ProviderClient for MockProvider {
        type Handle = MockHandle;

        async fn open(&self, _url: &str, env: &Environment) -> ContextResult<Self::Handle> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            *self.seen_platform.lock().expect("lock") =
                env.get(LOGIN_PLATFORM).map(str::to_string);
            match self.outcome {
                Outcome::Succeed => Ok(MockHandle),
                Outcome::FailConnectivity => {
                    Err(ContextError::connectivity("naming service unreachable"))
                }
                Outcome::FailProvider => Err(ContextError::provider("login module exploded")),
            }
        }
    }

    fn context(outcome: Outcome) -> IdentityContext<MockProvider> {
        let config = IdentityConfig::new(RmiConfig::weblogic(
            "oim.example.com",
            14000,
            SecurityPrincipal::new("xelsysadm", "secret"),
        ))
        .with_login_config("config/authwl.conf");

        IdentityContext::new(
            config,
            MockProvider {
                outcome,
                opens: Arc::new(AtomicUsize::new(0)),
                seen_platform: Arc::new(std::sync::Mutex::new(None)),
            },
        )
    }

    #[tokio::test]
    async fn platform_discriminator_travels_in_the_environment() {
        let mut ctx = context(Outcome::Succeed);
        ctx.connect().await.expect("connects");

        let seen = ctx.provider.seen_platform.lock().expect("lock").clone();
        assert_eq!(seen.as_deref(), Some("weblogic"));
    }

    #[tokio::test]
    async fn environment_carries_the_login_surface() {
        let ctx = context(Outcome::Succeed);
        let environment = ctx.environment().expect("builds");

        assert_eq!(environment.get(LOGIN_CONFIG), Some("config/authwl.conf"));
        assert_eq!(
            environment.get(keys::PROVIDER_URL),
            Some("t3://oim.example.com:14000")
        );
        assert_eq!(environment.get(keys::SECURITY_PRINCIPAL), Some("xelsysadm"));
    }

    #[tokio::test]
    async fn connectivity_failures_keep_their_kind() {
        let mut ctx = context(Outcome::FailConnectivity);
        let err = ctx.connect().await.expect_err("must fail");
        assert_eq!(err.error_code(), "CONNECTION_FAILED");
    }

    #[tokio::test]
    async fn other_login_failures_surface_as_access_denied() {
        let mut ctx = context(Outcome::FailProvider);
        let err = ctx.connect().await.expect_err("must fail");
        assert_eq!(err.error_code(), "AUTH_FAILED");
        assert!(err.to_string().contains("login module exploded"));
    }

    #[tokio::test]
    async fn invalid_config_never_reaches_provider() {
        let mut ctx = context(Outcome::Succeed);
        ctx.config.server.descriptor.principal = None;

        assert!(ctx.connect().await.is_err());
        assert_eq!(ctx.provider.opens.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn lifecycle_round_trip() {
        let mut ctx = context(Outcome::Succeed);
        ctx.connect().await.expect("connects");
        assert!(ctx.established());
        ctx.connect().await.expect("idempotent");
        assert_eq!(ctx.provider.opens.load(Ordering::SeqCst), 1);

        ctx.disconnect().await.expect("disconnects");
        assert!(!ctx.established());
    }
}
