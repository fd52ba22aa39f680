//! Workflow connection context
//!
//! Opens a workflow client per the connection environment. A handle whose
//! server platform is gone right after open is treated as a disconnection
//! and resets the context. A secondary deployer client is derived lazily
//! from the primary connection's configuration.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use tether_context::context::{release_handle, ConnectionContext};
use tether_context::environment::{keys, Environment};
use tether_context::error::{ContextError, ContextResult};
use tether_context::ids::ContextId;
use tether_context::provider::{ProviderClient, ProviderHandle};
use tether_context::retry::RetryPolicy;
use tether_context::types::ContextType;

use crate::config::WorkflowConfig;

/// A workflow client handle that can report whether the server platform
/// behind it is still there.
///
/// Workflow providers hand out composite clients whose inner platform
/// reference can be gone even though the open call returned; the context
/// checks this immediately after opening.
pub trait WorkflowHandle: ProviderHandle {
    /// Whether the server platform behind this client is reachable.
    fn platform_alive(&self) -> bool;
}

/// Connection context for a workflow/SOA server.
pub struct WorkflowContext<P>
where
    P: ProviderClient,
    P::Handle: WorkflowHandle,
{
    id: ContextId,
    config: WorkflowConfig,
    provider: P,
    handle: Option<P::Handle>,
    deployer: Option<P::Handle>,
}

impl<P> WorkflowContext<P>
where
    P: ProviderClient,
    P::Handle: WorkflowHandle,
{
    /// Create a context for the given configuration and provider.
    pub fn new(config: WorkflowConfig, provider: P) -> Self {
        Self {
            id: ContextId::new(),
            config,
            provider,
            handle: None,
            deployer: None,
        }
    }

    /// The configuration this context was built from.
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// The live provider handle, when established.
    pub fn handle(&self) -> Option<&P::Handle> {
        self.handle.as_ref()
    }

    /// Whether the deployer client has been built.
    pub fn deployer_built(&self) -> bool {
        self.deployer.is_some()
    }

    /// The deployer service URL, derived from the primary service URL.
    pub fn deployer_url(&self) -> ContextResult<String> {
        Ok(format!(
            "{}/{}",
            self.service_url()?,
            self.config.deployer_path
        ))
    }

    /// Build the provider environment.
    pub fn environment(&self) -> ContextResult<Environment> {
        let mut environment =
            Environment::new().with(keys::PROVIDER_URL, self.service_url()?);
        if let Some(principal) = &self.config.descriptor.principal {
            environment.insert(keys::SECURITY_PRINCIPAL, principal.name());
            environment.insert(keys::SECURITY_CREDENTIALS, principal.credential());
        }
        Ok(environment)
    }

    /// The deployer client, built on first use from the primary
    /// connection's configuration.
    ///
    /// Requires an established context; the deployer shares credentials with
    /// the primary client and dials the derived deployer URL.
    pub async fn deployer(&mut self) -> ContextResult<&P::Handle> {
        if !self.established() {
            return Err(ContextError::configuration(
                "deployer requested on a disconnected workflow context",
            ));
        }

        let handle = match self.deployer.take() {
            Some(existing) => existing,
            None => {
                let url = self.deployer_url()?;
                let environment = self.environment()?;
                debug!(context = %self.id, url = %url, "building deployer client");
                RetryPolicy::once()
                    .run(|| self.provider.open(&url, &environment))
                    .await?
            }
        };
        Ok(self.deployer.insert(handle))
    }
}

#[async_trait]
impl<P> ConnectionContext for WorkflowContext<P>
where
    P: ProviderClient,
    P::Handle: WorkflowHandle,
{
    fn context_type(&self) -> ContextType {
        ContextType::Workflow
    }

    fn id(&self) -> ContextId {
        self.id
    }

    fn validate(&self) -> ContextResult<()> {
        self.config.validate()
    }

    fn service_url(&self) -> ContextResult<String> {
        self.config.descriptor.service_url()
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
        debug!(context = %self.id, url = %url, "opening workflow client");

        let handle = RetryPolicy::once()
            .run(|| self.provider.open(&url, &environment))
            .await?;

        // A client without a live platform is useless; treat it as a
        // disconnection and leave the context reset.
        if !handle.platform_alive() {
            warn!(context = %self.id, url = %url, "workflow platform gone after open; resetting");
            return Err(ContextError::connectivity(
                "workflow platform unavailable after open",
            ));
        }

        self.handle = Some(handle);
        info!(context = %self.id, url = %url, "workflow client established");
        Ok(())
    }

    async fn disconnect(&mut self) -> ContextResult<()> {
        release_handle(self.id, &mut self.deployer).await;
        release_handle(self.id, &mut self.handle).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tether_context::descriptor::ConnectionDescriptor;
    use tether_context::principal::SecurityPrincipal;

    struct MockProvider {
        opens: Arc<AtomicUsize>,
        closes: Arc<AtomicUsize>,
        platform_alive: bool,
    }

    #[derive(Debug)]
    struct MockHandle {
        closes: Arc<AtomicUsize>,
        alive: bool,
    }

    #[async_trait]
    impl ProviderHandle for MockHandle {
        async fn close(&mut self) -> ContextResult<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    impl WorkflowHandle for MockHandle {
        fn platform_alive(&self) -> bool {
            self.alive
        }
    }

    #[async_trait]
    impl ProviderClient for MockProvider {
        type Handle = MockHandle;

        async fn open(&self, _url: &str, _env: &Environment) -> ContextResult<Self::Handle> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            Ok(MockHandle {
                closes: self.closes.clone(),
                alive: self.platform_alive,
            })
        }
    }

    fn config() -> WorkflowConfig {
        WorkflowConfig::new(
            ConnectionDescriptor::new("http", "soa.example.com", 8001)
                .with_principal(SecurityPrincipal::new("soa_admin", "secret")),
        )
    }

    fn context(platform_alive: bool) -> WorkflowContext<MockProvider> {
        WorkflowContext::new(
            config(),
            MockProvider {
                opens: Arc::new(AtomicUsize::new(0)),
                closes: Arc::new(AtomicUsize::new(0)),
                platform_alive,
            },
        )
    }

    #[tokio::test]
    async fn lifecycle_round_trip() {
        let mut ctx = context(true);

        ctx.connect().await.expect("connects");
        assert!(ctx.established());
        ctx.connect().await.expect("idempotent");
        assert_eq!(ctx.provider.opens.load(Ordering::SeqCst), 1);

        ctx.disconnect().await.expect("disconnects");
        assert!(!ctx.established());
    }

    #[tokio::test]
    async fn dead_platform_resets_the_context() {
        let mut ctx = context(false);

        let err = ctx.connect().await.expect_err("must fail");
        assert_eq!(err.error_code(), "CONNECTION_FAILED");
        assert!(!ctx.established());
        assert_eq!(ctx.provider.opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn deployer_is_built_lazily_and_once() {
        let mut ctx = context(true);
        ctx.connect().await.expect("connects");
        assert!(!ctx.deployer_built());
        assert_eq!(ctx.provider.opens.load(Ordering::SeqCst), 1);

        ctx.deployer().await.expect("builds deployer");
        assert!(ctx.deployer_built());
        assert_eq!(ctx.provider.opens.load(Ordering::SeqCst), 2);

        ctx.deployer().await.expect("reuses deployer");
        assert_eq!(ctx.provider.opens.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn deployer_requires_an_established_context() {
        let mut ctx = context(true);
        let err = ctx.deployer().await.expect_err("must fail");
        assert_eq!(err.error_code(), "INVALID_CONFIG");
        assert_eq!(ctx.provider.opens.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn deployer_url_derives_from_the_primary() {
        let ctx = context(true);
        assert_eq!(
            ctx.deployer_url().expect("url"),
            "http://soa.example.com:8001/deployer"
        );
    }

    #[tokio::test]
    async fn disconnect_releases_both_clients() {
        let mut ctx = context(true);
        ctx.connect().await.expect("connects");
        ctx.deployer().await.expect("builds deployer");

        ctx.disconnect().await.expect("disconnects");
        assert!(!ctx.established());
        assert!(!ctx.deployer_built());
        assert_eq!(ctx.provider.closes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalid_config_never_reaches_provider() {
        let mut ctx = context(true);
        ctx.config.descriptor.host = String::new();

        assert!(ctx.connect().await.is_err());
        assert_eq!(ctx.provider.opens.load(Ordering::SeqCst), 0);
    }
}
