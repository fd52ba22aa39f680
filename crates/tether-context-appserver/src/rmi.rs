//! RMI/JNDI connection context
//!
//! Naming-service context against an application server. Timeouts are
//! platform-conditional; the handle is memoized, so connect is idempotent
//! once established.

use async_trait::async_trait;
use tracing::{debug, info};

use tether_context::context::{release_handle, ConnectionContext};
use tether_context::environment::{keys, Environment};
use tether_context::error::ContextResult;
use tether_context::ids::ContextId;
use tether_context::provider::ProviderClient;
use tether_context::retry::RetryPolicy;
use tether_context::types::ContextType;

use crate::config::RmiConfig;

/// Connection context for an RMI/JNDI application-server endpoint.
pub struct RmiContext<P: ProviderClient> {
    id: ContextId,
    config: RmiConfig,
    provider: P,
    handle: Option<P::Handle>,
}

impl<P: ProviderClient> RmiContext<P> {
    /// Create a context for the given configuration and provider.
    pub fn new(config: RmiConfig, provider: P) -> Self {
        Self {
            id: ContextId::new(),
            config,
            provider,
            handle: None,
        }
    }

    /// The configuration this context was built from.
    pub fn config(&self) -> &RmiConfig {
        &self.config
    }

    /// The live provider handle, when established.
    pub fn handle(&self) -> Option<&P::Handle> {
        self.handle.as_ref()
    }

    /// The service URL extended with a naming path.
    pub fn context_url(&self, path: &str) -> ContextResult<String> {
        let base = self.service_url()?;
        if path.is_empty() {
            return Ok(base);
        }
        Ok(format!("{base}/{path}"))
    }

    /// Build the provider environment.
    ///
    /// The connect/response timeout entries appear only for platforms whose
    /// naming layer honors them.
    pub fn environment(&self) -> ContextResult<Environment> {
        let descriptor = &self.config.descriptor;
        let mut environment = Environment::new()
            .with(keys::CONTEXT_FACTORY, self.config.effective_factory())
            .with(keys::PROVIDER_URL, self.service_url()?);

        if let Some(principal) = &descriptor.principal {
            environment.insert(keys::SECURITY_PRINCIPAL, principal.name());
            environment.insert(keys::SECURITY_CREDENTIALS, principal.credential());
        }

        if self.config.platform.requires_jndi_timeouts() {
            environment.insert(keys::CONNECT_TIMEOUT, descriptor.connect_timeout_ms.to_string());
            environment.insert(
                keys::RESPONSE_TIMEOUT,
                descriptor.response_timeout_ms.to_string(),
            );
        }

        Ok(environment)
    }
}

#[async_trait]
impl<P: ProviderClient> ConnectionContext for RmiContext<P> {
    fn context_type(&self) -> ContextType {
        ContextType::Rmi
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
        // memoized handle: a second connect reuses the first
        if self.established() {
            return Ok(());
        }
        self.validate()?;

        let url = self.service_url()?;
        let environment = self.environment()?;
        debug!(context = %self.id, platform = %self.config.platform, url = %url, "opening naming context");

        let handle = RetryPolicy::once()
            .run(|| self.provider.open(&url, &environment))
            .await?;
        self.handle = Some(handle);

        info!(context = %self.id, platform = %self.config.platform, "naming context established");
        Ok(())
    }

    async fn disconnect(&mut self) -> ContextResult<()> {
        release_handle(self.id, &mut self.handle).await;
        Ok(())
    }
}
