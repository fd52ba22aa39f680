//! Database connection context
//!
//! Resolves the vendor connection string via templating and opens the
//! provider connection under the configured retry policy.

use async_trait::async_trait;
use tracing::{debug, info};

use tether_context::context::{release_handle, ConnectionContext};
use tether_context::environment::Environment;
use tether_context::error::ContextResult;
use tether_context::ids::ContextId;
use tether_context::provider::ProviderClient;
use tether_context::types::ContextType;

use crate::config::DatabaseConfig;

/// Environment key for the account name.
pub const ACCOUNT: &str = "user";
/// Environment key for the account credential.
pub const PASSWORD: &str = "password";

/// Connection context for a relational database server.
///
/// The service URL is generated from the vendor's fixed template unless the
/// descriptor carries an explicit override. The provider-open call runs
/// under the configured [`RetryPolicy`]; this is the only context variant
/// whose default policy allows more than one attempt.
///
/// [`RetryPolicy`]: tether_context::retry::RetryPolicy
pub struct DatabaseContext<P: ProviderClient> {
    id: ContextId,
    config: DatabaseConfig,
    provider: P,
    handle: Option<P::Handle>,
}

impl<P: ProviderClient> DatabaseContext<P> {
    /// Create a context for the given configuration and provider.
    ///
    /// The configuration is not validated here; `connect()` validates before
    /// any I/O so a misconfigured context fails with a configuration error
    /// instead of a provider error.
    pub fn new(config: DatabaseConfig, provider: P) -> Self {
        Self {
            id: ContextId::new(),
            config,
            provider,
            handle: None,
        }
    }

    /// The configuration this context was built from.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// The live provider handle, when established.
    pub fn handle(&self) -> Option<&P::Handle> {
        self.handle.as_ref()
    }

    /// The provider environment: exactly the account and credential entries.
    pub fn environment(&self) -> Environment {
        let mut environment = Environment::new();
        if let Some(principal) = &self.config.descriptor.principal {
            environment.insert(ACCOUNT, principal.name());
            environment.insert(PASSWORD, principal.credential());
        }
        environment
    }
}

#[async_trait]
impl<P: ProviderClient> ConnectionContext for DatabaseContext<P> {
    fn context_type(&self) -> ContextType {
        ContextType::Database
    }

    fn id(&self) -> ContextId {
        self.id
    }

    fn validate(&self) -> ContextResult<()> {
        self.config.validate()
    }

    /// The explicit override when present, otherwise the vendor template
    /// resolved from the descriptor parts.
    fn service_url(&self) -> ContextResult<String> {
        self.config.connection_url()
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
        let environment = self.environment();
        debug!(
            context = %self.id,
            vendor = %self.config.vendor,
            url = %url,
            "opening database connection"
        );

        let handle = self
            .config
            .retry
            .run(|| self.provider.open(&url, &environment))
            .await?;
        self.handle = Some(handle);

        info!(context = %self.id, vendor = %self.config.vendor, "database connection established");
        Ok(())
    }

    async fn disconnect(&mut self) -> ContextResult<()> {
        release_handle(self.id, &mut self.handle).await;
        Ok(())
    }
}
