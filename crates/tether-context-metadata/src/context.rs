//! Metadata-store connection context
//!
//! Acquires a store instance whose persistence lives behind the composed
//! database endpoint.

use async_trait::async_trait;
use tracing::{debug, info};

use tether_context::context::{release_handle, ConnectionContext};
use tether_context::environment::{keys, Environment};
use tether_context::error::ContextResult;
use tether_context::ids::ContextId;
use tether_context::provider::ProviderClient;
use tether_context::retry::RetryPolicy;
use tether_context::types::ContextType;
use tether_context_database::context::{ACCOUNT, PASSWORD};

use crate::config::MetadataConfig;

/// Environment key for the registered instance name.
pub const INSTANCE: &str = "metadata.instance";
/// Environment key for the partition.
pub const PARTITION: &str = "metadata.partition";
/// Environment key for the namespace list (space separated).
pub const NAMESPACES: &str = "metadata.namespaces";

/// Connection context for a metadata store.
///
/// Like every other family member, connect is an idempotent no-op once
/// established.
pub struct MetadataContext<P: ProviderClient> {
    id: ContextId,
    config: MetadataConfig,
    provider: P,
    handle: Option<P::Handle>,
}

impl<P: ProviderClient> MetadataContext<P> {
    /// Create a context for the given configuration and provider.
    pub fn new(config: MetadataConfig, provider: P) -> Self {
        Self {
            id: ContextId::new(),
            config,
            provider,
            handle: None,
        }
    }

    /// The configuration this context was built from.
    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    /// The live provider handle, when established.
    pub fn handle(&self) -> Option<&P::Handle> {
        self.handle.as_ref()
    }

    /// Build the provider environment: store identity plus the delegated
    /// database credentials and URL.
    pub fn environment(&self) -> ContextResult<Environment> {
        let mut environment = Environment::new()
            .with(INSTANCE, self.config.name.clone())
            .with(PARTITION, self.config.partition.clone())
            .with(keys::PROVIDER_URL, self.config.connection_url()?);

        if let Some(name) = self.config.username() {
            environment.insert(ACCOUNT, name);
        }
        if let Some(credential) = self.config.password() {
            environment.insert(PASSWORD, credential);
        }
        if !self.config.namespaces.is_empty() {
            environment.insert(NAMESPACES, self.config.namespaces.join(" "));
        }
        Ok(environment)
    }
}

#[async_trait]
impl<P: ProviderClient> ConnectionContext for MetadataContext<P> {
    fn context_type(&self) -> ContextType {
        ContextType::Metadata
    }

    fn id(&self) -> ContextId {
        self.id
    }

    fn validate(&self) -> ContextResult<()> {
        self.config.validate()
    }

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
        let environment = self.environment()?;
        debug!(
            context = %self.id,
            instance = %self.config.name,
            partition = %self.config.partition,
            "acquiring metadata store instance"
        );

        let handle = RetryPolicy::once()
            .run(|| self.provider.open(&url, &environment))
            .await?;
        self.handle = Some(handle);

        info!(context = %self.id, instance = %self.config.name, "metadata store instance acquired");
        Ok(())
    }

    async fn disconnect(&mut self) -> ContextResult<()> {
        release_handle(self.id, &mut self.handle).await;
        Ok(())
    }
}
