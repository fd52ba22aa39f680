//! Directory connection context
//!
//! Builds the provider environment for LDAP targets, performing the TLS
//! housekeeping for secured transports, and opens the provider connection
//! exactly once.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use tether_context::context::{release_handle, ConnectionContext};
use tether_context::environment::{keys, Environment};
use tether_context::error::{ContextError, ContextResult};
use tether_context::ids::ContextId;
use tether_context::provider::ProviderClient;
use tether_context::retry::RetryPolicy;
use tether_context::types::ContextType;

use crate::config::DirectoryConfig;
use crate::transport::SecureTransport;

/// Environment key for the LDAP protocol version.
pub const VERSION: &str = "directory.version";
/// Environment key controlling provider-side connection pooling.
pub const POOL: &str = "connection.pool";
/// Environment key carrying the binary attribute list (space separated).
pub const BINARY_ATTRIBUTES: &str = "attributes.binary";
/// Environment key selecting the transport security protocol.
pub const SECURITY_PROTOCOL: &str = "security.protocol";
/// Environment key naming the installed security provider.
pub const SECURITY_PROVIDER: &str = "security.provider";

/// Value of [`SECURITY_PROTOCOL`] for secured transports.
pub const PROTOCOL_SSL: &str = "ssl";

/// Connection context for an LDAP directory server.
///
/// Opens exactly once per `connect()`; directory providers get no retry
/// budget. The secure-transport collaborator runs only when the
/// configuration asks for a secured connection.
pub struct DirectoryContext<P: ProviderClient> {
    id: ContextId,
    config: DirectoryConfig,
    provider: P,
    transport: Box<dyn SecureTransport>,
    handle: Option<P::Handle>,
}

impl<P: ProviderClient> DirectoryContext<P> {
    /// Create a context for the given configuration, provider and transport
    /// collaborator.
    pub fn new(config: DirectoryConfig, provider: P, transport: Box<dyn SecureTransport>) -> Self {
        Self {
            id: ContextId::new(),
            config,
            provider,
            transport,
            handle: None,
        }
    }

    /// The configuration this context was built from.
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// The live provider handle, when established.
    pub fn handle(&self) -> Option<&P::Handle> {
        self.handle.as_ref()
    }

    /// The service URL extended with a naming-context path.
    pub fn context_url(&self, path: &str) -> ContextResult<String> {
        let base = self.service_url()?;
        if path.is_empty() {
            return Ok(base);
        }
        Ok(format!("{base}/{path}"))
    }

    /// Build the provider environment.
    ///
    /// For secured transports this also inspects the client certificate
    /// (informational) and invalidates any cached TLS session for the
    /// endpoint, in that order, before the provider dials.
    pub async fn environment(&self) -> ContextResult<Environment> {
        let descriptor = &self.config.descriptor;
        let mut environment = Environment::new()
            .with(keys::CONTEXT_FACTORY, self.config.context_factory.clone())
            .with(keys::PROVIDER_URL, self.service_url()?)
            .with(VERSION, "3")
            .with(POOL, "false");

        if let Some(principal) = &descriptor.principal {
            environment.insert(keys::SECURITY_PRINCIPAL, principal.name());
            environment.insert(keys::SECURITY_CREDENTIALS, principal.credential());
        }

        if !self.config.binary_attributes.is_empty() {
            environment.insert(BINARY_ATTRIBUTES, self.config.binary_attributes.join(" "));
        }

        if self.config.secure {
            if let Some(certificate) = &self.config.client_certificate {
                let supported = self.transport.validate_certificate(certificate).await?;
                if !supported {
                    warn!(
                        context = %self.id,
                        certificate = %certificate,
                        "client certificate carries an unsupported critical extension"
                    );
                }
            }

            let port = descriptor
                .port
                .ok_or_else(|| ContextError::missing_attribute("port"))?;
            self.transport
                .invalidate_session(&descriptor.host, port)
                .await?;

            environment.insert(SECURITY_PROTOCOL, PROTOCOL_SSL);
            environment.insert(SECURITY_PROVIDER, self.config.security_provider.clone());
        }

        Ok(environment)
    }
}

#[async_trait]
impl<P: ProviderClient> ConnectionContext for DirectoryContext<P> {
    fn context_type(&self) -> ContextType {
        ContextType::Directory
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
        let environment = self.environment().await?;
        debug!(context = %self.id, url = %url, secure = self.config.secure, "opening directory connection");

        let handle = RetryPolicy::once()
            .run(|| self.provider.open(&url, &environment))
            .await?;
        self.handle = Some(handle);

        info!(context = %self.id, url = %url, "directory connection established");
        Ok(())
    }

    async fn disconnect(&mut self) -> ContextResult<()> {
        release_handle(self.id, &mut self.handle).await;
        Ok(())
    }
}
