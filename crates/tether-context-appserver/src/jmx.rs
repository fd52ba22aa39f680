//! JMX connection context
//!
//! MBean-server context against an application server. The service address
//! is generated from a template; open failures are reported with their root
//! cause, since JMX connectors tend to bury the interesting error several
//! wrappers deep.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use tether_context::context::{release_handle, ConnectionContext};
use tether_context::environment::{keys, Environment};
use tether_context::error::{ContextError, ContextResult};
use tether_context::ids::ContextId;
use tether_context::provider::ProviderClient;
use tether_context::retry::RetryPolicy;
use tether_context::template::{render, Bindings};
use tether_context::types::ContextType;

use crate::config::JmxConfig;

/// Environment key for the locale requested from the provider.
pub const LOCALE: &str = "locale";

/// Template for the JMX service address.
const SERVICE_TEMPLATE: &str = "service:jmx:#{protocol}://#{host}:#{port}/jndi/#{service}";

/// Replace the reported message with the innermost cause, keeping the error
/// kind.
fn unwrap_root(err: ContextError) -> ContextError {
    let root = err.root_cause_message();
    match err {
        ContextError::Provider { .. } => ContextError::provider(root),
        ContextError::Connectivity { .. } => ContextError::connectivity(root),
        other => other,
    }
}

/// Connection context for a JMX/MBean-server endpoint.
pub struct JmxContext<P: ProviderClient> {
    id: ContextId,
    config: JmxConfig,
    provider: P,
    handle: Option<P::Handle>,
}

impl<P: ProviderClient> JmxContext<P> {
    /// Create a context for the given configuration and provider.
    pub fn new(config: JmxConfig, provider: P) -> Self {
        Self {
            id: ContextId::new(),
            config,
            provider,
            handle: None,
        }
    }

    /// The configuration this context was built from.
    pub fn config(&self) -> &JmxConfig {
        &self.config
    }

    /// The live provider handle, when established.
    pub fn handle(&self) -> Option<&P::Handle> {
        self.handle.as_ref()
    }

    /// Build the provider environment: locale, connect timeout and
    /// credentials.
    pub fn environment(&self) -> Environment {
        let descriptor = &self.config.descriptor;
        let mut environment = Environment::new()
            .with(LOCALE, self.config.locale.clone())
            .with(keys::CONNECT_TIMEOUT, descriptor.connect_timeout_ms.to_string());

        if let Some(principal) = &descriptor.principal {
            environment.insert(keys::SECURITY_PRINCIPAL, principal.name());
            environment.insert(keys::SECURITY_CREDENTIALS, principal.credential());
        }
        environment
    }

    fn template_bindings(&self) -> Bindings {
        let descriptor = &self.config.descriptor;
        let mut bindings = Bindings::new()
            .with("protocol", descriptor.protocol.clone())
            .with("host", descriptor.host.clone())
            .with("service", self.config.service_name.clone());
        if let Some(port) = descriptor.port {
            bindings = bindings.with("port", port.to_string());
        }
        bindings
    }
}

#[async_trait]
impl<P: ProviderClient> ConnectionContext for JmxContext<P> {
    fn context_type(&self) -> ContextType {
        ContextType::Jmx
    }

    fn id(&self) -> ContextId {
        self.id
    }

    fn validate(&self) -> ContextResult<()> {
        self.config.validate()
    }

    fn service_url(&self) -> ContextResult<String> {
        if let Some(url) = &self.config.descriptor.service_url {
            if !url.is_empty() {
                return Ok(url.clone());
            }
        }
        render(SERVICE_TEMPLATE, self.template_bindings().as_map())
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
        debug!(context = %self.id, url = %url, "opening JMX connector");

        let handle = RetryPolicy::once()
            .run(|| self.provider.open(&url, &environment))
            .await
            .map_err(|err| {
                let unwrapped = unwrap_root(err);
                warn!(context = %self.id, error = %unwrapped, "JMX connector open failed");
                unwrapped
            })?;
        self.handle = Some(handle);

        info!(context = %self.id, url = %url, "JMX connector established");
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

    use tether_context::descriptor::ConnectionDescriptor;
    use tether_context::principal::SecurityPrincipal;
    use tether_context::provider::ProviderHandle;

    struct MockProvider {
        opens: Arc<AtomicUsize>,
        fail_nested: bool,
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

        async fn open(&self, _url: &str, _env: &Environment) -> ContextResult<Self::Handle> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            if self.fail_nested {
                let root = std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "rmi registry refused",
                );
                let middle = ContextError::connectivity_with_source("naming lookup failed", root);
                return Err(ContextError::provider_with_source(
                    "connector factory failed",
                    middle,
                ));
            }
            Ok(MockHandle)
        }
    }

    fn config() -> JmxConfig {
        JmxConfig::new(
            ConnectionDescriptor::new("t3", "wls.example.com", 7001)
                .with_principal(SecurityPrincipal::new("weblogic", "welcome1")),
        )
    }

    #[test]
    fn service_url_renders_the_template() {
        let context = JmxContext::new(
            config(),
            MockProvider {
                opens: Arc::new(AtomicUsize::new(0)),
                fail_nested: false,
            },
        );

        assert_eq!(
            context.service_url().expect("renders"),
            "service:jmx:t3://wls.example.com:7001/jndi/weblogic.management.mbeanservers.domainruntime"
        );
    }

    #[test]
    fn environment_carries_locale_timeout_and_credentials() {
        let context = JmxContext::new(
            config(),
            MockProvider {
                opens: Arc::new(AtomicUsize::new(0)),
                fail_nested: false,
            },
        );
        let environment = context.environment();

        assert_eq!(environment.get(LOCALE), Some("en"));
        assert_eq!(environment.get(keys::CONNECT_TIMEOUT), Some("3000"));
        assert_eq!(environment.get(keys::SECURITY_PRINCIPAL), Some("weblogic"));
    }

    #[tokio::test]
    async fn open_failure_reports_the_root_cause() {
        let mut context = JmxContext::new(
            config(),
            MockProvider {
                opens: Arc::new(AtomicUsize::new(0)),
                fail_nested: true,
            },
        );

        let err = context.connect().await.expect_err("must fail");
        assert_eq!(err.error_code(), "PROVIDER_ERROR");
        assert!(err.to_string().contains("rmi registry refused"));
        assert!(!context.established());
    }

    #[tokio::test]
    async fn lifecycle_round_trip() {
        let opens = Arc::new(AtomicUsize::new(0));
        let mut context = JmxContext::new(
            config(),
            MockProvider {
                opens: opens.clone(),
                fail_nested: false,
            },
        );

        context.connect().await.expect("connects");
        context.connect().await.expect("idempotent");
        assert_eq!(opens.load(Ordering::SeqCst), 1);

        context.disconnect().await.expect("disconnects");
        assert!(!context.established());
    }

    #[tokio::test]
    async fn invalid_config_never_reaches_provider() {
        let opens = Arc::new(AtomicUsize::new(0));
        let mut bad = config();
        bad.descriptor.host = String::new();
        let mut context = JmxContext::new(
            bad,
            MockProvider {
                opens: opens.clone(),
                fail_nested: false,
            },
        );

        assert!(context.connect().await.is_err());
        assert_eq!(opens.load(Ordering::SeqCst), 0);
    }
}
