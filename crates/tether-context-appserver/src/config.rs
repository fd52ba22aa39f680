//! Application-server context configuration
//!
//! Platform presets and configuration bundles for RMI/JNDI and JMX targets.

use serde::{Deserialize, Serialize};

use tether_context::descriptor::ConnectionDescriptor;
use tether_context::error::ContextResult;
use tether_context::principal::SecurityPrincipal;

/// Application-server platform a context can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerPlatform {
    /// Oracle WebLogic Server.
    Weblogic,
    /// IBM WebSphere Application Server.
    Websphere,
    /// JBoss/WildFly.
    Jboss,
}

impl ServerPlatform {
    /// The string representation used in configuration files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerPlatform::Weblogic => "weblogic",
            ServerPlatform::Websphere => "websphere",
            ServerPlatform::Jboss => "jboss",
        }
    }

    /// The naming protocol conventionally spoken by this platform.
    #[must_use]
    pub fn protocol(&self) -> &'static str {
        match self {
            ServerPlatform::Weblogic => "t3",
            ServerPlatform::Websphere => "iiop",
            ServerPlatform::Jboss => "remote",
        }
    }

    /// The initial-context factory conventionally used for this platform.
    #[must_use]
    pub fn context_factory(&self) -> &'static str {
        match self {
            ServerPlatform::Weblogic => "weblogic.jndi.WLInitialContextFactory",
            ServerPlatform::Websphere => "com.ibm.websphere.naming.WsnInitialContextFactory",
            ServerPlatform::Jboss => "org.wildfly.naming.client.WildFlyInitialContextFactory",
        }
    }

    /// Whether the naming layer of this platform honors explicit
    /// connect/response timeouts. Only WebLogic does; the entries are
    /// omitted everywhere else.
    #[must_use]
    pub fn requires_jndi_timeouts(&self) -> bool {
        matches!(self, ServerPlatform::Weblogic)
    }
}

impl std::fmt::Display for ServerPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for an RMI/JNDI context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RmiConfig {
    /// Target platform.
    pub platform: ServerPlatform,

    /// Endpoint addressing and credentials.
    #[serde(default)]
    pub descriptor: ConnectionDescriptor,

    /// Initial-context factory handed to the provider. Defaults to the
    /// platform's conventional factory.
    #[serde(default)]
    pub context_factory: Option<String>,
}

impl RmiConfig {
    /// Create a configuration for the given platform and endpoint.
    pub fn new(platform: ServerPlatform, descriptor: ConnectionDescriptor) -> Self {
        Self {
            platform,
            descriptor,
            context_factory: None,
        }
    }

    /// Preset for a WebLogic domain server: `t3` protocol and the WebLogic
    /// factory.
    pub fn weblogic(
        host: impl Into<String>,
        port: u16,
        principal: SecurityPrincipal,
    ) -> Self {
        let platform = ServerPlatform::Weblogic;
        Self::new(
            platform,
            ConnectionDescriptor::new(platform.protocol(), host, port).with_principal(principal),
        )
    }

    /// Preset for a WebSphere server: `iiop` protocol and the WebSphere
    /// factory.
    pub fn websphere(
        host: impl Into<String>,
        port: u16,
        principal: SecurityPrincipal,
    ) -> Self {
        let platform = ServerPlatform::Websphere;
        Self::new(
            platform,
            ConnectionDescriptor::new(platform.protocol(), host, port).with_principal(principal),
        )
    }

    /// Override the initial-context factory.
    pub fn with_context_factory(mut self, factory: impl Into<String>) -> Self {
        self.context_factory = Some(factory.into());
        self
    }

    /// The effective factory: the override when set, else the platform
    /// default.
    #[must_use]
    pub fn effective_factory(&self) -> &str {
        self.context_factory
            .as_deref()
            .unwrap_or_else(|| self.platform.context_factory())
    }

    /// Validate the configuration. A principal is mandatory for
    /// application-server targets.
    pub fn validate(&self) -> ContextResult<()> {
        self.descriptor.validate_with_principal()
    }
}

fn default_service_name() -> String {
    "weblogic.management.mbeanservers.domainruntime".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

/// Configuration for a JMX context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JmxConfig {
    /// Endpoint addressing and credentials.
    #[serde(default)]
    pub descriptor: ConnectionDescriptor,

    /// Name of the MBean server registered under the naming tree.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Locale requested for provider messages.
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl JmxConfig {
    /// Create a configuration for the given endpoint.
    pub fn new(descriptor: ConnectionDescriptor) -> Self {
        Self {
            descriptor,
            service_name: default_service_name(),
            locale: default_locale(),
        }
    }

    /// Set the MBean server name.
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Validate the configuration. A principal is mandatory.
    pub fn validate(&self) -> ContextResult<()> {
        self.descriptor.validate_with_principal()?;
        if self.service_name.is_empty() {
            return Err(tether_context::error::ContextError::missing_attribute(
                "serviceName",
            ));
        }
        Ok(())
    }
}
