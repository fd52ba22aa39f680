//! Directory context configuration
//!
//! Configuration for LDAP directory targets.

use serde::{Deserialize, Serialize};

use tether_context::descriptor::ConnectionDescriptor;
use tether_context::error::ContextResult;

/// Default port for plain LDAP connections.
pub const PORT_DEFAULT: u16 = 389;
/// Default port for secure LDAP connections.
pub const PORT_DEFAULT_SECURE: u16 = 636;

fn default_context_factory() -> String {
    "com.sun.jndi.ldap.LdapCtxFactory".to_string()
}

fn default_security_provider() -> String {
    "com.sun.net.ssl.internal.ssl.Provider".to_string()
}

/// Configuration for a directory context.
///
/// The factory and security-provider names are opaque data handed to the
/// provider; nothing here interprets them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Endpoint addressing and credentials.
    #[serde(default)]
    pub descriptor: ConnectionDescriptor,

    /// Whether the transport is secured (LDAPS).
    #[serde(default)]
    pub secure: bool,

    /// Attributes the provider must treat as binary (certificates, GUIDs,
    /// photos).
    #[serde(default)]
    pub binary_attributes: Vec<String>,

    /// Fully qualified name of the initial-context factory the provider
    /// should instantiate.
    #[serde(default = "default_context_factory")]
    pub context_factory: String,

    /// Name of the security provider installed for secured transports.
    #[serde(default = "default_security_provider")]
    pub security_provider: String,

    /// Optional client certificate checked before a secured connect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<String>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            descriptor: ConnectionDescriptor::default(),
            secure: false,
            binary_attributes: Vec::new(),
            context_factory: default_context_factory(),
            security_provider: default_security_provider(),
            client_certificate: None,
        }
    }
}

impl DirectoryConfig {
    /// Create a configuration for the given endpoint.
    pub fn new(descriptor: ConnectionDescriptor) -> Self {
        Self {
            descriptor,
            ..Self::default()
        }
    }

    /// Secure the transport. Switches the port to the LDAPS default when it
    /// is still on the plain default.
    #[must_use]
    pub fn with_secure(mut self) -> Self {
        self.secure = true;
        if self.descriptor.port == Some(PORT_DEFAULT) {
            self.descriptor.port = Some(PORT_DEFAULT_SECURE);
        }
        self
    }

    /// Add a binary attribute.
    pub fn with_binary_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.binary_attributes.push(attribute.into());
        self
    }

    /// Set the client certificate path.
    pub fn with_client_certificate(mut self, path: impl Into<String>) -> Self {
        self.client_certificate = Some(path.into());
        self
    }

    /// Validate the configuration. A principal is mandatory for directory
    /// targets.
    pub fn validate(&self) -> ContextResult<()> {
        self.descriptor.validate_with_principal()
    }

    /// Create a redacted copy (for logging/display).
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.descriptor = copy.descriptor.redacted();
        copy
    }
}
