//! Identity context configuration

use serde::{Deserialize, Serialize};

use tether_context::error::ContextResult;
use tether_context_appserver::config::RmiConfig;

/// Configuration for an identity-manager context.
///
/// Addressing and credentials come entirely from the underlying
/// application-server configuration; this bundle only adds the login
/// surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// The application-server endpoint the identity manager runs on.
    pub server: RmiConfig,

    /// Optional path to a login configuration handed to the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_config: Option<String>,
}

impl IdentityConfig {
    /// Create a configuration over the given server endpoint.
    pub fn new(server: RmiConfig) -> Self {
        Self {
            server,
            login_config: None,
        }
    }

    /// Set the login configuration path.
    pub fn with_login_config(mut self, path: impl Into<String>) -> Self {
        self.login_config = Some(path.into());
        self
    }

    /// Validate the configuration by validating the underlying server
    /// endpoint.
    pub fn validate(&self) -> ContextResult<()> {
        self.server.validate()
    }
}
