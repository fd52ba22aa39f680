//! Workflow context configuration

use serde::{Deserialize, Serialize};

use tether_context::descriptor::ConnectionDescriptor;
use tether_context::error::ContextResult;

fn default_deployer_path() -> String {
    "deployer".to_string()
}

/// Configuration for a workflow/SOA context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Endpoint addressing and credentials.
    #[serde(default)]
    pub descriptor: ConnectionDescriptor,

    /// Path of the deployer service, relative to the service URL. The
    /// deployer client is derived from the primary connection's
    /// configuration and only built when first requested.
    #[serde(default = "default_deployer_path")]
    pub deployer_path: String,
}

impl WorkflowConfig {
    /// Create a configuration for the given endpoint.
    pub fn new(descriptor: ConnectionDescriptor) -> Self {
        Self {
            descriptor,
            deployer_path: default_deployer_path(),
        }
    }

    /// Set the deployer service path.
    pub fn with_deployer_path(mut self, path: impl Into<String>) -> Self {
        self.deployer_path = path.into();
        self
    }

    /// Validate the configuration. A principal is mandatory for workflow
    /// targets.
    pub fn validate(&self) -> ContextResult<()> {
        self.descriptor.validate_with_principal()
    }
}
