//! Metadata-store context configuration

use serde::{Deserialize, Serialize};

use tether_context::error::{ContextError, ContextResult};
use tether_context_database::config::DatabaseConfig;

/// Configuration for a metadata-store context.
///
/// The store persists inside a database; credentials and the connection URL
/// are owned by the composed database configuration and only read from
/// here. The store adds its registered instance name, the partition it
/// works against and the namespaces it serves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Name the store instance is registered under.
    pub name: String,

    /// Partition within the store.
    pub partition: String,

    /// The database endpoint the store persists in.
    pub database: DatabaseConfig,

    /// Namespaces served by the store, beyond the default namespace.
    #[serde(default)]
    pub namespaces: Vec<String>,
}

impl MetadataConfig {
    /// Create a configuration over the given database endpoint.
    pub fn new(
        name: impl Into<String>,
        partition: impl Into<String>,
        database: DatabaseConfig,
    ) -> Self {
        Self {
            name: name.into(),
            partition: partition.into(),
            database,
            namespaces: Vec::new(),
        }
    }

    /// Register an additional namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespaces.push(namespace.into());
        self
    }

    /// The account name, read from the database endpoint.
    pub fn username(&self) -> Option<&str> {
        self.database
            .descriptor
            .principal
            .as_ref()
            .map(|p| p.name())
    }

    /// The account credential, read from the database endpoint.
    pub fn password(&self) -> Option<&str> {
        self.database
            .descriptor
            .principal
            .as_ref()
            .map(|p| p.credential())
    }

    /// The connection URL, delegated to the database endpoint.
    pub fn connection_url(&self) -> ContextResult<String> {
        self.database.connection_url()
    }

    /// Validate the configuration: name and partition are mandatory, and
    /// the composed database endpoint must itself be valid.
    pub fn validate(&self) -> ContextResult<()> {
        if self.name.is_empty() {
            return Err(ContextError::missing_attribute("name"));
        }
        if self.partition.is_empty() {
            return Err(ContextError::missing_attribute("partition"));
        }
        self.database.validate()
    }
}
