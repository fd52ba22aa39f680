//! Context type definitions
//!
//! Enums shared across the context family.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of target system a connection context addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextType {
    /// Relational database server.
    Database,
    /// LDAP directory server.
    Directory,
    /// RMI/JNDI application server.
    Rmi,
    /// JMX/MBean server endpoint.
    Jmx,
    /// Identity-manager endpoint layered on an application server.
    Identity,
    /// Metadata store persisted in a database.
    Metadata,
    /// Workflow/SOA composite server.
    Workflow,
}

impl ContextType {
    /// Get all known context types.
    #[must_use]
    pub fn all() -> &'static [ContextType] {
        &[
            ContextType::Database,
            ContextType::Directory,
            ContextType::Rmi,
            ContextType::Jmx,
            ContextType::Identity,
            ContextType::Metadata,
            ContextType::Workflow,
        ]
    }

    /// Get the string representation used in configuration files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextType::Database => "database",
            ContextType::Directory => "directory",
            ContextType::Rmi => "rmi",
            ContextType::Jmx => "jmx",
            ContextType::Identity => "identity",
            ContextType::Metadata => "metadata",
            ContextType::Workflow => "workflow",
        }
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContextType {
    type Err = ParseContextTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "database" => Ok(ContextType::Database),
            "directory" => Ok(ContextType::Directory),
            "rmi" => Ok(ContextType::Rmi),
            "jmx" => Ok(ContextType::Jmx),
            "identity" => Ok(ContextType::Identity),
            "metadata" => Ok(ContextType::Metadata),
            "workflow" => Ok(ContextType::Workflow),
            _ => Err(ParseContextTypeError(s.to_string())),
        }
    }
}

/// Error parsing a context type from string.
#[derive(Debug, Clone)]
pub struct ParseContextTypeError(String);

impl fmt::Display for ParseContextTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid context type '{}', expected one of: database, directory, rmi, jmx, identity, metadata, workflow",
            self.0
        )
    }
}

impl std::error::Error for ParseContextTypeError {}
