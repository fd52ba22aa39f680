//! Database context configuration
//!
//! Vendor presets (driver identifier + connection-string template) and the
//! configuration bundle for database targets.

use serde::{Deserialize, Serialize};

use tether_context::descriptor::ConnectionDescriptor;
use tether_context::error::ContextResult;
use tether_context::retry::RetryPolicy;
use tether_context::template::{render, Bindings};

/// Database vendor a context can address.
///
/// Each vendor carries a fixed driver identifier and a fixed connection
/// string template; both are handed to the provider verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseVendor {
    /// Oracle Database.
    Oracle,
    /// MySQL Server.
    Mysql,
    /// Microsoft SQL Server.
    Sqlserver,
    /// Sybase Adaptive Server.
    Sybase,
    /// IBM DB2 Universal Database.
    Db2,
}

impl DatabaseVendor {
    /// Get all supported vendors.
    #[must_use]
    pub fn all() -> &'static [DatabaseVendor] {
        &[
            DatabaseVendor::Oracle,
            DatabaseVendor::Mysql,
            DatabaseVendor::Sqlserver,
            DatabaseVendor::Sybase,
            DatabaseVendor::Db2,
        ]
    }

    /// The string representation used in configuration files and as the
    /// `type` template binding.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseVendor::Oracle => "oracle",
            DatabaseVendor::Mysql => "mysql",
            DatabaseVendor::Sqlserver => "sqlserver",
            DatabaseVendor::Sybase => "sybase",
            DatabaseVendor::Db2 => "db2",
        }
    }

    /// The fixed driver identifier for this vendor.
    #[must_use]
    pub fn driver(&self) -> &'static str {
        match self {
            DatabaseVendor::Oracle => "oracle.jdbc.OracleDriver",
            DatabaseVendor::Mysql => "com.mysql.jdbc.Driver",
            DatabaseVendor::Sqlserver => "com.microsoft.sqlserver.jdbc.SQLServerDriver",
            DatabaseVendor::Sybase => "com.sybase.jdbc2.jdbc.SybDriver",
            DatabaseVendor::Db2 => "com.ibm.db2.jcc.DB2Driver",
        }
    }

    /// The fixed connection-string template for this vendor.
    ///
    /// Placeholders are resolved from the context's descriptor; unresolvable
    /// placeholders stay verbatim.
    #[must_use]
    pub fn url_template(&self) -> &'static str {
        match self {
            DatabaseVendor::Oracle => "jdbc:#{type}:#{protocol}:@#{host}:#{port}/#{database}",
            DatabaseVendor::Mysql => "jdbc:#{type}://#{host}:#{port}/#{database}",
            DatabaseVendor::Sqlserver => "jdbc:#{type}:sqlserver://#{host}:#{port}",
            DatabaseVendor::Sybase => "jdbc:#{type}:Tds:#{host}:#{port}",
            DatabaseVendor::Db2 => "jdbc:#{type}://#{host}:#{port}/#{database}",
        }
    }

    /// The conventional port for this vendor.
    #[must_use]
    pub fn default_port(&self) -> u16 {
        match self {
            DatabaseVendor::Oracle => 1521,
            DatabaseVendor::Mysql => 3306,
            DatabaseVendor::Sqlserver => 1433,
            DatabaseVendor::Sybase => 5000,
            DatabaseVendor::Db2 => 50000,
        }
    }
}

impl std::fmt::Display for DatabaseVendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for a database context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Vendor of the target server.
    pub vendor: DatabaseVendor,

    /// Name of the database (service name, schema or catalog depending on
    /// the vendor).
    #[serde(default)]
    pub database: String,

    /// Endpoint addressing and credentials.
    #[serde(default)]
    pub descriptor: ConnectionDescriptor,

    /// Retry policy around the provider-open call. This is the one context
    /// family member with a non-degenerate default.
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl DatabaseConfig {
    /// Create a configuration for the given vendor and endpoint.
    pub fn new(vendor: DatabaseVendor, descriptor: ConnectionDescriptor) -> Self {
        Self {
            vendor,
            database: String::new(),
            descriptor,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Validate the configuration. A principal is mandatory for database
    /// targets.
    pub fn validate(&self) -> ContextResult<()> {
        self.descriptor.validate_with_principal()
    }

    /// The connection URL: the descriptor's explicit override when present,
    /// otherwise the vendor template resolved from the descriptor parts.
    ///
    /// Placeholders without a usable binding stay verbatim.
    pub fn connection_url(&self) -> ContextResult<String> {
        if let Some(url) = &self.descriptor.service_url {
            if !url.is_empty() {
                return Ok(url.clone());
            }
        }

        let mut bindings = Bindings::new()
            .with("type", self.vendor.as_str())
            .with("protocol", self.descriptor.protocol.clone())
            .with("host", self.descriptor.host.clone())
            .with("database", self.database.clone());
        if let Some(port) = self.descriptor.port {
            bindings = bindings.with("port", port.to_string());
        }
        render(self.vendor.url_template(), bindings.as_map())
    }

    /// Create a redacted copy (for logging/display).
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.descriptor = copy.descriptor.redacted();
        copy
    }
}
