//! Connection descriptor
//!
//! The addressing bundle (protocol, host, port, timeouts, principal) every
//! context variant is configured from.

use serde::{Deserialize, Serialize};

use crate::error::{ContextError, ContextResult};
use crate::principal::SecurityPrincipal;

fn default_connect_timeout_ms() -> u64 {
    3_000
}

fn default_response_timeout_ms() -> u64 {
    60_000
}

/// Addressing and credential bundle for a single target endpoint.
///
/// Built once via the `with_*` methods, validated before the first
/// `connect()`, and treated as read-only afterwards. A descriptor may adopt
/// another descriptor's fields wholesale (see [`adopt`](Self::adopt)) which
/// replaces the reference-aliasing the surrounding build tooling used to
/// perform at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    /// Scheme part of the service URL (e.g. "ldap", "t3", "thin").
    #[serde(default)]
    pub protocol: String,

    /// Target hostname or IP address.
    #[serde(default)]
    pub host: String,

    /// Target port. Required before `connect()`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Timeout for establishing the provider connection, in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Timeout for reading on an already established connection, in
    /// milliseconds.
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,

    /// Security principal used to authenticate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<SecurityPrincipal>,

    /// Explicit service URL. When set it wins over the derived
    /// `protocol://host:port` form and over any vendor template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
}

impl Default for ConnectionDescriptor {
    fn default() -> Self {
        Self {
            protocol: String::new(),
            host: String::new(),
            port: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            response_timeout_ms: default_response_timeout_ms(),
            principal: None,
            service_url: None,
        }
    }
}

impl ConnectionDescriptor {
    /// Create a descriptor for the given endpoint parts.
    pub fn new(protocol: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            port: Some(port),
            ..Self::default()
        }
    }

    /// Set the principal.
    #[must_use]
    pub fn with_principal(mut self, principal: SecurityPrincipal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub fn with_connect_timeout_ms(mut self, millis: u64) -> Self {
        self.connect_timeout_ms = millis;
        self
    }

    /// Set the response timeout.
    #[must_use]
    pub fn with_response_timeout_ms(mut self, millis: u64) -> Self {
        self.response_timeout_ms = millis;
        self
    }

    /// Set an explicit service URL override.
    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = Some(url.into());
        self
    }

    /// Get the connect timeout as a Duration.
    pub fn connect_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.connect_timeout_ms)
    }

    /// Get the response timeout as a Duration.
    pub fn response_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.response_timeout_ms)
    }

    /// Validate the addressing parts: protocol, host and port must be
    /// present before any connection attempt.
    pub fn validate(&self) -> ContextResult<()> {
        if self.protocol.is_empty() {
            return Err(ContextError::missing_attribute("protocol"));
        }
        if self.host.is_empty() {
            return Err(ContextError::missing_attribute("host"));
        }
        if self.port.is_none() {
            return Err(ContextError::missing_attribute("port"));
        }
        Ok(())
    }

    /// Validate addressing plus the principal, which most variants require.
    pub fn validate_with_principal(&self) -> ContextResult<()> {
        let principal = self
            .principal
            .as_ref()
            .ok_or_else(|| ContextError::missing_attribute("principal"))?;
        principal.validate()?;
        self.validate()
    }

    /// The service URL: the explicit override when set, otherwise derived
    /// from the parts as `protocol://host:port`.
    pub fn service_url(&self) -> ContextResult<String> {
        if let Some(url) = &self.service_url {
            if !url.is_empty() {
                return Ok(url.clone());
            }
        }
        self.validate()?;
        let port = self.port.unwrap_or_default();
        Ok(format!("{}://{}:{}", self.protocol, self.host, port))
    }

    /// Adopt every addressing field from `other`, replacing this
    /// descriptor's values.
    ///
    /// Explicit replacement for the `refid` aliasing of the legacy
    /// configuration surface: one descriptor takes over another's endpoint
    /// and credentials in a single, visible step.
    pub fn adopt(&mut self, other: &ConnectionDescriptor) {
        self.protocol = other.protocol.clone();
        self.host = other.host.clone();
        self.port = other.port;
        self.connect_timeout_ms = other.connect_timeout_ms;
        self.response_timeout_ms = other.response_timeout_ms;
        self.principal = other.principal.clone();
        self.service_url = other.service_url.clone();
    }

    /// Create a redacted copy (for logging/display).
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.principal = copy.principal.map(|p| p.redacted());
        copy
    }
}
