//! Context error types
//!
//! Error definitions with transient/permanent classification for retry logic.

use thiserror::Error;

/// Error that can occur while establishing or releasing a connection context.
#[derive(Debug, Error)]
pub enum ContextError {
    /// A required configuration attribute is missing or empty.
    ///
    /// Raised before any I/O is attempted; never retried.
    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    /// A connection-string template could not be rendered.
    ///
    /// A configuration or programming defect, not a transient condition.
    #[error("template error: {message}")]
    Template { message: String },

    /// The provider could not be reached (unresolvable host, refused
    /// connection, timeout).
    #[error("connection failed: {message}")]
    Connectivity {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Credentials rejected by the provider. Never retried.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// Any other provider-native failure.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ContextError {
    /// Check if this error is transient and a connection attempt may be
    /// retried.
    ///
    /// Only connectivity faults qualify; authentication and configuration
    /// failures require intervention and retrying them cannot succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ContextError::Connectivity { .. })
    }

    /// Check if this error is permanent and retry won't help.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            ContextError::Configuration { .. } => "INVALID_CONFIG",
            ContextError::Template { .. } => "TEMPLATE_ERROR",
            ContextError::Connectivity { .. } => "CONNECTION_FAILED",
            ContextError::Authentication { .. } => "AUTH_FAILED",
            ContextError::Provider { .. } => "PROVIDER_ERROR",
        }
    }

    /// Walk the source chain down to the innermost cause and return its
    /// rendering.
    ///
    /// Providers that nest failures (JMX connectors in particular) report the
    /// outermost wrapper; diagnostics want the root.
    pub fn root_cause_message(&self) -> String {
        let mut current: &dyn std::error::Error = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current.to_string()
    }

    // Convenience constructors

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        ContextError::Configuration {
            message: message.into(),
        }
    }

    /// Create a configuration error for a missing mandatory attribute.
    pub fn missing_attribute(name: &str) -> Self {
        ContextError::Configuration {
            message: format!("attribute '{name}' is required"),
        }
    }

    /// Create a template error.
    pub fn template(message: impl Into<String>) -> Self {
        ContextError::Template {
            message: message.into(),
        }
    }

    /// Create a connectivity error.
    pub fn connectivity(message: impl Into<String>) -> Self {
        ContextError::Connectivity {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connectivity error with source.
    pub fn connectivity_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ContextError::Connectivity {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        ContextError::Authentication {
            message: message.into(),
        }
    }

    /// Create a provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        ContextError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Create a provider error with source.
    pub fn provider_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ContextError::Provider {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for context operations.
pub type ContextResult<T> = Result<T, ContextError>;
