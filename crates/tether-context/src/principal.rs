//! Security principal
//!
//! Name/credential pair used to authenticate against a target system.

use serde::{Deserialize, Serialize};

use crate::error::{ContextError, ContextResult};

/// A name/credential pair. Immutable once constructed.
#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityPrincipal {
    /// Account name presented to the target system.
    name: String,

    /// Credential for the account (stored encrypted at rest by the
    /// surrounding tooling; redacted from any rendering here).
    credential: String,
}

impl SecurityPrincipal {
    /// Create a new principal.
    pub fn new(name: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            credential: credential.into(),
        }
    }

    /// The account name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The account credential.
    #[must_use]
    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// Validate the principal: both parts must be non-empty.
    pub fn validate(&self) -> ContextResult<()> {
        if self.name.is_empty() {
            return Err(ContextError::missing_attribute("username"));
        }
        if self.credential.is_empty() {
            return Err(ContextError::missing_attribute("password"));
        }
        Ok(())
    }

    /// Create a redacted copy (for logging/display).
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            name: self.name.clone(),
            credential: "***REDACTED***".to_string(),
        }
    }
}

impl std::fmt::Debug for SecurityPrincipal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityPrincipal")
            .field("name", &self.name)
            .field("credential", &"***REDACTED***")
            .finish()
    }
}
