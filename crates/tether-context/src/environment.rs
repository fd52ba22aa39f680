//! Provider environment
//!
//! The key/value bag a context hands to its provider when opening a
//! connection.

use std::collections::btree_map;
use std::collections::BTreeMap;

/// Well-known environment keys shared by several context variants.
///
/// Variant crates add their own keys next to these.
pub mod keys {
    /// Fully qualified name of the factory the provider should instantiate.
    pub const CONTEXT_FACTORY: &str = "context.factory";
    /// The service URL the provider should dial.
    pub const PROVIDER_URL: &str = "provider.url";
    /// Account name presented to the target system.
    pub const SECURITY_PRINCIPAL: &str = "security.principal";
    /// Credential for the account.
    pub const SECURITY_CREDENTIALS: &str = "security.credentials";
    /// Timeout for establishing the connection, in milliseconds.
    pub const CONNECT_TIMEOUT: &str = "connect.timeout";
    /// Timeout for reading on an established connection, in milliseconds.
    pub const RESPONSE_TIMEOUT: &str = "response.timeout";
}

/// Keys whose values are redacted from any rendering of the environment.
const SENSITIVE: &[&str] = &[keys::SECURITY_CREDENTIALS, "password"];

/// Ordered key/value bag passed to [`ProviderClient::open`].
///
/// Ordering is deterministic (sorted by key) so log output and tests are
/// stable.
///
/// [`ProviderClient::open`]: crate::provider::ProviderClient::open
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Environment {
    entries: BTreeMap<String, String>,
}

impl Environment {
    /// Create an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up an entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the environment is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Environment {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.entries {
            if SENSITIVE.iter().any(|s| key.contains(s)) {
                map.entry(key, &"***REDACTED***");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let env = Environment::new()
            .with(keys::PROVIDER_URL, "ldap://ds:389")
            .with(keys::SECURITY_PRINCIPAL, "cn=admin");

        assert_eq!(env.get(keys::PROVIDER_URL), Some("ldap://ds:389"));
        assert_eq!(env.len(), 2);
        assert!(!env.is_empty());
    }

    #[test]
    fn later_insert_wins() {
        let env = Environment::new().with("k", "a").with("k", "b");
        assert_eq!(env.get("k"), Some("b"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn iteration_is_key_ordered() {
        let env = Environment::new().with("b", "2").with("a", "1");
        let keys: Vec<_> = env.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn debug_redacts_credentials() {
        let env = Environment::new()
            .with(keys::SECURITY_CREDENTIALS, "hunter2")
            .with("user.password", "hunter2")
            .with(keys::SECURITY_PRINCIPAL, "admin");

        let rendered = format!("{env:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("admin"));
    }
}
