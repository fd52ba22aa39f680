//! URL template engine
//!
//! Substitutes `#{name}` placeholders in connection-string templates.
//! Used to build provider-specific service URLs (JDBC-style URLs, JMX
//! service addresses) from descriptor parts.

use std::collections::HashMap;

use regex::Regex;

use crate::error::{ContextError, ContextResult};

/// One group captures the placeholder name; names are one or more word or
/// space characters. Nested or escaped placeholders are not supported.
const PLACEHOLDER: &str = r"\#\{((?:\w|\s)+)\}";

/// Render `template` against `bindings` in a single left-to-right pass.
///
/// A placeholder whose name is bound to a non-empty value is replaced,
/// delimiters included. A placeholder that is unbound, or bound to an empty
/// value, stays verbatim in the output; substitution is best-effort, not
/// strict.
///
/// # Errors
///
/// Returns [`ContextError::Template`] if the placeholder pattern fails to
/// compile. With the fixed pattern above that cannot happen in practice, but
/// it is surfaced rather than swallowed.
pub fn render(template: &str, bindings: &HashMap<String, String>) -> ContextResult<String> {
    let pattern = Regex::new(PLACEHOLDER)
        .map_err(|e| ContextError::template(format!("placeholder pattern invalid: {e}")))?;

    let mut output = String::with_capacity(template.len());
    let mut cursor = 0;
    for captures in pattern.captures_iter(template) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        output.push_str(&template[cursor..whole.start()]);
        match bindings.get(&captures[1]) {
            Some(value) if !value.is_empty() => output.push_str(value),
            _ => output.push_str(whole.as_str()),
        }
        cursor = whole.end();
    }
    output.push_str(&template[cursor..]);
    Ok(output)
}

/// Convenience builder for template bindings.
#[derive(Debug, Clone, Default)]
pub struct Bindings(HashMap<String, String>);

impl Bindings {
    /// Create an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// The underlying map.
    #[must_use]
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.0
    }
}
