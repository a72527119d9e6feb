//! Verifier configuration.

use serde::Deserialize;

use crate::{DISPLAY_NAME, GRAMMAR_NAME};

/// Settings for a grammar-load verification.
///
/// Defaults describe the RCL grammar. Unknown fields are rejected so typos in
/// a host's config file fail loudly instead of being ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierConfig {
    /// Identity of the grammar; becomes the name on the verified handle.
    pub grammar_name: String,
    /// Human-readable name used in error messages.
    pub display_name: String,
    /// Treat a grammar with zero node kinds as empty.
    pub require_symbols: bool,
}

impl VerifierConfig {
    pub fn new(grammar_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            grammar_name: grammar_name.into(),
            display_name: display_name.into(),
            ..Self::default()
        }
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            grammar_name: GRAMMAR_NAME.to_string(),
            display_name: DISPLAY_NAME.to_string(),
            require_symbols: true,
        }
    }
}
