//! Errors reported when a grammar fails to load.
//!
//! There is a single error type, [`LoadError`], carrying the grammar's display
//! name and the [`LoadErrorKind`] that stopped verification. Every failure is
//! structural (a bad build artifact or a version mismatch), so nothing here is
//! retryable.

use thiserror::Error;

/// Why a grammar could not be turned into a usable language handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadErrorKind {
    /// The compiled grammar artifact (binding symbol or shared library) is absent.
    #[error("grammar artifact missing: {0}")]
    Missing(String),

    /// The artifact exists but cannot be loaded.
    #[error("grammar artifact corrupt: {0}")]
    Corrupt(String),

    /// The engine's language constructor returned a null handle.
    #[error("language constructor returned a null handle")]
    NullHandle,

    /// The grammar declares no node kinds.
    #[error("language handle is empty (no node kinds)")]
    Empty,

    /// The grammar was generated for an ABI the linked engine cannot read.
    #[error("incompatible language version {version}, engine supports {min}..={max}")]
    IncompatibleVersion {
        version: usize,
        min: usize,
        max: usize,
    },

    /// The engine refused to attach the language to a parser.
    #[error("engine rejected the language: {0}")]
    Rejected(String),
}

/// A failed grammar load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error loading {grammar} grammar: {kind}")]
pub struct LoadError {
    /// Human-readable grammar name, e.g. "Rich Communication Language".
    pub grammar: String,
    /// The reason verification stopped.
    pub kind: LoadErrorKind,
}

impl LoadError {
    /// Creates a load error for the named grammar.
    #[must_use]
    pub fn new(grammar: impl Into<String>, kind: LoadErrorKind) -> Self {
        Self {
            grammar: grammar.into(),
            kind,
        }
    }

    /// Returns the failure reason.
    #[must_use]
    pub fn kind(&self) -> &LoadErrorKind {
        &self.kind
    }
}
