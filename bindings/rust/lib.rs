//! Rust bindings for the `tree-sitter-rcl` grammar.
//!
//! This follows the standard layout used by Tree-sitter grammars: the build
//! script links the generated parser and [`language`] returns a
//! `tree_sitter::Language` handle for the Rich Communication Language.
//!
//! Before a handle is handed out, the grammar is verified: the descriptor is
//! passed through an [`Engine`] and the resulting language must be non-null,
//! declare at least one node kind, match the engine's ABI range, and attach to
//! a parser. The same check runs against grammars loaded from shared
//! libraries via [`LibraryProvider`], and against test doubles through the
//! [`Engine`] and [`GrammarProvider`] seams.
//!
//! ```no_run
//! let language = tree_sitter_rcl::language().expect("Error loading Rich Communication Language grammar");
//! let mut parser = tree_sitter::Parser::new();
//! parser.set_language(&language).unwrap();
//! ```

use tree_sitter::Language;

mod binding;
mod config;
mod descriptor;
mod engine;
mod error;
mod library;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod verify;

#[cfg(rcl_node_types)]
pub use binding::NODE_TYPES;
pub use binding::{RclGrammar, GRAMMAR_LINKED};
pub use config::VerifierConfig;
pub use descriptor::{GrammarDescriptor, GrammarProvider};
pub use engine::{Engine, LanguageMetadata, TreeSitterEngine};
pub use error::{LoadError, LoadErrorKind};
pub use library::{language_symbol, library_file_name, LibraryProvider};
pub use verify::{verify_grammar_loads, LanguageHandle, VerificationState, Verifier};

/// Identity of the grammar, as declared by its `grammar.js`.
pub const GRAMMAR_NAME: &str = "rcl";

/// Human-readable grammar name used in diagnostics.
pub const DISPLAY_NAME: &str = "Rich Communication Language";

/// Returns the verified Tree-sitter [`Language`] for this grammar.
///
/// # Errors
///
/// Fails with [`LoadError`] when the generated parser was not linked into
/// this build or the linked grammar is incompatible with the tree-sitter
/// runtime.
pub fn language() -> Result<Language, LoadError> {
    verify_grammar_loads(&RclGrammar, &TreeSitterEngine, &VerifierConfig::default())
        .map(LanguageHandle::into_language)
}
