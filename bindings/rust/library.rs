//! Grammars compiled into shared libraries.

use std::ffi::c_void;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use tracing::debug;

use crate::descriptor::{GrammarDescriptor, GrammarProvider};
use crate::error::LoadErrorKind;

type LanguageFn = unsafe extern "C" fn() -> *const c_void;

/// Loads a grammar from a shared library exporting `tree_sitter_<name>`.
///
/// A successfully opened library is never unloaded, so languages built from
/// its descriptor stay valid for the rest of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryProvider {
    path: PathBuf,
    symbol: String,
}

impl LibraryProvider {
    /// Provider for the library at `path` exporting grammar `grammar_name`.
    pub fn new(path: impl Into<PathBuf>, grammar_name: &str) -> Self {
        Self {
            path: path.into(),
            symbol: language_symbol(grammar_name),
        }
    }

    /// Provider for the platform-named library of `grammar_name` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>, grammar_name: &str) -> Self {
        Self::new(
            dir.as_ref().join(library_file_name(grammar_name)),
            grammar_name,
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the exported constructor, e.g. `tree_sitter_rcl`.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl GrammarProvider for LibraryProvider {
    fn descriptor(&self) -> Result<GrammarDescriptor, LoadErrorKind> {
        if !self.path.exists() {
            return Err(LoadErrorKind::Missing(format!(
                "{} does not exist",
                self.path.display()
            )));
        }

        debug!(path = %self.path.display(), symbol = %self.symbol, "Opening grammar library");

        // SAFETY: loading a tree-sitter grammar, which has no initializers.
        let library = unsafe { Library::new(&self.path) }
            .map_err(|e| LoadErrorKind::Corrupt(format!("{}: {e}", self.path.display())))?;

        let constructor: LanguageFn = {
            // SAFETY: tree-sitter grammars export `tree_sitter_<name>` with this signature.
            let symbol: Symbol<LanguageFn> = unsafe { library.get(self.symbol.as_bytes()) }
                .map_err(|_| {
                    LoadErrorKind::Missing(format!(
                        "{} does not export {}",
                        self.path.display(),
                        self.symbol
                    ))
                })?;
            *symbol
        };

        // SAFETY: the constructor only returns a pointer to static tables.
        let raw = unsafe { constructor() };
        std::mem::forget(library);

        // SAFETY: the library stays mapped because it was forgotten above.
        Ok(unsafe { GrammarDescriptor::from_raw(raw) })
    }
}

/// Exported constructor name for a grammar.
pub fn language_symbol(grammar_name: &str) -> String {
    format!("tree_sitter_{}", grammar_name.replace('-', "_"))
}

/// Platform-specific library file name for a grammar.
pub fn library_file_name(grammar_name: &str) -> String {
    let safe_name = grammar_name.replace('-', "_");
    #[cfg(target_os = "macos")]
    {
        format!("lib{safe_name}.dylib")
    }
    #[cfg(target_os = "windows")]
    {
        format!("{safe_name}.dll")
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        format!("lib{safe_name}.so")
    }
}
