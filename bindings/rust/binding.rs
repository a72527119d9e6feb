//! The statically linked RCL grammar.

#[cfg(rcl_grammar)]
use std::ffi::c_void;

use crate::descriptor::{GrammarDescriptor, GrammarProvider};
use crate::error::LoadErrorKind;

#[cfg(rcl_grammar)]
extern "C" {
    fn tree_sitter_rcl() -> *const c_void;
}

/// The contents of the generated `node-types.json`.
#[cfg(rcl_node_types)]
pub const NODE_TYPES: &str = include_str!("../../src/node-types.json");

/// Whether the build script found and compiled a generated parser.
pub const GRAMMAR_LINKED: bool = cfg!(rcl_grammar);

/// Provider for the grammar compiled into this crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct RclGrammar;

impl GrammarProvider for RclGrammar {
    #[cfg(rcl_grammar)]
    fn descriptor(&self) -> Result<GrammarDescriptor, LoadErrorKind> {
        // SAFETY: the generated parser returns a pointer to static tables.
        Ok(unsafe { GrammarDescriptor::from_raw(tree_sitter_rcl()) })
    }

    #[cfg(not(rcl_grammar))]
    fn descriptor(&self) -> Result<GrammarDescriptor, LoadErrorKind> {
        Err(LoadErrorKind::Missing(
            "src/parser.c was not generated when this crate was built".to_string(),
        ))
    }
}
