//! The parsing-engine seam.
//!
//! The verifier never talks to the tree-sitter runtime directly; it goes
//! through [`Engine`], so tests can swap in an engine that returns controlled
//! null and non-null results.

use std::ops::RangeInclusive;

use tree_sitter::{Language, Parser};

use crate::descriptor::GrammarDescriptor;

/// Shape of a constructed language as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguageMetadata {
    /// ABI version the grammar was generated for.
    pub abi_version: usize,
    /// Number of node kinds (symbols) in the grammar.
    pub node_kind_count: usize,
    /// Number of distinct field names.
    pub field_count: usize,
}

/// A parsing engine able to build languages from grammar descriptors.
pub trait Engine {
    /// The engine's language handle type.
    type Language;

    /// Builds a language from `descriptor`. `None` is a null handle.
    fn new_language(&self, descriptor: GrammarDescriptor) -> Option<Self::Language>;

    /// Reports the grammar's ABI version and symbol counts.
    fn metadata(&self, language: &Self::Language) -> LanguageMetadata;

    /// ABI versions this engine can parse with.
    fn supported_abi(&self) -> RangeInclusive<usize>;

    /// Attaches the language to a fresh parser, returning the engine's
    /// reason on refusal.
    fn attach(&self, language: &Self::Language) -> Result<(), String>;
}

impl<E: Engine + ?Sized> Engine for &E {
    type Language = E::Language;

    fn new_language(&self, descriptor: GrammarDescriptor) -> Option<Self::Language> {
        (**self).new_language(descriptor)
    }

    fn metadata(&self, language: &Self::Language) -> LanguageMetadata {
        (**self).metadata(language)
    }

    fn supported_abi(&self) -> RangeInclusive<usize> {
        (**self).supported_abi()
    }

    fn attach(&self, language: &Self::Language) -> Result<(), String> {
        (**self).attach(language)
    }
}

/// The linked tree-sitter runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeSitterEngine;

impl TreeSitterEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Engine for TreeSitterEngine {
    type Language = Language;

    fn new_language(&self, descriptor: GrammarDescriptor) -> Option<Language> {
        if descriptor.is_null() {
            return None;
        }
        // SAFETY: non-null, and the descriptor's constructor vouched for the tables.
        Some(unsafe { Language::from_raw(descriptor.as_ptr().cast()) })
    }

    fn metadata(&self, language: &Language) -> LanguageMetadata {
        LanguageMetadata {
            abi_version: language.version(),
            node_kind_count: language.node_kind_count(),
            field_count: language.field_count(),
        }
    }

    fn supported_abi(&self) -> RangeInclusive<usize> {
        tree_sitter::MIN_COMPATIBLE_LANGUAGE_VERSION..=tree_sitter::LANGUAGE_VERSION
    }

    fn attach(&self, language: &Language) -> Result<(), String> {
        let mut parser = Parser::new();
        parser.set_language(language).map_err(|e| e.to_string())
    }
}
