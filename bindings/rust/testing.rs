//! Test doubles for the engine seam.
//!
//! [`FakeEngine`] never dereferences a descriptor, so verification can be
//! driven through every outcome without a compiled grammar.

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::descriptor::GrammarDescriptor;
use crate::engine::{Engine, LanguageMetadata};

/// How a [`FakeEngine`] responds to non-null descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeBehavior {
    /// Build a language with the given metadata.
    Valid(LanguageMetadata),
    /// Return a null handle.
    NullHandle,
    /// Build a language, then refuse to attach it.
    Rejects(String),
}

/// A language built by [`FakeEngine`]. `id` is unique per construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeLanguage {
    pub id: usize,
    pub metadata: LanguageMetadata,
}

#[derive(Debug)]
pub struct FakeEngine {
    behavior: FakeBehavior,
    abi: RangeInclusive<usize>,
    constructed: AtomicUsize,
}

impl FakeEngine {
    pub fn new(behavior: FakeBehavior) -> Self {
        Self {
            behavior,
            abi: 13..=14,
            constructed: AtomicUsize::new(0),
        }
    }

    /// An engine that builds a plausible grammar.
    pub fn valid() -> Self {
        Self::new(FakeBehavior::Valid(rcl_metadata()))
    }

    pub fn with_abi(mut self, abi: RangeInclusive<usize>) -> Self {
        self.abi = abi;
        self
    }

    /// How many languages this engine has built.
    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }
}

impl Engine for FakeEngine {
    type Language = FakeLanguage;

    fn new_language(&self, descriptor: GrammarDescriptor) -> Option<FakeLanguage> {
        if descriptor.is_null() {
            return None;
        }
        let metadata = match &self.behavior {
            FakeBehavior::Valid(metadata) => *metadata,
            FakeBehavior::NullHandle => return None,
            FakeBehavior::Rejects(_) => rcl_metadata(),
        };
        let id = self.constructed.fetch_add(1, Ordering::SeqCst) + 1;
        Some(FakeLanguage { id, metadata })
    }

    fn metadata(&self, language: &FakeLanguage) -> LanguageMetadata {
        language.metadata
    }

    fn supported_abi(&self) -> RangeInclusive<usize> {
        self.abi.clone()
    }

    fn attach(&self, _language: &FakeLanguage) -> Result<(), String> {
        match &self.behavior {
            FakeBehavior::Rejects(reason) => Err(reason.clone()),
            _ => Ok(()),
        }
    }
}

/// Metadata shaped like a real RCL build.
pub fn rcl_metadata() -> LanguageMetadata {
    LanguageMetadata {
        abi_version: 14,
        node_kind_count: 96,
        field_count: 12,
    }
}

/// A non-null descriptor pointing at dummy bytes. Only [`FakeEngine`] may read it.
pub fn fake_descriptor() -> GrammarDescriptor {
    static TABLES: [u8; 16] = [0; 16];
    // SAFETY: FakeEngine never dereferences the descriptor.
    unsafe { GrammarDescriptor::from_raw(TABLES.as_ptr().cast()) }
}
