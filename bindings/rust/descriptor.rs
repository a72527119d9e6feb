//! Grammar descriptors and the providers that hand them out.

use std::ffi::c_void;
use std::fmt;

use crate::error::LoadErrorKind;

/// Opaque pointer to the parse tables emitted by the grammar compiler.
///
/// The tables are immutable once produced, so a descriptor is `Copy` and may
/// be shared across threads. A descriptor can be null; engines must treat a
/// null descriptor as "no grammar" rather than reading through it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct GrammarDescriptor {
    raw: *const c_void,
}

// SAFETY: the pointee is read-only static data produced by the grammar compiler.
unsafe impl Send for GrammarDescriptor {}
unsafe impl Sync for GrammarDescriptor {}

impl GrammarDescriptor {
    /// A zeroed descriptor.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            raw: std::ptr::null(),
        }
    }

    /// Wraps a pointer returned by a grammar's `tree_sitter_<name>` function.
    ///
    /// # Safety
    ///
    /// If non-null, `raw` must point to grammar tables that stay valid for as
    /// long as any language built from this descriptor is in use.
    #[must_use]
    pub const unsafe fn from_raw(raw: *const c_void) -> Self {
        Self { raw }
    }

    #[must_use]
    pub const fn as_ptr(self) -> *const c_void {
        self.raw
    }

    #[must_use]
    pub fn is_null(self) -> bool {
        self.raw.is_null()
    }
}

impl fmt::Debug for GrammarDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GrammarDescriptor").field(&self.raw).finish()
    }
}

/// Source of a [`GrammarDescriptor`].
///
/// Implemented by the statically linked binding ([`RclGrammar`]), by
/// [`LibraryProvider`] for shared libraries, and by a bare descriptor so tests
/// can substitute one directly.
///
/// [`RclGrammar`]: crate::RclGrammar
/// [`LibraryProvider`]: crate::LibraryProvider
pub trait GrammarProvider {
    /// Produces the descriptor, or the reason the artifact is unavailable.
    fn descriptor(&self) -> Result<GrammarDescriptor, LoadErrorKind>;
}

impl GrammarProvider for GrammarDescriptor {
    fn descriptor(&self) -> Result<GrammarDescriptor, LoadErrorKind> {
        Ok(*self)
    }
}

impl<P: GrammarProvider + ?Sized> GrammarProvider for &P {
    fn descriptor(&self) -> Result<GrammarDescriptor, LoadErrorKind> {
        (**self).descriptor()
    }
}

impl<P: GrammarProvider + ?Sized> GrammarProvider for Box<P> {
    fn descriptor(&self) -> Result<GrammarDescriptor, LoadErrorKind> {
        (**self).descriptor()
    }
}
