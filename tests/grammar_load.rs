use std::ffi::c_void;
use std::ops::RangeInclusive;
#[cfg(any(target_os = "linux", target_os = "macos"))]
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rstest::rstest;
use tree_sitter_rcl::{
    language, library_file_name, verify_grammar_loads, Engine, GrammarDescriptor,
    LanguageMetadata, LibraryProvider, LoadErrorKind, TreeSitterEngine, VerificationState,
    Verifier, VerifierConfig, GRAMMAR_LINKED,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Engine whose languages are just construction counters.
struct CountingEngine {
    node_kinds: usize,
    abi_version: usize,
    built: AtomicUsize,
}

impl CountingEngine {
    fn new(node_kinds: usize, abi_version: usize) -> Self {
        Self {
            node_kinds,
            abi_version,
            built: AtomicUsize::new(0),
        }
    }
}

impl Engine for CountingEngine {
    type Language = usize;

    fn new_language(&self, descriptor: GrammarDescriptor) -> Option<usize> {
        if descriptor.is_null() {
            return None;
        }
        Some(self.built.fetch_add(1, Ordering::SeqCst))
    }

    fn metadata(&self, _language: &usize) -> LanguageMetadata {
        LanguageMetadata {
            abi_version: self.abi_version,
            node_kind_count: self.node_kinds,
            field_count: 0,
        }
    }

    fn supported_abi(&self) -> RangeInclusive<usize> {
        13..=14
    }

    fn attach(&self, _language: &usize) -> Result<(), String> {
        Ok(())
    }
}

fn stand_in_descriptor() -> GrammarDescriptor {
    static TABLES: [u64; 2] = [0; 2];
    // SAFETY: only CountingEngine sees this descriptor and it never reads it.
    unsafe { GrammarDescriptor::from_raw(TABLES.as_ptr().cast::<c_void>()) }
}

fn json_descriptor() -> GrammarDescriptor {
    let raw = tree_sitter_json::language().into_raw();
    // SAFETY: the JSON grammar's tables are static data linked into this binary.
    unsafe { GrammarDescriptor::from_raw(raw.cast::<c_void>()) }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
const UNRELATED_EXPORT_SOURCE: &str = "int rcl_unrelated(void) { return 0; }\n";

#[cfg(any(target_os = "linux", target_os = "macos"))]
const NULL_CONSTRUCTOR_SOURCE: &str = "const void *tree_sitter_rcl(void) { return 0; }\n";

/// Compiles `source` into the platform-named RCL library inside `dir`.
#[cfg(any(target_os = "linux", target_os = "macos"))]
fn build_fixture_library(dir: &Path, source: &str) -> PathBuf {
    let target = if cfg!(target_os = "macos") {
        format!("{}-apple-darwin", std::env::consts::ARCH)
    } else {
        format!("{}-unknown-linux-gnu", std::env::consts::ARCH)
    };
    let compiler = cc::Build::new()
        .cargo_metadata(false)
        .warnings(false)
        .debug(false)
        .opt_level(0)
        .host(&target)
        .target(&target)
        .get_compiler();

    let src_path = dir.join("fixture.c");
    std::fs::write(&src_path, source).unwrap();
    let lib_path = dir.join(library_file_name("rcl"));

    let status = compiler
        .to_command()
        .args(["-shared", "-fPIC", "-o"])
        .arg(&lib_path)
        .arg(&src_path)
        .status()
        .unwrap();
    assert!(status.success(), "failed to compile fixture library");
    lib_path
}

#[test]
fn linked_grammar_loads_or_reports_missing() {
    init_tracing();
    if GRAMMAR_LINKED {
        let language = language().unwrap();
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&language).unwrap();
    } else {
        let err = language().unwrap_err();
        assert!(matches!(err.kind(), LoadErrorKind::Missing(_)));
    }
}

#[test]
fn real_grammar_verifies_through_tree_sitter() {
    init_tracing();
    let config = VerifierConfig::new("json", "JSON");
    let first = verify_grammar_loads(&json_descriptor(), &TreeSitterEngine, &config).unwrap();
    let second = verify_grammar_loads(&json_descriptor(), &TreeSitterEngine, &config).unwrap();

    assert_eq!(first.name(), "json");
    let abi_version = first.metadata().abi_version;
    assert!(TreeSitterEngine.supported_abi().contains(&abi_version));
    assert!(first.metadata().node_kind_count > 0);
    assert_eq!(first.metadata(), second.metadata());

    let mut parser = tree_sitter::Parser::new();
    parser.set_language(second.language()).unwrap();
    let tree = parser.parse(r#"{"channel": ["sms", "rcs"]}"#, None).unwrap();
    assert!(!tree.root_node().has_error());
}

#[test]
fn real_grammar_verifier_reaches_verified() {
    let config = VerifierConfig::new("json", "JSON");
    let mut verifier = Verifier::new(json_descriptor(), TreeSitterEngine, config);
    assert!(verifier.run().is_verified());

    let handle = verifier.into_result().unwrap();
    assert_eq!(handle.name(), "json");
    assert!(handle.into_language().node_kind_count() > 0);
}

#[test]
fn zeroed_descriptor_fails_with_diagnostic() {
    init_tracing();
    let err = verify_grammar_loads(
        &GrammarDescriptor::null(),
        &TreeSitterEngine,
        &VerifierConfig::default(),
    )
    .unwrap_err();
    assert!(err
        .to_string()
        .contains("Error loading Rich Communication Language grammar"));
}

#[test]
fn valid_descriptor_yields_rcl_handle() {
    init_tracing();
    let engine = CountingEngine::new(40, 14);
    let handle =
        verify_grammar_loads(&stand_in_descriptor(), &engine, &VerifierConfig::default()).unwrap();
    assert_eq!(handle.name(), "rcl");
    assert_eq!(handle.metadata().node_kind_count, 40);
}

#[test]
fn repeated_verification_is_idempotent() {
    let engine = CountingEngine::new(40, 14);
    let config = VerifierConfig::default();
    let first = verify_grammar_loads(&stand_in_descriptor(), &engine, &config).unwrap();
    let second = verify_grammar_loads(&stand_in_descriptor(), &engine, &config).unwrap();

    assert_eq!(first.name(), second.name());
    assert_eq!(first.metadata(), second.metadata());
    assert_ne!(first.language(), second.language());
}

#[rstest]
#[case::no_symbols(0, 14)]
#[case::too_old(40, 12)]
#[case::too_new(40, 15)]
fn broken_grammar_never_yields_handle(#[case] node_kinds: usize, #[case] abi_version: usize) {
    init_tracing();
    let engine = CountingEngine::new(node_kinds, abi_version);
    let mut verifier = Verifier::new(stand_in_descriptor(), &engine, VerifierConfig::default());

    let state = verifier.run();
    assert!(state.handle().is_none());
    let err = state.error().unwrap();
    assert!(matches!(
        err.kind(),
        LoadErrorKind::Empty | LoadErrorKind::IncompatibleVersion { .. }
    ));
}

#[test]
fn verifier_state_moves_once() {
    let engine = CountingEngine::new(40, 14);
    let mut verifier = Verifier::new(stand_in_descriptor(), &engine, VerifierConfig::default());
    assert!(matches!(verifier.state(), VerificationState::Unverified));

    verifier.run();
    verifier.run();
    assert!(verifier.state().is_verified());
    assert_eq!(engine.built.load(Ordering::SeqCst), 1);
}

#[test]
fn missing_library_reports_missing_artifact() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let provider = LibraryProvider::in_dir(dir.path(), "rcl");

    let err = verify_grammar_loads(&provider, &TreeSitterEngine, &VerifierConfig::default())
        .unwrap_err();
    assert!(matches!(err.kind(), LoadErrorKind::Missing(_)));

    let message = err.to_string();
    assert!(message.starts_with("Error loading Rich Communication Language grammar"));
    assert!(message.contains("grammar artifact missing"));
}

#[test]
fn corrupt_library_reports_corrupt_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(library_file_name("rcl"));
    std::fs::write(&path, b"\0\0\0\0 definitely not a grammar").unwrap();

    let provider = LibraryProvider::new(&path, "rcl");
    let err = verify_grammar_loads(&provider, &TreeSitterEngine, &VerifierConfig::default())
        .unwrap_err();
    assert!(matches!(err.kind(), LoadErrorKind::Corrupt(_)));
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[test]
fn library_without_constructor_reports_missing_symbol() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = build_fixture_library(dir.path(), UNRELATED_EXPORT_SOURCE);

    let provider = LibraryProvider::new(&path, "rcl");
    let err = verify_grammar_loads(&provider, &TreeSitterEngine, &VerifierConfig::default())
        .unwrap_err();
    assert!(matches!(err.kind(), LoadErrorKind::Missing(_)));
    assert!(err.to_string().contains("does not export tree_sitter_rcl"));
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[test]
fn library_constructor_returning_null_fails() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = build_fixture_library(dir.path(), NULL_CONSTRUCTOR_SOURCE);

    let provider = LibraryProvider::in_dir(dir.path(), "rcl");
    assert_eq!(provider.path(), path);
    let err = verify_grammar_loads(&provider, &TreeSitterEngine, &VerifierConfig::default())
        .unwrap_err();
    assert_eq!(err.kind(), &LoadErrorKind::NullHandle);
    assert!(err
        .to_string()
        .contains("Error loading Rich Communication Language grammar"));
}

#[test]
fn config_from_host_toml() {
    let config: VerifierConfig = toml::from_str(
        r#"
        grammar_name = "rcl"
        display_name = "Rich Communication Language"
        require_symbols = true
        "#,
    )
    .unwrap();
    assert_eq!(config, VerifierConfig::default());
}
