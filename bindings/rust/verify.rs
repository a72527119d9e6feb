//! Grammar-load verification.
//!
//! Verification is a one-shot pipeline: fetch the descriptor from a
//! [`GrammarProvider`], construct a language with an [`Engine`], then check
//! that the language is non-empty, speaks an ABI the engine supports, and can
//! be attached to a parser. Any failed step ends verification with a
//! [`LoadError`]; there is no retry and no fallback grammar.

use tracing::{debug, info, warn};

use crate::config::VerifierConfig;
use crate::descriptor::GrammarProvider;
use crate::engine::{Engine, LanguageMetadata};
use crate::error::{LoadError, LoadErrorKind};

/// A language that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageHandle<L> {
    name: String,
    metadata: LanguageMetadata,
    language: L,
}

impl<L> LanguageHandle<L> {
    /// The configured grammar name, e.g. `"rcl"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> LanguageMetadata {
        self.metadata
    }

    pub fn language(&self) -> &L {
        &self.language
    }

    pub fn into_language(self) -> L {
        self.language
    }
}

/// Progress of a [`Verifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationState<L> {
    Unverified,
    Verified(LanguageHandle<L>),
    Failed(LoadError),
}

impl<L> VerificationState<L> {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified(_))
    }

    pub fn handle(&self) -> Option<&LanguageHandle<L>> {
        match self {
            Self::Verified(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Verifies one grammar against one engine.
///
/// The verifier moves from [`VerificationState::Unverified`] to a terminal
/// state exactly once; later calls to [`run`](Self::run) return the recorded
/// outcome without touching the provider or engine again.
pub struct Verifier<P, E: Engine> {
    provider: P,
    engine: E,
    config: VerifierConfig,
    state: VerificationState<E::Language>,
}

impl<P: GrammarProvider, E: Engine> Verifier<P, E> {
    pub fn new(provider: P, engine: E, config: VerifierConfig) -> Self {
        Self {
            provider,
            engine,
            config,
            state: VerificationState::Unverified,
        }
    }

    pub fn state(&self) -> &VerificationState<E::Language> {
        &self.state
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Runs verification if it has not run yet.
    pub fn run(&mut self) -> &VerificationState<E::Language> {
        if matches!(self.state, VerificationState::Unverified) {
            self.state = match verify_grammar_loads(&self.provider, &self.engine, &self.config) {
                Ok(handle) => VerificationState::Verified(handle),
                Err(err) => VerificationState::Failed(err),
            };
        }
        &self.state
    }

    /// Runs verification if needed and returns its outcome.
    pub fn into_result(mut self) -> Result<LanguageHandle<E::Language>, LoadError> {
        self.run();
        match self.state {
            VerificationState::Verified(handle) => Ok(handle),
            VerificationState::Failed(err) => Err(err),
            VerificationState::Unverified => unreachable!("run() always leaves a terminal state"),
        }
    }
}

/// Loads the provider's grammar into `engine` and checks the result.
///
/// Each call is independent: two calls with the same inputs build two
/// separate handles.
pub fn verify_grammar_loads<P, E>(
    provider: &P,
    engine: &E,
    config: &VerifierConfig,
) -> Result<LanguageHandle<E::Language>, LoadError>
where
    P: GrammarProvider + ?Sized,
    E: Engine + ?Sized,
{
    let grammar = config.grammar_name.as_str();
    let result = load(provider, engine, config);
    match &result {
        Ok(handle) => info!(
            grammar,
            abi_version = handle.metadata.abi_version,
            node_kinds = handle.metadata.node_kind_count,
            "Grammar verified"
        ),
        Err(err) => warn!(grammar, error = %err, "Grammar failed to load"),
    }
    result.map_err(|kind| LoadError::new(config.display_name.clone(), kind))
}

fn load<P, E>(
    provider: &P,
    engine: &E,
    config: &VerifierConfig,
) -> Result<LanguageHandle<E::Language>, LoadErrorKind>
where
    P: GrammarProvider + ?Sized,
    E: Engine + ?Sized,
{
    let grammar = config.grammar_name.as_str();

    let descriptor = provider.descriptor()?;
    debug!(grammar, ?descriptor, "Constructing language");

    let language = engine
        .new_language(descriptor)
        .ok_or(LoadErrorKind::NullHandle)?;

    let metadata = engine.metadata(&language);
    debug!(grammar, ?metadata, "Language constructed");

    if config.require_symbols && metadata.node_kind_count == 0 {
        return Err(LoadErrorKind::Empty);
    }

    let supported = engine.supported_abi();
    if !supported.contains(&metadata.abi_version) {
        return Err(LoadErrorKind::IncompatibleVersion {
            version: metadata.abi_version,
            min: *supported.start(),
            max: *supported.end(),
        });
    }

    engine.attach(&language).map_err(LoadErrorKind::Rejected)?;

    Ok(LanguageHandle {
        name: config.grammar_name.clone(),
        metadata,
        language,
    })
}
