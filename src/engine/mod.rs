//! The duplicate detection engine boundary.
//!
//! The pipeline treats the matching algorithm as a collaborator behind the
//! [`Engine`] trait: it receives tokenized files plus a property map and
//! returns the matches, nothing else. [`HashEngine`] is the default
//! implementation shipped with the crate.

pub mod hash_engine;
pub mod tokenizer;

use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::DuplicateMatch;

pub use hash_engine::HashEngine;
pub use tokenizer::{LexicalError, Token, Tokenizer, TokenizerOptions};

/// Options handed to the engine for one run.
///
/// `properties` is a named property map: boolean flags appear only when
/// enabled, except the skip-blocks pair which is always present. Engines
/// that tokenize internally read their flags from here; engines working on
/// pre-tokenized input may ignore it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    pub minimum_token_count: usize,
    pub properties: BTreeMap<String, String>,
}

/// One source file, tokenized and ready for comparison.
#[derive(Clone, Debug)]
pub struct TokenizedFile {
    pub path: PathBuf,
    pub source: String,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine rejected options: {0}")]
    InvalidOptions(String),

    #[error("engine failure: {0}")]
    Internal(String),
}

/// The matching algorithm. Invoked exactly once per run.
pub trait Engine {
    fn find_matches(
        &self,
        options: &EngineOptions,
        files: &[TokenizedFile],
    ) -> Result<Vec<DuplicateMatch>, EngineError>;
}
