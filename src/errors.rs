//! Error taxonomy for the duplicate detection pipeline.
//!
//! Three categories, matching the three pipeline phases:
//!
//! - [`ConfigError`]: invalid option combination, detected synchronously
//!   before any I/O.
//! - [`AnalysisError`]: failure during the single analysis pass (file I/O,
//!   decoding, tokenization, engine failure).
//! - [`ReportError`]: failure rendering or writing one specific report.
//!   Fatal for the whole render phase; partial report sets are never left
//!   behind silently.
//!
//! Finding duplicates with `ignore_failures = false` is a designed failure
//! mode, not an error type; see [`crate::outcome::Outcome`].

use std::path::PathBuf;
use thiserror::Error;

use crate::engine::tokenizer::LexicalError;
use crate::engine::EngineError;

/// Invalid configuration, rejected before a run is attempted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("minimum token count must be positive, got {0}")]
    InvalidMinimumTokenCount(u32),

    #[error(
        "skip-blocks pattern '{0}' must contain exactly one '|' separating \
         non-empty start and end markers"
    )]
    InvalidSkipBlocksPattern(String),

    #[error("unsupported encoding '{0}'")]
    UnsupportedEncoding(String),

    #[error("at least one report must be enabled")]
    NoReports,
}

/// Failure during the single analysis invocation. No partial results are
/// returned; the run either produces a complete match collection or this.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode '{path}' as {encoding}: {message}")]
    Decode {
        path: PathBuf,
        encoding: String,
        message: String,
    },

    #[error("failed to tokenize '{path}'")]
    Lexical {
        path: PathBuf,
        #[source]
        source: LexicalError,
    },

    #[error("duplicate analysis failed")]
    Engine(#[from] EngineError),
}

/// Failure rendering or writing one specific report. The render loop stops
/// at the first of these; remaining reports are not attempted.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report to '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode report for '{path}' as {encoding}: {message}")]
    Encode {
        path: PathBuf,
        encoding: String,
        message: String,
    },

    #[error("unsupported report encoding '{0}'")]
    UnsupportedEncoding(String),

    #[error("XML serializer is not available in the current render scope: {0}")]
    SerializerUnavailable(String),
}
