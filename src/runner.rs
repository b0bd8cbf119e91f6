//! The analysis phase: read, tokenize, and hand off to the engine, exactly
//! once per run.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::ExecutionConfig;
use crate::core::DuplicateMatch;
use crate::engine::{Engine, TokenizedFile, Tokenizer};
use crate::errors::AnalysisError;
use crate::report::Encoding;

pub struct AnalysisRunner<'e> {
    engine: &'e dyn Engine,
}

impl<'e> AnalysisRunner<'e> {
    pub fn new(engine: &'e dyn Engine) -> Self {
        Self { engine }
    }

    /// Run the analysis over `source_files`. Invoked exactly once per run;
    /// never retried, never incremental. Either a complete match collection
    /// comes back or an error; there are no partial results.
    pub fn run(
        &self,
        config: &ExecutionConfig,
        source_files: &[PathBuf],
    ) -> Result<Vec<DuplicateMatch>, AnalysisError> {
        log::info!(
            "Starting duplicate analysis, minimum token count is {}",
            config.minimum_token_count
        );

        let files = if config.skip_duplicate_files {
            self.dedup_identical_files(source_files)?
        } else {
            source_files.to_vec()
        };

        let tokenizer = resolve_tokenizer(&config.language);
        let tokenized = self.tokenize_files(config, tokenizer, &files)?;

        let start = Instant::now();
        let matches = self.engine.find_matches(&config.engine_options(), &tokenized)?;
        log::info!(
            "Successfully analyzed code - took {} milliseconds",
            start.elapsed().as_millis()
        );
        Ok(matches)
    }

    /// Drop files whose name and byte length both repeat an earlier file.
    fn dedup_identical_files(
        &self,
        source_files: &[PathBuf],
    ) -> Result<Vec<PathBuf>, AnalysisError> {
        let mut seen: BTreeSet<(OsString, u64)> = BTreeSet::new();
        let mut kept = Vec::new();
        for path in source_files {
            let metadata = std::fs::metadata(path).map_err(|source| AnalysisError::Io {
                path: path.clone(),
                source,
            })?;
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_default();
            if seen.insert((name, metadata.len())) {
                kept.push(path.clone());
            } else {
                log::debug!("Skipping duplicate file {}", path.display());
            }
        }
        Ok(kept)
    }

    fn tokenize_files(
        &self,
        config: &ExecutionConfig,
        tokenizer: &Tokenizer,
        files: &[PathBuf],
    ) -> Result<Vec<TokenizedFile>, AnalysisError> {
        let encoding = config.encoding.unwrap_or(Encoding::PLATFORM_DEFAULT);
        let options = config.tokenizer_options();
        let mut tokenized = Vec::with_capacity(files.len());

        for path in files {
            log::debug!("Tokenizing {}", path.display());
            let bytes = std::fs::read(path).map_err(|source| AnalysisError::Io {
                path: path.clone(),
                source,
            })?;
            let source = encoding.decode(&bytes).map_err(|e| AnalysisError::Decode {
                path: path.clone(),
                encoding: e.encoding.to_string(),
                message: e.to_string(),
            })?;

            match tokenizer.tokenize(&source, &options) {
                Ok(tokens) => tokenized.push(TokenizedFile {
                    path: path.clone(),
                    source,
                    tokens,
                }),
                Err(lexical) if config.skip_lexical_errors => {
                    log::warn!("Skipping {}: {}", path.display(), lexical);
                }
                Err(lexical) => {
                    return Err(AnalysisError::Lexical {
                        path: path.clone(),
                        source: lexical,
                    });
                }
            }
        }
        Ok(tokenized)
    }
}

/// Look up the tokenizer for a language, falling back to the any-language
/// profile. The fallback never fails; it warns once, naming the language
/// that did not resolve.
fn resolve_tokenizer(language: &str) -> &'static Tokenizer {
    match Tokenizer::for_language(language) {
        Some(tokenizer) => {
            log::info!("Using tokenizer '{}' for duplicate checking", tokenizer.id());
            tokenizer
        }
        None => {
            log::warn!(
                "Could not resolve tokenizer for language '{language}', \
                 falling back to any-language tokenization"
            );
            Tokenizer::any()
        }
    }
}
