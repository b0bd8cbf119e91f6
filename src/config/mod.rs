//! Execution configuration: one immutable value object per run.
//!
//! Earlier shapes of this tool kept these knobs as individually mutable
//! task properties, which allowed mid-run mutation. Here the whole
//! configuration is assembled once by [`ExecutionConfigBuilder`], validated
//! synchronously, and never touched again.

pub mod loader;

use std::collections::BTreeMap;

use crate::engine::{EngineOptions, TokenizerOptions};
use crate::errors::ConfigError;
use crate::report::{Encoding, ReportDescriptor};

pub const DEFAULT_LANGUAGE: &str = "java";
pub const DEFAULT_MINIMUM_TOKEN_COUNT: u32 = 50;
pub const DEFAULT_SKIP_BLOCKS_PATTERN: &str = "#if 0|#endif";

/// Everything the analysis phase needs, frozen at build time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Charset for reading sources and the run-level report fallback.
    /// `None` means the platform default.
    pub encoding: Option<Encoding>,
    pub language: String,
    pub minimum_token_count: u32,
    pub ignore_annotations: bool,
    pub ignore_identifiers: bool,
    pub ignore_literals: bool,
    pub skip_duplicate_files: bool,
    pub skip_lexical_errors: bool,
    pub skip_blocks: bool,
    pub skip_blocks_pattern: String,
}

impl ExecutionConfig {
    /// The skip-blocks start and end markers, when enabled. The pattern was
    /// validated at build time, so the split always succeeds.
    pub fn skip_blocks_delimiters(&self) -> Option<(&str, &str)> {
        if self.skip_blocks {
            self.skip_blocks_pattern.split_once('|')
        } else {
            None
        }
    }

    pub fn tokenizer_options(&self) -> TokenizerOptions {
        TokenizerOptions {
            ignore_literals: self.ignore_literals,
            ignore_identifiers: self.ignore_identifiers,
            ignore_annotations: self.ignore_annotations,
            skip_blocks: self
                .skip_blocks_delimiters()
                .map(|(start, end)| (start.to_string(), end.to_string())),
        }
    }

    /// Project the flags into the engine's named property map. Boolean
    /// flags appear only when enabled; an absent flag and a false flag must
    /// stay indistinguishable to older tokenizers. The skip-blocks pair is
    /// the exception and is always present.
    pub fn engine_options(&self) -> EngineOptions {
        let mut properties = BTreeMap::new();
        for (name, enabled) in [
            ("ignore_annotations", self.ignore_annotations),
            ("ignore_identifiers", self.ignore_identifiers),
            ("ignore_literals", self.ignore_literals),
        ] {
            if enabled {
                properties.insert(name.to_string(), "true".to_string());
            }
        }
        properties.insert("skip_blocks".to_string(), self.skip_blocks.to_string());
        properties.insert(
            "skip_blocks_pattern".to_string(),
            self.skip_blocks_pattern.clone(),
        );
        EngineOptions {
            minimum_token_count: self.minimum_token_count as usize,
            properties,
        }
    }
}

/// Builder for one run: configuration plus the report descriptor list,
/// validated together before any I/O happens.
#[derive(Debug, Default)]
pub struct ExecutionConfigBuilder {
    encoding: Option<String>,
    language: Option<String>,
    minimum_token_count: Option<u32>,
    ignore_annotations: bool,
    ignore_identifiers: bool,
    ignore_literals: bool,
    skip_duplicate_files: bool,
    skip_lexical_errors: bool,
    skip_blocks: Option<bool>,
    skip_blocks_pattern: Option<String>,
    reports: Vec<ReportDescriptor>,
}

impl ExecutionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn minimum_token_count(mut self, count: u32) -> Self {
        self.minimum_token_count = Some(count);
        self
    }

    pub fn ignore_annotations(mut self, value: bool) -> Self {
        self.ignore_annotations = value;
        self
    }

    pub fn ignore_identifiers(mut self, value: bool) -> Self {
        self.ignore_identifiers = value;
        self
    }

    pub fn ignore_literals(mut self, value: bool) -> Self {
        self.ignore_literals = value;
        self
    }

    pub fn skip_duplicate_files(mut self, value: bool) -> Self {
        self.skip_duplicate_files = value;
        self
    }

    pub fn skip_lexical_errors(mut self, value: bool) -> Self {
        self.skip_lexical_errors = value;
        self
    }

    pub fn skip_blocks(mut self, value: bool) -> Self {
        self.skip_blocks = Some(value);
        self
    }

    pub fn skip_blocks_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.skip_blocks_pattern = Some(pattern.into());
        self
    }

    pub fn report(mut self, report: ReportDescriptor) -> Self {
        self.reports.push(report);
        self
    }

    pub fn reports(mut self, reports: impl IntoIterator<Item = ReportDescriptor>) -> Self {
        self.reports.extend(reports);
        self
    }

    /// Validate and freeze. Errors are reported here, synchronously, never
    /// deferred to execution time.
    pub fn build(self) -> Result<(ExecutionConfig, Vec<ReportDescriptor>), ConfigError> {
        let minimum_token_count = self
            .minimum_token_count
            .unwrap_or(DEFAULT_MINIMUM_TOKEN_COUNT);
        if minimum_token_count == 0 {
            return Err(ConfigError::InvalidMinimumTokenCount(minimum_token_count));
        }

        let skip_blocks = self.skip_blocks.unwrap_or(true);
        let skip_blocks_pattern = self
            .skip_blocks_pattern
            .unwrap_or_else(|| DEFAULT_SKIP_BLOCKS_PATTERN.to_string());
        if skip_blocks && !valid_skip_blocks_pattern(&skip_blocks_pattern) {
            return Err(ConfigError::InvalidSkipBlocksPattern(skip_blocks_pattern));
        }

        let encoding = match self.encoding {
            Some(label) => Some(
                Encoding::from_label(&label)
                    .map_err(|e| ConfigError::UnsupportedEncoding(e.0))?,
            ),
            None => None,
        };

        if self.reports.is_empty() {
            return Err(ConfigError::NoReports);
        }

        let config = ExecutionConfig {
            encoding,
            language: self.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            minimum_token_count,
            ignore_annotations: self.ignore_annotations,
            ignore_identifiers: self.ignore_identifiers,
            ignore_literals: self.ignore_literals,
            skip_duplicate_files: self.skip_duplicate_files,
            skip_lexical_errors: self.skip_lexical_errors,
            skip_blocks,
            skip_blocks_pattern,
        };
        Ok((config, self.reports))
    }
}

fn valid_skip_blocks_pattern(pattern: &str) -> bool {
    match pattern.split_once('|') {
        Some((start, end)) => {
            !start.is_empty() && !end.is_empty() && !end.contains('|')
        }
        None => false,
    }
}
