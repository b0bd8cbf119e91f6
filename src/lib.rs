// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod engine;
pub mod errors;
pub mod io;
pub mod outcome;
pub mod report;
pub mod runner;

// Re-export commonly used types
pub use crate::config::{ExecutionConfig, ExecutionConfigBuilder};
pub use crate::core::{DuplicateMatch, Occurrence};
pub use crate::engine::{Engine, EngineOptions, HashEngine, TokenizedFile, Tokenizer};
pub use crate::errors::{AnalysisError, ConfigError, ReportError};
pub use crate::outcome::{evaluate, Outcome};
pub use crate::report::{Encoding, ReportDescriptor};
pub use crate::runner::AnalysisRunner;
