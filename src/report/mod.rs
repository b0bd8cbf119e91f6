//! Report descriptors and renderers.
//!
//! A [`ReportDescriptor`] is one requested output artifact: format,
//! format-specific parameters, and destination. The set of formats is a
//! closed enum so the renderer dispatch in [`renderer`] is exhaustive;
//! adding a format is a compile-checked, single-site change.

pub mod context;
pub mod csv;
pub mod encoding;
pub mod renderer;
pub mod text;
pub mod vs;
pub mod xml;

use std::path::{Path, PathBuf};

pub use encoding::{Encoding, UnknownEncoding};

pub const DEFAULT_CSV_SEPARATOR: char = ',';
pub const DEFAULT_INCLUDE_LINE_COUNT: bool = true;
pub const DEFAULT_LINE_SEPARATOR: &str =
    "=====================================================================";
pub const DEFAULT_TRIM_LEADING_WHITESPACE: bool = false;

/// One requested report. Constructed from validated user configuration
/// before the run starts, immutable thereafter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportDescriptor {
    Csv {
        destination: PathBuf,
        encoding: Option<String>,
        separator: char,
        include_line_count: bool,
    },
    Text {
        destination: PathBuf,
        encoding: Option<String>,
        line_separator: String,
        trim_leading_whitespace: bool,
    },
    /// Visual Studio compiler-message format. Always written with the
    /// platform default encoding; there is nothing to configure.
    Vs { destination: PathBuf },
    Xml {
        destination: PathBuf,
        encoding: Option<String>,
    },
}

impl ReportDescriptor {
    pub fn csv(destination: impl Into<PathBuf>) -> Self {
        ReportDescriptor::Csv {
            destination: destination.into(),
            encoding: None,
            separator: DEFAULT_CSV_SEPARATOR,
            include_line_count: DEFAULT_INCLUDE_LINE_COUNT,
        }
    }

    pub fn text(destination: impl Into<PathBuf>) -> Self {
        ReportDescriptor::Text {
            destination: destination.into(),
            encoding: None,
            line_separator: DEFAULT_LINE_SEPARATOR.to_string(),
            trim_leading_whitespace: DEFAULT_TRIM_LEADING_WHITESPACE,
        }
    }

    pub fn vs(destination: impl Into<PathBuf>) -> Self {
        ReportDescriptor::Vs {
            destination: destination.into(),
        }
    }

    pub fn xml(destination: impl Into<PathBuf>) -> Self {
        ReportDescriptor::Xml {
            destination: destination.into(),
            encoding: None,
        }
    }

    pub fn destination(&self) -> &Path {
        match self {
            ReportDescriptor::Csv { destination, .. }
            | ReportDescriptor::Text { destination, .. }
            | ReportDescriptor::Vs { destination }
            | ReportDescriptor::Xml { destination, .. } => destination,
        }
    }

    /// Per-report encoding override, if any. The VS format has none.
    pub fn encoding(&self) -> Option<&str> {
        match self {
            ReportDescriptor::Csv { encoding, .. }
            | ReportDescriptor::Text { encoding, .. }
            | ReportDescriptor::Xml { encoding, .. } => encoding.as_deref(),
            ReportDescriptor::Vs { .. } => None,
        }
    }

    pub fn format_name(&self) -> &'static str {
        match self {
            ReportDescriptor::Csv { .. } => "csv",
            ReportDescriptor::Text { .. } => "text",
            ReportDescriptor::Vs { .. } => "vs",
            ReportDescriptor::Xml { .. } => "xml",
        }
    }
}
