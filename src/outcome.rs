//! Run outcome evaluation: did the run succeed, warn, or fail?

use std::path::Path;

use crate::core::DuplicateMatch;

/// What the host turns into a process exit status and a log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    NoDuplicates,
    /// Duplicates exist but `ignore_failures` was set; already logged as a
    /// warning, the run still counts as successful.
    DuplicatesIgnored { message: String },
    /// Duplicates exist and the run must fail.
    DuplicatesFound { message: String },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::DuplicatesFound { .. })
    }
}

/// Decide the outcome from the match collection. `first_report` is the
/// destination of the first enabled report; the failure message points the
/// user at it.
pub fn evaluate(
    matches: &[DuplicateMatch],
    ignore_failures: bool,
    first_report: Option<&Path>,
    minimum_token_count: u32,
) -> Outcome {
    if matches.is_empty() {
        log::info!("No duplicates over {minimum_token_count} tokens found.");
        return Outcome::NoDuplicates;
    }

    let mut message = String::from("dupmap found duplicate code.");
    if let Some(report) = first_report {
        message.push_str(" See the report at ");
        message.push_str(&clickable_file_url(report));
    }

    if ignore_failures {
        log::warn!("{message}");
        Outcome::DuplicatesIgnored { message }
    } else {
        Outcome::DuplicatesFound { message }
    }
}

/// A `file:` URL with an empty authority (three slashes). Single-slash
/// `file:/...` URLs are not recognized as clickable links by some consoles,
/// so the authority component is spelled out even though it is empty.
pub fn clickable_file_url(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    if let Some(stripped) = text.strip_prefix('/') {
        format!("file:///{stripped}")
    } else {
        format!("file:///{text}")
    }
}
