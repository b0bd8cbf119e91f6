//! Shared value types for the duplicate detection pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One location of a duplicated fragment.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Occurrence {
    pub file: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
}

impl Occurrence {
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

/// One detected duplication: a token sequence repeated at two or more
/// locations. Produced by the engine; the report renderers only iterate
/// and project these, they never construct or mutate them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    /// Number of tokens in the repeated sequence.
    pub token_count: usize,
    /// Line span of the first occurrence.
    pub line_count: usize,
    /// At least two, sorted by (file, start_line).
    pub occurrences: Vec<Occurrence>,
    /// Source slice of the first occurrence, newline separated.
    pub fragment: String,
}

impl DuplicateMatch {
    pub fn first_occurrence(&self) -> &Occurrence {
        &self.occurrences[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occurrence_line_count_is_inclusive() {
        let occ = Occurrence {
            file: PathBuf::from("a.rs"),
            start_line: 3,
            end_line: 7,
        };
        assert_eq!(occ.line_count(), 5);
    }
}
