//! Visual Studio compiler-message rendering: one line per occurrence,
//! clickable from the VS output window.

use std::fmt::Write as _;

use crate::core::DuplicateMatch;

pub fn render(matches: &[DuplicateMatch]) -> String {
    let mut out = String::new();
    for m in matches {
        for occ in &m.occurrences {
            let _ = writeln!(
                out,
                "{}({}): Between lines {} and {}",
                occ.file.display(),
                occ.start_line,
                occ.start_line,
                occ.end_line
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Occurrence;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn one_line_per_occurrence() {
        let m = DuplicateMatch {
            token_count: 20,
            line_count: 3,
            occurrences: vec![
                Occurrence {
                    file: PathBuf::from("/src/A.java"),
                    start_line: 4,
                    end_line: 6,
                },
                Occurrence {
                    file: PathBuf::from("/src/B.java"),
                    start_line: 14,
                    end_line: 16,
                },
            ],
            fragment: String::new(),
        };
        assert_eq!(
            render(&[m]),
            "/src/A.java(4): Between lines 4 and 6\n/src/B.java(14): Between lines 14 and 16\n"
        );
    }

    #[test]
    fn empty_match_collection_renders_nothing() {
        assert_eq!(render(&[]), "");
    }
}
