//! CSV rendering.
//!
//! With line counts (the default) each row carries the per-match line span
//! and each occurrence contributes `start_line,file`. Without line counts
//! the per-match span column is dropped and the span moves into each
//! occurrence group as `start_line,end_line,file`.

use std::fmt::Write as _;

use crate::core::DuplicateMatch;

pub fn render(matches: &[DuplicateMatch], separator: char, include_line_count: bool) -> String {
    let s = separator;
    let mut out = String::new();

    if include_line_count {
        let _ = writeln!(out, "lines{s}tokens{s}occurrences");
    } else {
        let _ = writeln!(out, "tokens{s}occurrences");
    }

    for m in matches {
        if include_line_count {
            let _ = write!(out, "{}{s}{}{s}{}", m.line_count, m.token_count, m.occurrences.len());
        } else {
            let _ = write!(out, "{}{s}{}", m.token_count, m.occurrences.len());
        }
        for occ in &m.occurrences {
            if include_line_count {
                let _ = write!(out, "{s}{}{s}{}", occ.start_line, occ.file.display());
            } else {
                let _ = write!(
                    out,
                    "{s}{}{s}{}{s}{}",
                    occ.start_line,
                    occ.end_line,
                    occ.file.display()
                );
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Occurrence;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn sample() -> Vec<DuplicateMatch> {
        vec![DuplicateMatch {
            token_count: 75,
            line_count: 4,
            occurrences: vec![
                Occurrence {
                    file: PathBuf::from("/src/A.java"),
                    start_line: 10,
                    end_line: 13,
                },
                Occurrence {
                    file: PathBuf::from("/src/B.java"),
                    start_line: 25,
                    end_line: 28,
                },
            ],
            fragment: String::new(),
        }]
    }

    #[test]
    fn header_with_line_count() {
        let rendered = render(&sample(), ',', true);
        assert_eq!(rendered.lines().next().unwrap(), "lines,tokens,occurrences");
    }

    #[test]
    fn header_without_line_count() {
        let rendered = render(&sample(), ',', false);
        assert_eq!(rendered.lines().next().unwrap(), "tokens,occurrences");
    }

    #[test]
    fn row_with_line_count_lists_start_line_and_file_per_occurrence() {
        let rendered = render(&sample(), ',', true);
        assert_eq!(
            rendered,
            "lines,tokens,occurrences\n4,75,2,10,/src/A.java,25,/src/B.java\n"
        );
    }

    #[test]
    fn row_without_line_count_carries_the_span_per_occurrence() {
        let rendered = render(&sample(), ',', false);
        assert_eq!(
            rendered,
            "tokens,occurrences\n75,2,10,13,/src/A.java,25,28,/src/B.java\n"
        );
    }

    #[test]
    fn separator_is_applied_to_header_and_rows() {
        let rendered = render(&sample(), ';', true);
        assert_eq!(
            rendered,
            "lines;tokens;occurrences\n4;75;2;10;/src/A.java;25;/src/B.java\n"
        );
    }

    #[test]
    fn no_matches_renders_only_the_header() {
        assert_eq!(render(&[], ',', true), "lines,tokens,occurrences\n");
    }
}
