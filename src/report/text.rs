//! Plain-text rendering, one block per match with a banner line between
//! blocks.

use std::fmt::Write as _;

use crate::core::DuplicateMatch;

pub fn render(
    matches: &[DuplicateMatch],
    line_separator: &str,
    trim_leading_whitespace: bool,
) -> String {
    let mut out = String::new();

    for (i, m) in matches.iter().enumerate() {
        if i > 0 {
            out.push_str(line_separator);
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "Found a {} line ({} tokens) duplication in the following files: ",
            m.line_count, m.token_count
        );
        for occ in &m.occurrences {
            let _ = writeln!(
                out,
                "Starting at line {} of {}",
                occ.start_line,
                occ.file.display()
            );
        }
        out.push('\n');
        let fragment = if trim_leading_whitespace {
            trim_common_prefix(&m.fragment)
        } else {
            m.fragment.clone()
        };
        out.push_str(&fragment);
        out.push('\n');
    }
    out
}

/// Strip the longest whitespace prefix shared by every non-empty line of
/// the fragment. Computed per match, never across matches; indentation
/// beyond the shared prefix is preserved.
fn trim_common_prefix(fragment: &str) -> String {
    let prefix = common_whitespace_prefix(fragment);
    if prefix.is_empty() {
        return fragment.to_string();
    }
    fragment
        .lines()
        .map(|line| line.strip_prefix(prefix).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_whitespace_prefix(fragment: &str) -> &str {
    let mut lines = fragment.lines().filter(|line| !line.trim().is_empty());
    let first = match lines.next() {
        Some(line) => line,
        None => return "",
    };
    let mut prefix_len = first
        .char_indices()
        .take_while(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);

    for line in lines {
        while prefix_len > 0 && !line.starts_with(&first[..prefix_len]) {
            // Back off one character; prefix boundaries are char boundaries.
            prefix_len = first[..prefix_len]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
        if prefix_len == 0 {
            break;
        }
    }
    &first[..prefix_len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Occurrence;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn make_match(fragment: &str) -> DuplicateMatch {
        DuplicateMatch {
            token_count: 30,
            line_count: 2,
            occurrences: vec![
                Occurrence {
                    file: PathBuf::from("/src/a.rs"),
                    start_line: 5,
                    end_line: 6,
                },
                Occurrence {
                    file: PathBuf::from("/src/b.rs"),
                    start_line: 11,
                    end_line: 12,
                },
            ],
            fragment: fragment.to_string(),
        }
    }

    #[test]
    fn block_lists_every_occurrence_then_the_fragment() {
        let rendered = render(&[make_match("let x = 1;\nlet y = 2;")], "====", false);
        // The header line carries a trailing space.
        let expected = concat!(
            "Found a 2 line (30 tokens) duplication in the following files: \n",
            "Starting at line 5 of /src/a.rs\n",
            "Starting at line 11 of /src/b.rs\n",
            "\n",
            "let x = 1;\n",
            "let y = 2;\n",
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn banner_separates_match_blocks() {
        let rendered = render(
            &[make_match("aaa"), make_match("bbb")],
            "=====",
            false,
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.iter().filter(|l| **l == "=====").count(), 1);
        assert!(rendered.contains("aaa\n=====\nFound a"));
    }

    #[test]
    fn trimming_strips_only_the_shared_prefix() {
        let fragment = "        if ready {\n            go();\n        }";
        let rendered = render(&[make_match(fragment)], "====", true);
        assert!(rendered.contains("if ready {\n    go();\n}"));
        assert!(!rendered.contains("        if ready"));
    }

    #[test]
    fn trimming_is_disabled_by_default_flag() {
        let fragment = "    indented();";
        let rendered = render(&[make_match(fragment)], "====", false);
        assert!(rendered.contains("    indented();"));
    }

    #[test]
    fn common_prefix_ignores_blank_lines() {
        let fragment = "    first();\n\n    second();";
        assert_eq!(common_whitespace_prefix(fragment), "    ");
        assert_eq!(trim_common_prefix(fragment), "first();\n\nsecond();");
    }

    #[test]
    fn no_shared_prefix_leaves_the_fragment_alone() {
        let fragment = "left();\n    right();";
        assert_eq!(trim_common_prefix(fragment), fragment);
    }

    #[test]
    fn mixed_tab_and_space_prefixes_share_nothing() {
        let fragment = "\tone();\n    two();";
        assert_eq!(common_whitespace_prefix(fragment), "");
    }
}
