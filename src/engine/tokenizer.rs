//! Per-language tokenizer profiles.
//!
//! A profile turns source text into the ordered token stream the engine
//! compares. Profiles differ in comment syntax, string delimiters, and the
//! keyword set that survives identifier normalization. The `any` profile is
//! the fallback for unrecognized languages: it recognizes nothing and splits
//! on whitespace, so it can never fail.

use thiserror::Error;

/// One token with the 1-based line it starts on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub line: usize,
}

/// A file that cannot be tokenized (unterminated literal or comment,
/// control characters in source text).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct LexicalError {
    pub line: usize,
    pub message: String,
}

/// Equality-narrowing options forwarded from the execution configuration.
#[derive(Clone, Debug, Default)]
pub struct TokenizerOptions {
    pub ignore_literals: bool,
    pub ignore_identifiers: bool,
    pub ignore_annotations: bool,
    /// Start and end markers of preprocessor-guarded regions to exclude,
    /// already split at the `|` separator.
    pub skip_blocks: Option<(String, String)>,
}

/// A language tokenizer profile.
#[derive(Debug)]
pub struct Tokenizer {
    id: &'static str,
    extensions: &'static [&'static str],
    line_comments: &'static [&'static str],
    block_comment: Option<(&'static str, &'static str)>,
    string_quotes: &'static [char],
    keywords: &'static [&'static str],
    annotation_marker: Option<char>,
    /// Whitespace-split mode: every non-whitespace run is one token and
    /// tokenization never fails.
    opaque: bool,
}

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

const CPP_KEYWORDS: &[&str] = &[
    "auto", "bool", "break", "case", "catch", "char", "class", "const", "continue", "default",
    "delete", "do", "double", "else", "enum", "explicit", "extern", "false", "float", "for",
    "friend", "goto", "if", "inline", "int", "long", "namespace", "new", "operator", "private",
    "protected", "public", "return", "short", "signed", "sizeof", "static", "struct", "switch",
    "template", "this", "throw", "true", "try", "typedef", "typename", "union", "unsigned",
    "using", "virtual", "void", "volatile", "while",
];

static JAVA: Tokenizer = Tokenizer {
    id: "java",
    extensions: &["java"],
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    string_quotes: &['"', '\''],
    keywords: JAVA_KEYWORDS,
    annotation_marker: Some('@'),
    opaque: false,
};

static RUST: Tokenizer = Tokenizer {
    id: "rust",
    extensions: &["rs"],
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    string_quotes: &['"'],
    keywords: RUST_KEYWORDS,
    annotation_marker: None,
    opaque: false,
};

static PYTHON: Tokenizer = Tokenizer {
    id: "python",
    extensions: &["py"],
    line_comments: &["#"],
    block_comment: None,
    string_quotes: &['"', '\''],
    keywords: PYTHON_KEYWORDS,
    annotation_marker: None,
    opaque: false,
};

static CPP: Tokenizer = Tokenizer {
    id: "cpp",
    extensions: &["cpp", "cc", "cxx", "c", "h", "hpp"],
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    string_quotes: &['"', '\''],
    keywords: CPP_KEYWORDS,
    annotation_marker: None,
    opaque: false,
};

static ANY: Tokenizer = Tokenizer {
    id: "any",
    extensions: &[],
    line_comments: &[],
    block_comment: None,
    string_quotes: &[],
    keywords: &[],
    annotation_marker: None,
    opaque: true,
};

impl Tokenizer {
    /// Look up the profile for a language id, `None` when unrecognized.
    pub fn for_language(id: &str) -> Option<&'static Tokenizer> {
        match id.to_ascii_lowercase().as_str() {
            "java" => Some(&JAVA),
            "rust" => Some(&RUST),
            "python" => Some(&PYTHON),
            "cpp" | "c" | "c++" => Some(&CPP),
            "any" => Some(&ANY),
            _ => None,
        }
    }

    /// The fallback profile: tokenizes anything as opaque text.
    pub fn any() -> &'static Tokenizer {
        &ANY
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    /// File extensions covered by this profile; empty means "all files".
    pub fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    pub fn tokenize(
        &self,
        source: &str,
        options: &TokenizerOptions,
    ) -> Result<Vec<Token>, LexicalError> {
        let mut tokens = Vec::new();

        if self.opaque {
            for (idx, line) in source.lines().enumerate() {
                for word in line.split_whitespace() {
                    tokens.push(Token {
                        text: word.to_string(),
                        line: idx + 1,
                    });
                }
            }
            return Ok(tokens);
        }

        let mut in_block_comment = false;
        let mut skipping_guarded_block = false;
        let mut last_line = 0;

        for (idx, line) in source.lines().enumerate() {
            let lineno = idx + 1;
            last_line = lineno;

            if let Some((start, end)) = &options.skip_blocks {
                let trimmed = line.trim_start();
                if skipping_guarded_block {
                    if trimmed.starts_with(end.as_str()) {
                        skipping_guarded_block = false;
                    }
                    continue;
                }
                if !in_block_comment && trimmed.starts_with(start.as_str()) {
                    skipping_guarded_block = true;
                    continue;
                }
            }

            self.scan_line(line, lineno, &mut in_block_comment, options, &mut tokens)?;
        }

        if in_block_comment {
            return Err(LexicalError {
                line: last_line,
                message: "unterminated block comment".to_string(),
            });
        }
        Ok(tokens)
    }

    fn scan_line(
        &self,
        line: &str,
        lineno: usize,
        in_block_comment: &mut bool,
        options: &TokenizerOptions,
        out: &mut Vec<Token>,
    ) -> Result<(), LexicalError> {
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            if *in_block_comment {
                let close = self.block_comment.map(|(_, c)| c).unwrap_or("*/");
                match find_at(&chars, i, close) {
                    Some(pos) => {
                        *in_block_comment = false;
                        i = pos + close.chars().count();
                        continue;
                    }
                    None => return Ok(()),
                }
            }

            let c = chars[i];

            if c.is_whitespace() {
                i += 1;
                continue;
            }

            if c.is_control() {
                return Err(LexicalError {
                    line: lineno,
                    message: format!("invalid character U+{:04X} in source text", c as u32),
                });
            }

            if self.line_comments.iter().any(|lc| starts_at(&chars, i, lc)) {
                return Ok(());
            }

            if let Some((open, close)) = self.block_comment {
                if starts_at(&chars, i, open) {
                    i += open.chars().count();
                    match find_at(&chars, i, close) {
                        Some(pos) => {
                            i = pos + close.chars().count();
                            continue;
                        }
                        None => {
                            *in_block_comment = true;
                            return Ok(());
                        }
                    }
                }
            }

            if self.string_quotes.contains(&c) {
                let mut j = i + 1;
                let mut closed = false;
                while j < chars.len() {
                    if chars[j] == '\\' {
                        j += 2;
                        continue;
                    }
                    if chars[j] == c {
                        closed = true;
                        break;
                    }
                    j += 1;
                }
                if !closed {
                    return Err(LexicalError {
                        line: lineno,
                        message: "unterminated string literal".to_string(),
                    });
                }
                let text = if options.ignore_literals {
                    "\"L\"".to_string()
                } else {
                    chars[i..=j].iter().collect()
                };
                out.push(Token { text, line: lineno });
                i = j + 1;
                continue;
            }

            if c.is_ascii_digit() {
                let mut j = i;
                while j < chars.len()
                    && (chars[j].is_ascii_alphanumeric() || chars[j] == '.' || chars[j] == '_')
                {
                    j += 1;
                }
                let text = if options.ignore_literals {
                    "0".to_string()
                } else {
                    chars[i..j].iter().collect()
                };
                out.push(Token { text, line: lineno });
                i = j;
                continue;
            }

            if options.ignore_annotations && self.annotation_marker == Some(c) {
                let mut j = i + 1;
                while j < chars.len()
                    && (chars[j].is_alphanumeric() || chars[j] == '_' || chars[j] == '.')
                {
                    j += 1;
                }
                if j < chars.len() && chars[j] == '(' {
                    let mut depth = 0usize;
                    while j < chars.len() {
                        if chars[j] == '(' {
                            depth += 1;
                        } else if chars[j] == ')' {
                            depth -= 1;
                            if depth == 0 {
                                j += 1;
                                break;
                            }
                        }
                        j += 1;
                    }
                }
                i = j;
                continue;
            }

            if c.is_alphabetic() || c == '_' {
                let mut j = i;
                while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_') {
                    j += 1;
                }
                let word: String = chars[i..j].iter().collect();
                let text = if options.ignore_identifiers && !self.keywords.contains(&word.as_str())
                {
                    "$id".to_string()
                } else {
                    word
                };
                out.push(Token { text, line: lineno });
                i = j;
                continue;
            }

            out.push(Token {
                text: c.to_string(),
                line: lineno,
            });
            i += 1;
        }
        Ok(())
    }
}

fn starts_at(chars: &[char], at: usize, pattern: &str) -> bool {
    let pat: Vec<char> = pattern.chars().collect();
    chars.len() >= at + pat.len() && chars[at..at + pat.len()] == pat[..]
}

fn find_at(chars: &[char], from: usize, pattern: &str) -> Option<usize> {
    (from..chars.len()).find(|&i| starts_at(chars, i, pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn java_profile_skips_comments() {
        let source = "int a = 1; // trailing\n/* block\n comment */ int b;";
        let tokens = Tokenizer::for_language("java")
            .unwrap()
            .tokenize(source, &TokenizerOptions::default())
            .unwrap();
        assert_eq!(
            texts(&tokens),
            vec!["int", "a", "=", "1", ";", "int", "b", ";"]
        );
        assert_eq!(tokens[5].line, 3);
    }

    #[test]
    fn ignore_identifiers_keeps_keywords() {
        let options = TokenizerOptions {
            ignore_identifiers: true,
            ..Default::default()
        };
        let tokens = Tokenizer::for_language("java")
            .unwrap()
            .tokenize("return foo;", &options)
            .unwrap();
        assert_eq!(texts(&tokens), vec!["return", "$id", ";"]);
    }

    #[test]
    fn ignore_literals_normalizes_numbers_and_strings() {
        let options = TokenizerOptions {
            ignore_literals: true,
            ..Default::default()
        };
        let a = Tokenizer::for_language("java")
            .unwrap()
            .tokenize("x = 42; s = \"hi\";", &options)
            .unwrap();
        let b = Tokenizer::for_language("java")
            .unwrap()
            .tokenize("x = 43; s = \"ho\";", &options)
            .unwrap();
        assert_eq!(texts(&a), texts(&b));
    }

    #[test]
    fn ignore_annotations_drops_marker_and_arguments() {
        let options = TokenizerOptions {
            ignore_annotations: true,
            ..Default::default()
        };
        let tokens = Tokenizer::for_language("java")
            .unwrap()
            .tokenize("@SuppressWarnings(\"unchecked\") void f()", &options)
            .unwrap();
        assert_eq!(texts(&tokens), vec!["void", "f", "(", ")"]);
    }

    #[test]
    fn skip_blocks_excludes_guarded_region() {
        let options = TokenizerOptions {
            skip_blocks: Some(("#if 0".to_string(), "#endif".to_string())),
            ..Default::default()
        };
        let source = "a\n#if 0\nhidden\n#endif\nb";
        let tokens = Tokenizer::for_language("cpp")
            .unwrap()
            .tokenize(source, &options)
            .unwrap();
        assert_eq!(texts(&tokens), vec!["a", "b"]);
    }

    #[test]
    fn unterminated_string_is_a_lexical_error() {
        let err = Tokenizer::for_language("java")
            .unwrap()
            .tokenize("String s = \"oops;", &TokenizerOptions::default())
            .unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("unterminated string"));
    }

    #[test]
    fn unterminated_block_comment_is_a_lexical_error() {
        let err = Tokenizer::for_language("java")
            .unwrap()
            .tokenize("int a; /* never closed\nint b;", &TokenizerOptions::default())
            .unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn any_profile_never_fails() {
        let tokens = Tokenizer::any()
            .tokenize("whatever \"unterminated /* junk", &TokenizerOptions::default())
            .unwrap();
        assert_eq!(texts(&tokens), vec!["whatever", "\"unterminated", "/*", "junk"]);
    }

    #[test]
    fn unknown_language_resolves_to_none() {
        assert!(Tokenizer::for_language("cobol-2026").is_none());
    }
}
