use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dupmap")]
#[command(about = "Copy-paste (duplicate code) detector", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a source tree for duplicated code
    Check {
        /// Path to analyze
        path: PathBuf,

        /// Tokenizer language (java, rust, python, cpp, any)
        #[arg(long)]
        language: Option<String>,

        /// Minimum token count to trigger a match
        #[arg(long = "minimum-token-count")]
        minimum_token_count: Option<u32>,

        /// Charset for reading sources and writing reports
        #[arg(long)]
        encoding: Option<String>,

        /// Treat differing literal values as equal
        #[arg(long = "ignore-literals")]
        ignore_literals: bool,

        /// Treat differing identifiers as equal
        #[arg(long = "ignore-identifiers")]
        ignore_identifiers: bool,

        /// Skip annotations when tokenizing
        #[arg(long = "ignore-annotations")]
        ignore_annotations: bool,

        /// Report duplicates as a warning instead of failing
        #[arg(long = "ignore-failures")]
        ignore_failures: bool,

        /// Skip files with the same name and length
        #[arg(long = "skip-duplicate-files")]
        skip_duplicate_files: bool,

        /// Skip files that cannot be tokenized instead of aborting
        #[arg(long = "skip-lexical-errors")]
        skip_lexical_errors: bool,

        /// Disable skipping of preprocessor-guarded blocks
        #[arg(long = "no-skip-blocks")]
        no_skip_blocks: bool,

        /// Start and end markers of guarded blocks, separated by '|'
        #[arg(long = "skip-blocks-pattern")]
        skip_blocks_pattern: Option<String>,

        /// Glob patterns of paths to exclude
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Write a CSV report to this path
        #[arg(long = "csv-report")]
        csv_report: Option<PathBuf>,

        /// Column separator for the CSV report
        #[arg(long = "csv-separator", value_parser = parse_separator, default_value = ",")]
        csv_separator: char,

        /// Drop the line count columns from the CSV report
        #[arg(long = "csv-no-line-count")]
        csv_no_line_count: bool,

        /// Write a plain text report to this path
        #[arg(long = "text-report")]
        text_report: Option<PathBuf>,

        /// Banner line between text report blocks
        #[arg(long = "text-line-separator")]
        text_line_separator: Option<String>,

        /// Strip the whitespace prefix shared by a fragment's lines
        #[arg(long = "text-trim-leading-whitespace")]
        text_trim_leading_whitespace: bool,

        /// Write a Visual Studio format report to this path
        #[arg(long = "vs-report")]
        vs_report: Option<PathBuf>,

        /// Write an XML report to this path (default report when none given)
        #[arg(long = "xml-report")]
        xml_report: Option<PathBuf>,

        /// Per-report charset, overriding the run encoding
        #[arg(long = "report-encoding")]
        report_encoding: Option<String>,
    },

    /// Write a default .dupmap.toml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_separator(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err("separator must be a single character".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_parses_with_defaults() {
        let cli = Cli::try_parse_from(["dupmap", "check", "src"]).unwrap();
        match cli.command {
            Commands::Check {
                path,
                language,
                csv_separator,
                ..
            } => {
                assert_eq!(path, PathBuf::from("src"));
                assert!(language.is_none());
                assert_eq!(csv_separator, ',');
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn multi_character_separator_is_rejected() {
        assert!(Cli::try_parse_from(["dupmap", "check", "src", "--csv-separator", ";;"]).is_err());
    }

    #[test]
    fn report_flags_parse() {
        let cli = Cli::try_parse_from([
            "dupmap",
            "check",
            "src",
            "--xml-report",
            "out/dup.xml",
            "--csv-report",
            "out/dup.csv",
            "--ignore-failures",
        ])
        .unwrap();
        match cli.command {
            Commands::Check {
                xml_report,
                csv_report,
                ignore_failures,
                ..
            } => {
                assert_eq!(xml_report, Some(PathBuf::from("out/dup.xml")));
                assert_eq!(csv_report, Some(PathBuf::from("out/dup.csv")));
                assert!(ignore_failures);
            }
            _ => unreachable!(),
        }
    }
}
