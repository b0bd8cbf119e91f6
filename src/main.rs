use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use dupmap::cli::{Cli, Commands};
use dupmap::commands::{self, CheckOptions};
use dupmap::outcome::Outcome;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(Some(message)) => {
            // Designed failure mode: duplicates found and not ignored.
            eprintln!("{message}");
            ExitCode::from(1)
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<Option<String>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            path,
            language,
            minimum_token_count,
            encoding,
            ignore_literals,
            ignore_identifiers,
            ignore_annotations,
            ignore_failures,
            skip_duplicate_files,
            skip_lexical_errors,
            no_skip_blocks,
            skip_blocks_pattern,
            exclude,
            csv_report,
            csv_separator,
            csv_no_line_count,
            text_report,
            text_line_separator,
            text_trim_leading_whitespace,
            vs_report,
            xml_report,
            report_encoding,
        } => {
            let outcome = commands::run_check(CheckOptions {
                path,
                language,
                minimum_token_count,
                encoding,
                ignore_literals,
                ignore_identifiers,
                ignore_annotations,
                ignore_failures,
                skip_duplicate_files,
                skip_lexical_errors,
                no_skip_blocks,
                skip_blocks_pattern,
                exclude,
                csv_report,
                csv_separator,
                csv_no_line_count,
                text_report,
                text_line_separator,
                text_trim_leading_whitespace,
                vs_report,
                xml_report,
                report_encoding,
            })?;
            match outcome {
                Outcome::DuplicatesFound { message } => Ok(Some(message)),
                Outcome::NoDuplicates | Outcome::DuplicatesIgnored { .. } => Ok(None),
            }
        }
        Commands::Init { force } => {
            commands::init_config(force)?;
            Ok(None)
        }
    }
}
