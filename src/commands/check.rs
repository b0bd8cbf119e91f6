//! The `check` command: glue between the CLI surface and the pipeline.
//!
//! Merges CLI flags over `.dupmap.toml` defaults, discovers source files,
//! builds the execution configuration and report descriptors, and drives
//! the run: one analysis, N report renders, one outcome.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::loader::{self, DupmapConfig};
use crate::config::ExecutionConfigBuilder;
use crate::engine::{HashEngine, Tokenizer};
use crate::io::FileWalker;
use crate::outcome::{self, Outcome};
use crate::report::{renderer, ReportDescriptor, DEFAULT_LINE_SEPARATOR};
use crate::runner::AnalysisRunner;

#[derive(Debug, Default)]
pub struct CheckOptions {
    pub path: PathBuf,
    pub language: Option<String>,
    pub minimum_token_count: Option<u32>,
    pub encoding: Option<String>,
    pub ignore_literals: bool,
    pub ignore_identifiers: bool,
    pub ignore_annotations: bool,
    pub ignore_failures: bool,
    pub skip_duplicate_files: bool,
    pub skip_lexical_errors: bool,
    pub no_skip_blocks: bool,
    pub skip_blocks_pattern: Option<String>,
    pub exclude: Vec<String>,
    pub csv_report: Option<PathBuf>,
    pub csv_separator: char,
    pub csv_no_line_count: bool,
    pub text_report: Option<PathBuf>,
    pub text_line_separator: Option<String>,
    pub text_trim_leading_whitespace: bool,
    pub vs_report: Option<PathBuf>,
    pub xml_report: Option<PathBuf>,
    pub report_encoding: Option<String>,
}

pub fn run_check(options: CheckOptions) -> Result<Outcome> {
    let file_config = loader::load_config(&options.path);
    let reports = build_reports(&options)?;

    let mut builder = ExecutionConfigBuilder::new().reports(reports);

    let defaults = &file_config.analysis;
    if let Some(language) = options.language.clone().or_else(|| defaults.language.clone()) {
        builder = builder.language(language);
    }
    if let Some(count) = options.minimum_token_count.or(defaults.minimum_token_count) {
        builder = builder.minimum_token_count(count);
    }
    if let Some(encoding) = options.encoding.clone().or_else(|| defaults.encoding.clone()) {
        builder = builder.encoding(encoding);
    }
    if let Some(pattern) = options
        .skip_blocks_pattern
        .clone()
        .or_else(|| defaults.skip_blocks_pattern.clone())
    {
        builder = builder.skip_blocks_pattern(pattern);
    }
    if options.no_skip_blocks {
        builder = builder.skip_blocks(false);
    } else if let Some(skip_blocks) = defaults.skip_blocks {
        builder = builder.skip_blocks(skip_blocks);
    }
    builder = builder
        .ignore_literals(options.ignore_literals || defaults.ignore_literals)
        .ignore_identifiers(options.ignore_identifiers || defaults.ignore_identifiers)
        .ignore_annotations(options.ignore_annotations || defaults.ignore_annotations)
        .skip_duplicate_files(options.skip_duplicate_files || defaults.skip_duplicate_files)
        .skip_lexical_errors(options.skip_lexical_errors || defaults.skip_lexical_errors);

    let (config, reports) = builder.build()?;

    let source_files = discover_source_files(&options, &file_config, &config.language)?;
    if source_files.is_empty() {
        anyhow::bail!("no source files found under '{}'", options.path.display());
    }
    log::info!("Analyzing {} source file(s)", source_files.len());

    let engine = HashEngine;
    let runner = AnalysisRunner::new(&engine);
    let matches = runner.run(&config, &source_files)?;

    renderer::generate(&reports, &matches, config.encoding)?;

    Ok(outcome::evaluate(
        &matches,
        options.ignore_failures,
        Some(reports[0].destination()),
        config.minimum_token_count,
    ))
}

/// Build the descriptor list in declaration order: csv, text, vs, xml.
/// When no report is requested the XML report is enabled at its default
/// location. Destinations are absolutized here so failure messages carry
/// clickable references and renders do not depend on the working directory.
fn build_reports(options: &CheckOptions) -> Result<Vec<ReportDescriptor>> {
    let mut reports = Vec::new();

    if let Some(destination) = &options.csv_report {
        reports.push(ReportDescriptor::Csv {
            destination: absolutize(destination)?,
            encoding: options.report_encoding.clone(),
            separator: options.csv_separator,
            include_line_count: !options.csv_no_line_count,
        });
    }
    if let Some(destination) = &options.text_report {
        reports.push(ReportDescriptor::Text {
            destination: absolutize(destination)?,
            encoding: options.report_encoding.clone(),
            line_separator: options
                .text_line_separator
                .clone()
                .unwrap_or_else(|| DEFAULT_LINE_SEPARATOR.to_string()),
            trim_leading_whitespace: options.text_trim_leading_whitespace,
        });
    }
    if let Some(destination) = &options.vs_report {
        reports.push(ReportDescriptor::Vs {
            destination: absolutize(destination)?,
        });
    }
    if let Some(destination) = &options.xml_report {
        reports.push(ReportDescriptor::Xml {
            destination: absolutize(destination)?,
            encoding: options.report_encoding.clone(),
        });
    }

    if reports.is_empty() {
        reports.push(ReportDescriptor::Xml {
            destination: absolutize(Path::new("dupmap.xml"))?,
            encoding: options.report_encoding.clone(),
        });
    }
    Ok(reports)
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let cwd = std::env::current_dir().context("cannot resolve working directory")?;
        Ok(cwd.join(path))
    }
}

fn discover_source_files(
    options: &CheckOptions,
    file_config: &DupmapConfig,
    language: &str,
) -> Result<Vec<PathBuf>> {
    let extensions = Tokenizer::for_language(language)
        .map(|t| t.extensions().iter().map(|e| e.to_string()).collect::<Vec<_>>())
        .unwrap_or_default();

    let mut exclude = options.exclude.clone();
    exclude.extend(file_config.ignore.patterns.iter().cloned());

    FileWalker::new(options.path.clone())
        .with_extensions(extensions)
        .with_exclude_patterns(exclude)
        .walk()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_options(path: &Path) -> CheckOptions {
        CheckOptions {
            path: path.to_path_buf(),
            csv_separator: ',',
            ..Default::default()
        }
    }

    #[test]
    fn default_report_is_xml() {
        let options = check_options(Path::new("src"));
        let reports = build_reports(&options).unwrap();
        assert_eq!(reports.len(), 1);
        assert!(matches!(reports[0], ReportDescriptor::Xml { .. }));
        assert!(reports[0].destination().is_absolute());
    }

    #[test]
    fn reports_keep_declaration_order() {
        let mut options = check_options(Path::new("src"));
        options.xml_report = Some(PathBuf::from("d.xml"));
        options.csv_report = Some(PathBuf::from("a.csv"));
        options.vs_report = Some(PathBuf::from("c.vs"));
        options.text_report = Some(PathBuf::from("b.txt"));

        let reports = build_reports(&options).unwrap();
        let names: Vec<_> = reports.iter().map(|r| r.format_name()).collect();
        assert_eq!(names, vec!["csv", "text", "vs", "xml"]);
    }

    #[test]
    fn report_encoding_is_applied_to_encoding_bearing_variants() {
        let mut options = check_options(Path::new("src"));
        options.report_encoding = Some("ISO-8859-1".to_string());
        options.csv_report = Some(PathBuf::from("a.csv"));
        options.vs_report = Some(PathBuf::from("c.vs"));

        let reports = build_reports(&options).unwrap();
        assert_eq!(reports[0].encoding(), Some("ISO-8859-1"));
        assert_eq!(reports[1].encoding(), None);
    }
}
