//! The render loop: one pass over the descriptor list, one file per
//! descriptor, stop at the first failure.

use std::fs::{self, File};
use std::io::Write as _;
use std::path::Path;
use std::rc::Rc;

use crate::core::DuplicateMatch;
use crate::errors::ReportError;
use crate::report::context::{HtmlEscapeSerializer, SerializerScope};
use crate::report::encoding::{self, Encoding};
use crate::report::{csv, text, vs, xml, ReportDescriptor};

/// Render every enabled report in declaration order. The first failure
/// aborts the remaining renders and propagates: a partial report set is
/// worse than an early abort the caller can retry wholesale.
pub fn generate(
    reports: &[ReportDescriptor],
    matches: &[DuplicateMatch],
    run_encoding: Option<Encoding>,
) -> Result<(), ReportError> {
    log::info!("Generating {} report(s)", reports.len());
    for report in reports {
        render_one(report, matches, run_encoding)?;
    }
    Ok(())
}

fn render_one(
    report: &ReportDescriptor,
    matches: &[DuplicateMatch],
    run_encoding: Option<Encoding>,
) -> Result<(), ReportError> {
    let destination = report.destination();
    log::debug!(
        "Rendering {} report to {}",
        report.format_name(),
        destination.display()
    );

    let encoding = match report {
        // The VS format always uses the platform default writer.
        ReportDescriptor::Vs { .. } => Encoding::PLATFORM_DEFAULT,
        _ => encoding::resolve(report.encoding(), run_encoding)
            .map_err(|e| ReportError::UnsupportedEncoding(e.0))?,
    };

    let content = match report {
        ReportDescriptor::Csv {
            separator,
            include_line_count,
            ..
        } => csv::render(matches, *separator, *include_line_count),
        ReportDescriptor::Text {
            line_separator,
            trim_leading_whitespace,
            ..
        } => text::render(matches, line_separator, *trim_leading_whitespace),
        ReportDescriptor::Vs { .. } => vs::render(matches),
        ReportDescriptor::Xml { .. } => {
            // The XML escaper is resolved through the scoped context; bind
            // it for exactly the duration of this render. The guard restores
            // the previous binding even when rendering fails.
            let _scope = SerializerScope::enter(Rc::new(HtmlEscapeSerializer));
            xml::render(matches, encoding)?
        }
    };

    let bytes = encoding.encode(&content).map_err(|e| ReportError::Encode {
        path: destination.to_path_buf(),
        encoding: e.encoding.to_string(),
        message: e.to_string(),
    })?;

    write_report(destination, &bytes)
}

/// Scoped write of the destination: create parent directories, write, flush.
/// Any failure surfaces as a `ReportError`; the handle closes on every exit
/// path so a truncated file is never silently treated as complete.
fn write_report(destination: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let io_error = |source: std::io::Error| ReportError::Io {
        path: destination.to_path_buf(),
        source,
    };

    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
    }

    let mut file = File::create(destination).map_err(io_error)?;
    file.write_all(bytes).map_err(io_error)?;
    file.flush().map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Occurrence;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn sample_matches() -> Vec<DuplicateMatch> {
        vec![DuplicateMatch {
            token_count: 12,
            line_count: 2,
            occurrences: vec![
                Occurrence {
                    file: PathBuf::from("/src/a.rs"),
                    start_line: 1,
                    end_line: 2,
                },
                Occurrence {
                    file: PathBuf::from("/src/b.rs"),
                    start_line: 7,
                    end_line: 8,
                },
            ],
            fragment: "let a = 1;\nlet b = 2;".to_string(),
        }]
    }

    #[test]
    fn renders_all_reports_in_declaration_order() {
        let dir = TempDir::new().unwrap();
        let reports = vec![
            ReportDescriptor::csv(dir.path().join("out.csv")),
            ReportDescriptor::text(dir.path().join("out.txt")),
            ReportDescriptor::vs(dir.path().join("out.vs")),
            ReportDescriptor::xml(dir.path().join("out.xml")),
        ];
        generate(&reports, &sample_matches(), None).unwrap();
        for report in &reports {
            assert!(report.destination().exists());
        }
    }

    #[test]
    fn rendering_twice_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let reports = vec![
            ReportDescriptor::csv(dir.path().join("out.csv")),
            ReportDescriptor::xml(dir.path().join("out.xml")),
        ];
        let matches = sample_matches();

        generate(&reports, &matches, None).unwrap();
        let first_csv = std::fs::read(dir.path().join("out.csv")).unwrap();
        let first_xml = std::fs::read(dir.path().join("out.xml")).unwrap();

        generate(&reports, &matches, None).unwrap();
        assert_eq!(std::fs::read(dir.path().join("out.csv")).unwrap(), first_csv);
        assert_eq!(std::fs::read(dir.path().join("out.xml")).unwrap(), first_xml);
    }

    #[test]
    fn xml_declaration_uses_the_resolved_encoding() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("out.xml");
        let reports = vec![ReportDescriptor::Xml {
            destination: destination.clone(),
            encoding: Some("ISO-8859-1".to_string()),
        }];
        generate(&reports, &sample_matches(), Some(Encoding::Utf8)).unwrap();
        let written = std::fs::read_to_string(destination).unwrap();
        assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>"));
    }

    #[test]
    fn unknown_report_encoding_aborts_the_render_phase() {
        let dir = TempDir::new().unwrap();
        let reports = vec![
            ReportDescriptor::Xml {
                destination: dir.path().join("bad.xml"),
                encoding: Some("EBCDIC-1047".to_string()),
            },
            ReportDescriptor::csv(dir.path().join("never.csv")),
        ];
        let err = generate(&reports, &sample_matches(), None).unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedEncoding(_)));
        assert!(!dir.path().join("never.csv").exists());
    }

    #[test]
    fn parent_directories_are_created() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("reports").join("dup").join("out.csv");
        generate(
            &[ReportDescriptor::csv(nested.clone())],
            &sample_matches(),
            None,
        )
        .unwrap();
        assert!(nested.exists());
    }
}
