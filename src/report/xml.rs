//! XML rendering in the pmd-cpd document shape.
//!
//! The escaper is looked up from the scoped serializer context; rendering
//! outside a [`crate::report::context::SerializerScope`] is an error, not a
//! silently unescaped report.

use std::fmt::Write as _;

use crate::core::DuplicateMatch;
use crate::errors::ReportError;
use crate::report::context;
use crate::report::encoding::Encoding;

pub fn render(matches: &[DuplicateMatch], encoding: Encoding) -> Result<String, ReportError> {
    let serializer = context::current().ok_or_else(|| {
        ReportError::SerializerUnavailable(
            "no serializer bound; XML must render inside a SerializerScope".to_string(),
        )
    })?;

    let mut out = String::new();
    let _ = writeln!(out, "<?xml version=\"1.0\" encoding=\"{}\"?>", encoding.label());
    out.push_str("<pmd-cpd>\n");
    for m in matches {
        let _ = writeln!(
            out,
            "   <duplication lines=\"{}\" tokens=\"{}\">",
            m.line_count, m.token_count
        );
        for occ in &m.occurrences {
            let _ = writeln!(
                out,
                "      <file line=\"{}\" path=\"{}\"/>",
                occ.start_line,
                serializer.escape_attribute(&occ.file.display().to_string())
            );
        }
        let _ = writeln!(
            out,
            "      <codefragment>{}</codefragment>",
            serializer.escape_text(&m.fragment)
        );
        out.push_str("   </duplication>\n");
    }
    out.push_str("</pmd-cpd>\n");
    Ok(out)
}
