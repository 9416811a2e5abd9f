//! Word document structuring.

use super::{SectionBuilder, StructuredDocument};
use crate::common::{Error, Result};
use crate::ooxml::docx::Package;
use std::path::Path;

/// Section level implied by a heading-like style name, `None` for body text.
fn heading_level(style_name: &str) -> Option<u8> {
    let style = style_name.to_lowercase();
    if !style.contains("title") && !style.contains("heading") {
        return None;
    }
    if style.contains("heading 1") || style.contains("title") {
        Some(1)
    } else {
        Some(2)
    }
}

/// Structure the body of a .docx file.
///
/// Paragraphs whose style name contains "title" or "heading" open a section
/// (level 1 for "heading 1" and title styles, 2 otherwise); the first of them
/// is the document title. Other non-empty paragraphs become content lines.
/// Without any heading the title is the file name.
pub fn parse_docx<P: AsRef<Path>>(path: P) -> Result<StructuredDocument> {
    let path = path.as_ref();
    let pkg = Package::open(path).map_err(|e| Error::not_found(path, e))?;
    let default_title = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    structure(&pkg, &default_title)
}

fn structure(pkg: &Package, default_title: &str) -> Result<StructuredDocument> {
    let mut builder = SectionBuilder::default();

    for para in pkg.paragraphs()? {
        let text = para.text.trim();
        if text.is_empty() {
            continue;
        }
        match para.style_name.as_deref().and_then(heading_level) {
            Some(level) => builder.heading(level, text),
            None => builder.line(text),
        }
    }

    Ok(builder.finish(default_title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::package::tests::build_docx;

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("Title"), Some(1));
        assert_eq!(heading_level("heading 1"), Some(1));
        assert_eq!(heading_level("Heading 2"), Some(2));
        assert_eq!(heading_level("Subtitle"), Some(1));
        assert_eq!(heading_level("Normal"), None);
    }

    #[test]
    fn test_structure_sections() {
        let data = build_docx(&[
            (None, "Preface text"),
            (Some("Title"), "Annual Report"),
            (None, "  "),
            (Some("Heading1"), "Results"),
            (None, "Revenue up."),
            (None, "Costs down."),
            (Some("Heading2"), "Regional"),
            (None, "North led."),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.docx");
        std::fs::write(&path, data).unwrap();

        let doc = parse_docx(&path).unwrap();
        assert_eq!(doc.title, "Annual Report");
        let summary: Vec<(u8, &str, &str)> = doc
            .sections
            .iter()
            .map(|s| (s.level, s.heading.as_str(), s.content.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, "", "Preface text"),
                (1, "Annual Report", ""),
                (1, "Results", "Revenue up.\nCosts down."),
                (2, "Regional", "North led."),
            ]
        );
    }

    #[test]
    fn test_title_defaults_to_file_name() {
        let data = build_docx(&[(None, "Only body text.")]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.docx");
        std::fs::write(&path, data).unwrap();

        let doc = parse_docx(&path).unwrap();
        assert_eq!(doc.title, "memo.docx");
        assert_eq!(doc.sections.len(), 1);
    }

    #[test]
    fn test_invalid_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"not a zip").unwrap();
        assert!(matches!(parse_docx(&path), Err(Error::NotFound(_))));
    }
}
