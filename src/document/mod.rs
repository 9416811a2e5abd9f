//! Document structurer.
//!
//! Turns a source document into a title plus an ordered list of sections,
//! the input of the summarizer. The parser is chosen by file extension:
//!
//! - `.txt`, `.md`: line-oriented text with markdown headings and bullets
//! - `.docx`: Word body paragraphs, sectioned by heading styles
//!
//! # Example
//!
//! ```rust,no_run
//! use longan::document::parse_document;
//!
//! let doc = parse_document("notes.md")?;
//! println!("{} ({} sections)", doc.title, doc.sections.len());
//! # Ok::<(), longan::common::Error>(())
//! ```

mod docx;
mod text;

pub use docx::parse_docx;
pub use text::parse_text_content;

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A document reduced to its headings and body text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDocument {
    pub title: String,
    pub sections: Vec<Section>,
}

/// One heading and the text under it.
///
/// Level 0 marks content that appeared before any heading; its heading is
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub level: u8,
    pub heading: String,
    /// Lines joined by `\n`; bullets are stored as `- text`
    pub content: String,
}

impl Section {
    pub(crate) fn new(level: u8, heading: impl Into<String>) -> Self {
        Self {
            level,
            heading: heading.into(),
            content: String::new(),
        }
    }

    /// Append one line of body text.
    pub(crate) fn push_line(&mut self, line: &str) {
        if !self.content.is_empty() {
            self.content.push('\n');
        }
        self.content.push_str(line);
    }

    /// Whether the section carries neither a heading nor any text.
    pub fn is_empty(&self) -> bool {
        self.heading.trim().is_empty() && self.content.trim().is_empty()
    }
}

/// Collects sections while a parser walks its input.
#[derive(Debug, Default)]
pub(crate) struct SectionBuilder {
    title: Option<String>,
    sections: Vec<Section>,
    current: Option<Section>,
}

impl SectionBuilder {
    /// Close the current section and open a new one. The first heading seen
    /// becomes the document title.
    pub(crate) fn heading(&mut self, level: u8, heading: &str) {
        if let Some(done) = self.current.take() {
            self.sections.push(done);
        }
        if self.title.is_none() {
            self.title = Some(heading.to_string());
        }
        self.current = Some(Section::new(level, heading));
    }

    /// Append a line to the current section, opening an untitled one if needed.
    pub(crate) fn line(&mut self, line: &str) {
        self.current
            .get_or_insert_with(|| Section::new(0, ""))
            .push_line(line);
    }

    /// Whether a section is open.
    pub(crate) fn has_section(&self) -> bool {
        self.current.is_some()
    }

    pub(crate) fn finish(mut self, default_title: &str) -> StructuredDocument {
        if let Some(done) = self.current.take() {
            self.sections.push(done);
        }
        StructuredDocument {
            title: self.title.unwrap_or_else(|| default_title.to_string()),
            sections: self.sections,
        }
    }
}

/// Parse the document at `path`, dispatching on its lowercase extension.
///
/// Fails with [`Error::UnsupportedFormat`] for any extension other than
/// `txt`, `md` and `docx`, and with [`Error::NotFound`] when the file cannot
/// be read.
pub fn parse_document<P: AsRef<Path>>(path: P) -> Result<StructuredDocument> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    debug!(path = %path.display(), ext = %ext, "structuring document");

    match ext.as_str() {
        "txt" | "md" => {
            let text = std::fs::read_to_string(path).map_err(|e| Error::not_found(path, e))?;
            Ok(parse_text_content(&text))
        },
        "docx" => parse_docx(path),
        _ => Err(Error::UnsupportedFormat(if ext.is_empty() {
            format!("{} has no extension", path.display())
        } else {
            format!(".{}", ext)
        })),
    }
}
