//! Plain text and markdown structuring.

use super::{SectionBuilder, StructuredDocument};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})\s*(.*)$").expect("Failed to build heading pattern"));

static BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-*\u{2022}]\s+(.*)$").expect("Failed to build bullet pattern"));

/// Title used when the text has no heading.
pub const DEFAULT_TITLE: &str = "Document";

/// Structure line-oriented text.
///
/// `#` through `######` open a section whose level is the number of hashes;
/// the first heading is also the title. Bullet lines (`-`, `*` or `•`
/// followed by whitespace) are stored as `- text`, except a bullet that opens
/// an untitled section, which is stored bare. Blank lines are skipped and
/// every other line is appended as is.
///
/// # Examples
///
/// ```rust
/// use longan::document::parse_text_content;
///
/// let doc = parse_text_content("# Launch\n- ship\n- announce\n");
/// assert_eq!(doc.title, "Launch");
/// assert_eq!(doc.sections[0].content, "- ship\n- announce");
/// ```
pub fn parse_text_content(text: &str) -> StructuredDocument {
    let mut builder = SectionBuilder::default();

    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = HEADING.captures(line) {
            let level = caps[1].len() as u8;
            builder.heading(level, caps[2].trim());
            continue;
        }

        if let Some(caps) = BULLET.captures(line) {
            let bullet = caps[1].trim();
            if builder.has_section() {
                builder.line(&format!("- {}", bullet));
            } else {
                builder.line(bullet);
            }
            continue;
        }

        builder.line(line);
    }

    builder.finish(DEFAULT_TITLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_and_levels() {
        let doc = parse_text_content(
            "# Overview\nIntro line.\n\n## Details\nFirst.\nSecond.\n### Deep\n",
        );
        assert_eq!(doc.title, "Overview");
        assert_eq!(doc.sections.len(), 3);
        assert_eq!(doc.sections[0].level, 1);
        assert_eq!(doc.sections[0].content, "Intro line.");
        assert_eq!(doc.sections[1].level, 2);
        assert_eq!(doc.sections[1].heading, "Details");
        assert_eq!(doc.sections[1].content, "First.\nSecond.");
        assert_eq!(doc.sections[2].level, 3);
        assert!(doc.sections[2].content.is_empty());
    }

    #[test]
    fn test_bullets() {
        let doc = parse_text_content("* loose\n# List\n- one\n* two\n\u{2022} three\n-not a bullet\n");
        assert_eq!(doc.sections[0].level, 0);
        assert_eq!(doc.sections[0].heading, "");
        assert_eq!(doc.sections[0].content, "loose");
        assert_eq!(doc.sections[1].content, "- one\n- two\n- three\n-not a bullet");
    }

    #[test]
    fn test_text_without_headings() {
        let doc = parse_text_content("alpha\n\n   \nbeta  \n");
        assert_eq!(doc.title, DEFAULT_TITLE);
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].content, "alpha\nbeta");

        let empty = parse_text_content("");
        assert_eq!(empty.title, DEFAULT_TITLE);
        assert!(empty.sections.is_empty());
    }

    #[test]
    fn test_cjk_heading() {
        let doc = parse_text_content("#研究方法\n實驗設計。\n");
        assert_eq!(doc.title, "研究方法");
        assert_eq!(doc.sections[0].content, "實驗設計。");
    }
}
