//! Deterministic summarizer: keyword theme detection, bullet splitting and
//! pagination.

use super::{Analysis, Limits, SlideSpec, Theme};
use crate::document::StructuredDocument;
use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

static ACADEMIC_KEYWORDS: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(["research", "論文", "實驗", "研究", "experiment", "methodology"])
        .expect("Failed to build academic keyword matcher")
});

static PROFESSIONAL_KEYWORDS: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(["api", "implementation", "architecture", "design", "系統", "技術"])
        .expect("Failed to build professional keyword matcher")
});

const SENTENCE_TERMINATORS: [char; 6] = ['.', '!', '?', '。', '！', '？'];

/// Theme implied by the section headings and content.
///
/// Academic keywords win over professional ones; the document title is not
/// scanned.
pub fn detect_theme(doc: &StructuredDocument) -> Theme {
    let text = doc
        .sections
        .iter()
        .map(|s| format!("{} {}", s.heading, s.content))
        .collect::<Vec<_>>()
        .join(" ");

    if ACADEMIC_KEYWORDS.is_match(&text) {
        Theme::Academic
    } else if PROFESSIONAL_KEYWORDS.is_match(&text) {
        Theme::Professional
    } else {
        Theme::Minimal
    }
}

/// Leading `-`, `*` or `•` marker followed by whitespace, removed.
fn strip_bullet_marker(line: &str) -> &str {
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some('-' | '*' | '\u{2022}'), Some(c)) if c.is_whitespace() => chars.as_str().trim_start(),
        (Some('-' | '*' | '\u{2022}'), None) => "",
        _ => line,
    }
}

/// Split after each sentence terminator, dropping the whitespace that follows.
fn split_sentences(line: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = line.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !SENTENCE_TERMINATORS.contains(&c) {
            continue;
        }
        let end = idx + c.len_utf8();
        sentences.push(&line[start..end]);
        start = end;
        while let Some(&(next_idx, next)) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            start = next_idx + next.len_utf8();
            chars.next();
        }
    }
    if start < line.len() {
        sentences.push(&line[start..]);
    }
    sentences
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Split section content into bullet texts.
///
/// Each non-blank line becomes one bullet with its list marker removed. A
/// line longer than `max_chars` characters is split into sentences instead,
/// each cut to `max_chars` characters.
///
/// # Examples
///
/// ```rust
/// use longan::summarize::heuristic::split_into_bullets;
///
/// let bullets = split_into_bullets("- fast\n- small", 80);
/// assert_eq!(bullets, vec!["fast", "small"]);
/// ```
pub fn split_into_bullets(text: &str, max_chars: usize) -> Vec<String> {
    let mut bullets = Vec::new();

    for line in text.lines() {
        let line = strip_bullet_marker(line.trim()).trim();
        if line.is_empty() {
            continue;
        }
        if line.chars().count() <= max_chars {
            bullets.push(line.to_string());
            continue;
        }
        for sentence in split_sentences(line) {
            let sentence = sentence.trim();
            if !sentence.is_empty() {
                bullets.push(truncate_chars(sentence, max_chars));
            }
        }
    }

    bullets
}

/// Content slides for one heading, at most `max_bullets` bullets each.
///
/// With more than one page every heading gains a ` (i/n)` suffix. An empty
/// bullet list still yields one slide.
pub fn paginate(heading: &str, bullets: Vec<String>, max_bullets: usize) -> Vec<SlideSpec> {
    if bullets.is_empty() {
        return vec![SlideSpec::Content {
            heading: heading.to_string(),
            bullets,
        }];
    }

    let per_page = max_bullets.max(1);
    let page_count = bullets.len().div_ceil(per_page);
    bullets
        .chunks(per_page)
        .enumerate()
        .map(|(i, page)| SlideSpec::Content {
            heading: if page_count == 1 {
                heading.to_string()
            } else {
                format!("{} ({}/{})", heading, i + 1, page_count)
            },
            bullets: page.to_vec(),
        })
        .collect()
}

/// Summarize without any external service.
///
/// One title slide, the content slides of every non-empty section, and a
/// closing slide.
pub fn analyze(doc: &StructuredDocument, limits: &Limits) -> Analysis {
    let mut slides = vec![SlideSpec::Title {
        title: doc.title.clone(),
        subtitle: String::new(),
    }];

    for section in doc.sections.iter().filter(|s| !s.is_empty()) {
        let bullets = split_into_bullets(&section.content, limits.max_chars_per_bullet);
        slides.extend(paginate(
            &section.heading,
            bullets,
            limits.max_bullets_per_slide,
        ));
    }

    slides.push(SlideSpec::Ending {
        title: limits.closing_title.clone(),
    });

    Analysis {
        theme: detect_theme(doc),
        slides,
        used_external_model: false,
    }
}
