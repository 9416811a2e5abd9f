//! Outlines produced by an external generative-text service.

use super::{Analysis, SlideSpec, Theme};
use crate::common::{Error, Result};
use crate::document::StructuredDocument;
use serde::Deserialize;
use std::fmt::Write;

/// A service that completes a text prompt.
pub trait TextGenerator: Send + Sync {
    /// Short service name for logs.
    fn name(&self) -> &str;

    /// Completion text for `prompt`.
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Reply shape requested from the service.
#[derive(Debug, Deserialize)]
struct GeneratedOutline {
    #[serde(default)]
    theme: Theme,
    slides: Vec<SlideSpec>,
}

/// Prompt asking for an outline of `doc` as JSON.
pub fn build_prompt(doc: &StructuredDocument) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "Title: {}\n", doc.title);
    for section in &doc.sections {
        if !section.heading.is_empty() {
            let _ = writeln!(body, "## {}", section.heading);
        }
        if !section.content.is_empty() {
            let _ = writeln!(body, "{}\n", section.content);
        }
    }

    format!(
        r#"Analyze the document below and produce structured content for a slide presentation.

Document:
{body}
Reply with JSON in exactly this shape:
{{
    "theme": "professional" | "academic" | "minimal",
    "slides": [
        {{"type": "title", "title": "Presentation title", "subtitle": "Optional subtitle"}},
        {{"type": "content", "heading": "Section heading", "bullets": ["Point 1", "Point 2", "Point 3"]}},
        ...
        {{"type": "ending", "title": "Closing line"}}
    ]
}}

Requirements:
1. At most 10 bullets per content slide
2. Each bullet no longer than 30 words
3. Split long content across several slides
4. Choose the theme that suits the content
5. Keep the structure clear and the points focused

Reply with the JSON only, no other text."#
    )
}

/// The JSON object inside a reply, unwrapping a Markdown code fence if present.
pub fn extract_json(reply: &str) -> &str {
    let fenced = if let Some((_, rest)) = reply.split_once("```json") {
        Some(rest.split("```").next().unwrap_or(rest))
    } else {
        let mut parts = reply.split("```");
        match (parts.next(), parts.next()) {
            (Some(_), Some(inner)) => Some(inner),
            _ => None,
        }
    };
    let text = fenced.unwrap_or(reply).trim();

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Parse a service reply into theme and slides.
pub fn parse_reply(reply: &str) -> Result<(Theme, Vec<SlideSpec>)> {
    let outline: GeneratedOutline = serde_json::from_str(extract_json(reply))?;
    if outline.slides.is_empty() {
        return Err(Error::Service("reply has no slides".to_string()));
    }
    Ok((outline.theme, outline.slides))
}

/// Outline `doc` with `generator`.
pub fn analyze(generator: &dyn TextGenerator, doc: &StructuredDocument) -> Result<Analysis> {
    let reply = generator.generate(&build_prompt(doc))?;
    let (theme, slides) = parse_reply(&reply)?;
    Ok(Analysis {
        theme,
        slides,
        used_external_model: true,
    })
}
