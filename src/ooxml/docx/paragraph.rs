/// Body paragraphs of a Word document.
use crate::common::xml::XmlElement;

/// A `w:p` element reduced to its style and plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// `w:pPr/w:pStyle/@w:val`
    pub style_id: Option<String>,
    /// Display name of the style, falling back to the id
    pub style_name: Option<String>,
    /// Text of all runs; tabs and breaks become `\t` and `\n`
    pub text: String,
}

impl Paragraph {
    pub(crate) fn from_element(p: &XmlElement) -> Self {
        let style_id = p
            .find(&["pPr", "pStyle"])
            .and_then(|style| style.attr("w:val"));
        let mut text = String::new();
        collect_text(p, &mut text);
        Self {
            style_id,
            style_name: None,
            text,
        }
    }
}

/// Run text in document order, including runs nested in hyperlinks and smart tags.
fn collect_text(el: &XmlElement, out: &mut String) {
    for child in el.elements() {
        match child.local_name() {
            "t" => out.push_str(&child.text()),
            "tab" => out.push('\t'),
            "br" | "cr" => out.push('\n'),
            // Paragraph properties and deleted text carry no visible content
            "pPr" | "rPr" | "del" | "delText" => {},
            _ => collect_text(child, out),
        }
    }
}
