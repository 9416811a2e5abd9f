//! Text frame access for shapes.
//!
//! Paragraphs are separated by `\n` and line breaks (`a:br`) are reported as
//! `\v`, so text read from one shape can be written into another without
//! losing its line structure.
use crate::common::unit::pt_to_centipoints;
use crate::common::xml::XmlElement;
use crate::ooxml::pptx::format::TextFormat;

/// Children of `a:rPr` that must follow a fill, in schema order.
const AFTER_FILL: &[&str] = &[
    "effectLst", "effectDag", "highlight", "uLnTx", "uLn", "uFillTx", "uFill", "latin", "ea",
    "cs", "sym", "hlinkClick", "hlinkMouseOver", "rtl", "extLst",
];

/// Children of `a:rPr` that must follow `a:latin`.
const AFTER_LATIN: &[&str] = &["ea", "cs", "sym", "hlinkClick", "hlinkMouseOver", "rtl", "extLst"];

/// The shape's `p:txBody`.
pub fn text_body(shape: &XmlElement) -> Option<&XmlElement> {
    shape.child("txBody")
}

fn text_body_mut(shape: &mut XmlElement) -> &mut XmlElement {
    if shape.position("txBody").is_none() {
        let body = XmlElement::new("p:txBody")
            .with_child(XmlElement::new("a:bodyPr"))
            .with_child(XmlElement::new("a:lstStyle"));
        shape.insert_before(body, "extLst");
    }
    match shape.child_mut("txBody") {
        Some(body) => body,
        None => unreachable!("txBody inserted above"),
    }
}

/// Text of a shape's text frame, empty when it has none.
pub fn text_of(shape: &XmlElement) -> String {
    let Some(body) = text_body(shape) else {
        return String::new();
    };
    body.elements()
        .filter(|el| el.local_name() == "p")
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn paragraph_text(p: &XmlElement) -> String {
    let mut text = String::new();
    for el in p.elements() {
        match el.local_name() {
            "r" | "fld" => {
                if let Some(t) = el.child("t") {
                    text.push_str(&t.text());
                }
            },
            "br" => text.push('\u{b}'),
            _ => {},
        }
    }
    text
}

/// Replace all paragraphs of the shape's text frame with `text`.
///
/// Each `\n`-separated line becomes a paragraph and each `\v` a line break.
/// The first paragraph's properties and the first run's properties are
/// kept, so the new text takes the look of the text it replaces.
pub fn set_text(shape: &mut XmlElement, text: &str) {
    let body = text_body_mut(shape);
    let first_p = body.elements().find(|el| el.local_name() == "p");
    let p_pr = first_p.and_then(|p| p.child("pPr")).cloned();
    let r_pr = first_p
        .and_then(|p| p.elements().find(|el| el.local_name() == "r"))
        .and_then(|r| r.child("rPr"))
        .cloned();

    body.remove_elements("p");
    for line in text.split('\n') {
        let mut p = XmlElement::new("a:p");
        if let Some(p_pr) = &p_pr {
            p.push(p_pr.clone());
        }
        for (i, segment) in line.split('\u{b}').enumerate() {
            if i > 0 {
                let mut br = XmlElement::new("a:br");
                if let Some(r_pr) = &r_pr {
                    br.push(r_pr.clone());
                }
                p.push(br);
            }
            if segment.is_empty() {
                continue;
            }
            let mut r = XmlElement::new("a:r");
            if let Some(r_pr) = &r_pr {
                r.push(r_pr.clone());
            }
            r.push(XmlElement::new("a:t").with_text(segment));
            p.push(r);
        }
        body.insert_before(p, "extLst");
    }
}

fn paragraphs_mut(shape: &mut XmlElement) -> impl Iterator<Item = &mut XmlElement> {
    shape
        .child_mut("txBody")
        .into_iter()
        .flat_map(|body| body.elements_mut())
        .filter(|el| el.local_name() == "p")
}

/// Set `algn="ctr"` on every paragraph.
pub fn center_paragraphs(shape: &mut XmlElement) {
    for p in paragraphs_mut(shape) {
        p.get_or_insert_first("a:pPr").set_attr("algn", "ctr");
    }
}

/// Set every run to exactly `centipoints`, whatever size it had. Returns the
/// number of runs whose size changed.
pub fn set_run_sizes(shape: &mut XmlElement, centipoints: u32) -> usize {
    let value = centipoints.to_string();
    let mut changed = 0;
    for p in paragraphs_mut(shape) {
        for r in p.elements_mut().filter(|el| el.local_name() == "r") {
            let r_pr = r.get_or_insert_first("a:rPr");
            if r_pr.attr("sz").as_deref() != Some(value.as_str()) {
                r_pr.set_attr("sz", &value);
                changed += 1;
            }
        }
    }
    changed
}

/// Apply run formatting to every run and line break of the shape.
pub fn apply_text_format(shape: &mut XmlElement, format: &TextFormat) {
    for p in paragraphs_mut(shape) {
        for r in p
            .elements_mut()
            .filter(|el| matches!(el.local_name(), "r" | "br" | "fld"))
        {
            let r_pr = r.get_or_insert_first("a:rPr");
            if let Some(size) = format.size {
                r_pr.set_attr("sz", &pt_to_centipoints(size).to_string());
            }
            if let Some(bold) = format.bold {
                r_pr.set_attr("b", if bold { "1" } else { "0" });
            }
            if let Some(italic) = format.italic {
                r_pr.set_attr("i", if italic { "1" } else { "0" });
            }
            if let Some(color) = &format.color {
                r_pr.remove_elements("solidFill");
                r_pr.remove_elements("noFill");
                r_pr.remove_elements("gradFill");
                let fill = XmlElement::new("a:solidFill")
                    .with_child(XmlElement::new("a:srgbClr").with_attr("val", color));
                insert_ordered(r_pr, fill, AFTER_FILL);
            }
            if let Some(font) = &format.font {
                r_pr.remove_elements("latin");
                let latin = XmlElement::new("a:latin").with_attr("typeface", font);
                insert_ordered(r_pr, latin, AFTER_LATIN);
            }
        }
    }
}

/// Insert `child` before the first existing element named in `successors`.
fn insert_ordered(parent: &mut XmlElement, child: XmlElement, successors: &[&str]) {
    let pos = successors.iter().filter_map(|local| parent.position(local)).min();
    match pos {
        Some(pos) => parent.insert(pos, child),
        None => parent.push(child),
    }
}
