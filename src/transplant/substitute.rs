//! Text substitution and placeholder pruning.
use crate::common::unit::CENTIPOINTS_PER_PT;
use crate::common::xml::XmlElement;
use crate::ooxml::pptx::Slide;
use crate::ooxml::pptx::shapes::textframe;
use crate::transplant::classifier::PlaceholderSet;

/// Font size (14pt, in hundredths of a point) of substituted body text.
pub const CONTENT_MAX_CENTIPOINTS: u32 = 14 * CENTIPOINTS_PER_PT;

/// Replace a shape's text. Titles are centered; every body run ends at exactly
/// 14pt, including runs that inherited a smaller size from the template.
pub fn substitute_text(shape: &mut XmlElement, text: &str, is_title: bool) {
    textframe::set_text(shape, text);
    if is_title {
        textframe::center_paragraphs(shape);
    } else {
        textframe::set_run_sizes(shape, CONTENT_MAX_CENTIPOINTS);
    }
}

/// Result of filling a slide's candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filled {
    pub titles_set: usize,
    pub contents_set: usize,
    pub dropped_contents: usize,
    /// Candidates that received nothing, as shape-tree indexes
    pub unused: Vec<usize>,
}

/// Put `title` into the first title candidate and `contents` into the content
/// candidates one-to-one, in sort order.
pub fn fill_candidates(
    slide: &mut Slide,
    set: &PlaceholderSet,
    title: Option<&str>,
    contents: &[&str],
) -> Filled {
    let mut filled = Filled::default();
    let mut used = Vec::new();

    if let (Some(title), Some(candidate)) = (title, set.titles.first()) {
        if let Some(shape) = slide.shape_mut(candidate.index) {
            substitute_text(shape, title, true);
            used.push(candidate.index);
            filled.titles_set += 1;
        }
    }

    for (text, candidate) in contents.iter().zip(&set.contents) {
        if let Some(shape) = slide.shape_mut(candidate.index) {
            substitute_text(shape, text, false);
            used.push(candidate.index);
            filled.contents_set += 1;
        }
    }

    filled.dropped_contents = contents.len().saturating_sub(set.contents.len());
    if filled.dropped_contents > 0 {
        tracing::warn!(
            dropped = filled.dropped_contents,
            available = set.contents.len(),
            "more input text than content placeholders"
        );
    }

    filled.unused = set.indexes().filter(|index| !used.contains(index)).collect();
    filled
}

/// Delete unused candidates. Returns how many shapes were removed.
pub fn prune(slide: &mut Slide, unused: &[usize]) -> usize {
    let removed = slide.remove_shapes(unused);
    if removed < unused.len() {
        tracing::debug!(
            requested = unused.len(),
            removed,
            "some candidates were already gone"
        );
    }
    removed
}
