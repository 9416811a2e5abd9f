//! Title and content candidates of an output slide.
use crate::common::unit::EMUS_PER_INCH;
use crate::ooxml::pptx::Slide;
use crate::ooxml::pptx::shapes::{Geometry, PlaceholderRole, Shape};

/// Text boxes starting above this line (2 inches, in EMU) may read as titles.
pub const NEAR_TOP_EMU: i64 = 2 * EMUS_PER_INCH;

/// Text boxes with this many characters or more never read as titles.
pub const TITLE_MAX_CHARS: usize = 100;

/// Which text a candidate may receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateRole {
    Title,
    Content,
}

/// A shape eligible to receive substituted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Position in the shape tree
    pub index: usize,
    pub geometry: Geometry,
}

/// Title and content candidates, each sorted top to bottom, then left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderSet {
    pub titles: Vec<Candidate>,
    pub contents: Vec<Candidate>,
}

impl PlaceholderSet {
    /// Classify the text-frame shapes of a slide.
    pub fn of(slide: &Slide) -> Self {
        Self::from_shapes(&slide.shapes())
    }

    pub fn from_shapes(shapes: &[Shape<'_>]) -> Self {
        let mut set = Self::default();
        for shape in shapes.iter().filter(|shape| shape.has_text_frame()) {
            let candidate = Candidate {
                index: shape.index(),
                geometry: shape.geometry(),
            };
            match role_of(shape) {
                CandidateRole::Title => set.titles.push(candidate),
                CandidateRole::Content => set.contents.push(candidate),
            }
        }
        // Stable, so shapes at the same spot keep document order
        set.titles.sort_by_key(|c| (c.geometry.top, c.geometry.left));
        set.contents.sort_by_key(|c| (c.geometry.top, c.geometry.left));
        set
    }

    /// Shape-tree indexes of every candidate.
    pub fn indexes(&self) -> impl Iterator<Item = usize> + '_ {
        self.titles.iter().chain(&self.contents).map(|c| c.index)
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty() && self.contents.is_empty()
    }
}

/// Role of a text-frame shape on a slide cloned from a template.
pub fn role_of(shape: &Shape<'_>) -> CandidateRole {
    match shape.role() {
        Some(PlaceholderRole::Title | PlaceholderRole::CenterTitle) => CandidateRole::Title,
        Some(
            PlaceholderRole::Body
            | PlaceholderRole::Object
            | PlaceholderRole::Subtitle
            | PlaceholderRole::Picture
            | PlaceholderRole::Other,
        ) => CandidateRole::Content,
        None => {
            let text = shape.text();
            if !text.trim().is_empty()
                && text.chars().count() < TITLE_MAX_CHARS
                && shape.top() < NEAR_TOP_EMU
            {
                CandidateRole::Title
            } else {
                CandidateRole::Content
            }
        },
    }
}
