//! Input slide analysis.
use crate::ooxml::pptx::Slide;
use crate::ooxml::pptx::shapes::Geometry;
use crate::ooxml::pptx::shapes::picture;

/// A text-bearing shape of an input slide.
#[derive(Debug, Clone, PartialEq)]
pub struct TextShapeInfo {
    pub text: String,
    pub geometry: Geometry,
    pub is_title: bool,
}

/// A picture of an input slide.
#[derive(Debug, Clone, PartialEq)]
pub struct PictureInfo {
    pub name: String,
    pub geometry: Geometry,
    /// Embedded image relationship, `None` for linked or broken pictures
    pub r_id: Option<String>,
}

/// What an input slide contributes to the output.
#[derive(Debug, Clone, Default)]
pub struct SlideInfo {
    pub index: usize,
    pub is_first: bool,
    pub is_last: bool,
    pub layout_name: String,
    pub title: Option<String>,
    /// Non-title text shapes in document order
    pub text_shapes: Vec<TextShapeInfo>,
    pub pictures: Vec<PictureInfo>,
    pub placeholder_count: usize,
}

impl SlideInfo {
    /// Text of the non-title shapes, in document order.
    pub fn contents(&self) -> Vec<&str> {
        self.text_shapes
            .iter()
            .filter(|shape| !shape.is_title)
            .map(|shape| shape.text.as_str())
            .collect()
    }

    #[inline]
    pub fn has_title(&self) -> bool {
        self.title.is_some()
    }
}

/// Analyze slide `index` of a deck with `total` slides.
pub fn analyze(slide: &Slide, index: usize, total: usize, layout_name: String) -> SlideInfo {
    let shapes = slide.shapes();

    let title_shape = shapes
        .iter()
        .find(|shape| shape.role().is_some_and(|role| role.is_title()));
    let title_index = title_shape.map(|shape| shape.index());
    let title = title_shape
        .map(|shape| shape.text())
        .filter(|text| !text.trim().is_empty());

    let mut info = SlideInfo {
        index,
        is_first: index == 0,
        is_last: index + 1 == total,
        layout_name,
        title,
        placeholder_count: shapes.iter().filter(|shape| shape.is_placeholder()).count(),
        ..Default::default()
    };

    for shape in &shapes {
        if shape.has_text_frame() && Some(shape.index()) != title_index {
            let text = shape.text();
            if !text.trim().is_empty() {
                info.text_shapes.push(TextShapeInfo {
                    text,
                    geometry: shape.geometry(),
                    is_title: false,
                });
            }
        }
        if shape.is_picture() {
            info.pictures.push(PictureInfo {
                name: shape.name(),
                geometry: shape.geometry(),
                r_id: picture::image_r_id(shape.element()),
            });
        }
    }

    tracing::debug!(
        index,
        title = info.title.as_deref().unwrap_or(""),
        texts = info.text_shapes.len(),
        pictures = info.pictures.len(),
        "analyzed input slide"
    );
    info
}
