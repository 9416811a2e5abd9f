/// Shapes on slides: shape-tree views, text frames and pictures.
///
/// Shapes are edited in place on the owned XML tree of their slide; the
/// functions here take the shape element and leave ownership with the slide.
pub mod base;
pub mod picture;
pub mod textframe;

pub use base::{Geometry, Placeholder, PlaceholderRole, Shape, ShapeType};
