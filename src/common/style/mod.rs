//! Style values shared by the renderer and the template profiles.

pub mod color;

pub use color::RGBColor;
