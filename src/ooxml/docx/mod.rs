//! Word (.docx) reading.
//!
//! Only what the document structurer needs: body paragraphs in order, each
//! with its text and resolved paragraph style.

pub mod package;
pub mod paragraph;
pub mod styles;

pub use package::Package;
pub use paragraph::Paragraph;
pub use styles::StyleNames;
