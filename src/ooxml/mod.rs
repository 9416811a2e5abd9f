//! Office Open XML (OOXML) format implementation.
//!
//! The module is organized into layers:
//!
//! 1. **OPC Layer** (`opc`): package handling (ZIP, parts, relationships)
//! 2. **Format-Specific Modules**:
//!    - `pptx`: PowerPoint decks, read and written
//!    - `docx`: Word documents, read-only paragraph access
//!
//! # Example: Listing slide titles
//!
//! ```rust,no_run
//! use longan::ooxml::pptx::Package;
//!
//! let pkg = Package::open("deck.pptx")?;
//! for index in 0..pkg.slide_count() {
//!     let slide = pkg.slide(index)?;
//!     let title = slide.title_shape().map(|shape| shape.text());
//!     println!("{}: {:?}", index, title);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod docx;
pub mod error;
pub mod opc;
pub mod pptx;

pub use error::{OoxmlError, Result};
