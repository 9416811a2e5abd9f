//! PowerPoint (.pptx) presentation support.
//!
//! Presentations are opened as a [`Package`], which hands out [`Slide`]s as
//! owned XML trees. Slides are edited through the helpers in [`shapes`] and
//! written back with [`Package::commit_slide`].
//!
//! # Example
//!
//! ```rust,no_run
//! use longan::ooxml::pptx::{Package, shapes::textframe};
//!
//! let mut pkg = Package::open("deck.pptx")?;
//! let layout = pkg.layout_partnames()?[0].clone();
//! let mut slide = pkg.add_slide(&layout)?;
//! if let Some(index) = slide.title_shape().map(|s| s.index()) {
//!     if let Some(title) = slide.shape_mut(index) {
//!         textframe::set_text(title, "Quarterly review");
//!     }
//! }
//! pkg.commit_slide(&slide)?;
//! pkg.save("out.pptx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod format;
pub mod package;
pub mod shapes;
pub mod slide;
pub mod template;

pub use format::{ImageFormat, TextFormat};
pub use package::Package;
pub use slide::{InheritedGeometry, Slide};
