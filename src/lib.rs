//! Longan - slide decks from documents, and decks restyled onto templates
//!
//! Two pipelines share one PresentationML model:
//!
//! - **Transplant**: rebuild an input deck on the slide designs of a template
//!   deck. Every output slide clones a template slide and receives the input
//!   slide's title, body text and pictures.
//! - **Generate**: structure a .txt, .md or .docx document, summarize it into
//!   a slide outline (heuristically, or through an optional generative-text
//!   service), and render the outline with a named profile.
//!
//! # Example - Restyling a deck
//!
//! ```no_run
//! use longan::transplant::transplant;
//!
//! # fn main() -> Result<(), longan::Error> {
//! let report = transplant("talk.pptx", "corporate.pptx", "talk-restyled.pptx")?;
//! println!("{} slides, {} recoverable failures", report.slides_written, report.failure_count());
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Generating a deck
//!
//! ```no_run
//! use longan::config::Config;
//! use longan::session::Session;
//!
//! # fn main() -> Result<(), longan::Error> {
//! let mut session = Session::from_config(&Config::default())?;
//! let generated = session.generate("report.docx", None)?;
//! println!("wrote {}", generated.output_path.display());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod common;
pub mod config;
pub mod document;
pub mod ooxml;
pub mod profile;
pub mod render;
pub mod session;
pub mod summarize;
pub mod transplant;

pub use common::{Error, Result};
