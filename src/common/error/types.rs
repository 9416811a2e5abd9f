//! Unified error types for Longan.
//!
//! Every fallible entry point of the library returns this error type. Lower
//! layers (OPC package, PresentationML model, XML tree) keep their own error
//! enums and are folded into this one at the boundary.
use thiserror::Error;

/// Main error type for Longan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// An input deck, template deck, or document is unreadable or is not a valid container
    #[error("Not found or not a valid container: {0}")]
    NotFound(String),

    /// The output location cannot be written
    #[error("Cannot write output: {0}")]
    Write(String),

    /// The document extension has no structurer
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The template deck cannot host any slide
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// Configuration or profile file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The external generative-text service failed
    #[error("Generative service error: {0}")]
    Service(String),

    /// A re-render was requested before any document was analyzed
    #[error("No prior analysis in this session")]
    NoPriorAnalysis,

    /// Presentation model error
    #[error("OOXML error: {0}")]
    Ooxml(#[from] crate::ooxml::error::OoxmlError),

    /// XML tree error
    #[error("XML error: {0}")]
    Xml(#[from] crate::common::xml::XmlError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Longan operations.
pub type Result<T> = std::result::Result<T, Error>;
