/// Open Packaging Conventions (OPC) implementation.
///
/// The container layer shared by the presentation and word-processing readers:
///
/// - Part names and relative references ([`PackURI`])
/// - Parts and their relationships
/// - Content type discovery and emission
/// - ZIP-based physical packaging
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part, XmlPart};
pub use rel::{Relationship, Relationships};
