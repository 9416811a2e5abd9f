//! XML helpers shared by the package and presentation layers.

pub mod escape;
pub mod node;

pub use escape::{escape_xml, unescape_xml};
pub use node::{XmlDocument, XmlElement, XmlError, XmlNode};
