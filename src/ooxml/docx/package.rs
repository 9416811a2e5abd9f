/// Package implementation for Word documents.
use crate::common::xml::XmlDocument;
use crate::ooxml::docx::paragraph::Paragraph;
use crate::ooxml::docx::styles::StyleNames;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use std::path::Path;

/// A Word (.docx) package.
///
/// # Examples
///
/// ```rust,no_run
/// use longan::ooxml::docx::Package;
///
/// let pkg = Package::open("notes.docx")?;
/// for para in pkg.paragraphs()? {
///     println!("{:?}: {}", para.style_name, para.text);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Package {
    opc: OpcPackage,
}

impl Package {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_opc(OpcPackage::open(path)?)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_opc(OpcPackage::from_bytes(data)?)
    }

    fn from_opc(opc: OpcPackage) -> Result<Self> {
        let main_part = opc
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main document part: {}", e)))?;

        let content_type = main_part.content_type();
        if content_type != ct::WML_DOCUMENT_MAIN && content_type != ct::WML_DOCUMENT_MACRO_MAIN {
            return Err(OoxmlError::InvalidContentType {
                expected: ct::WML_DOCUMENT_MAIN.to_string(),
                got: content_type.to_string(),
            });
        }

        Ok(Self { opc })
    }

    /// Paragraph style names, empty when the document has no styles part.
    pub fn styles(&self) -> Result<StyleNames> {
        let main_part = self.opc.main_document_part()?;
        match main_part.rels().part_with_reltype(rt::STYLES) {
            Ok(rel) => {
                let part = self.opc.get_part(&rel.target_partname()?)?;
                StyleNames::from_xml(part.blob())
            },
            Err(_) => Ok(StyleNames::default()),
        }
    }

    /// Top-level body paragraphs in document order, with style names resolved.
    pub fn paragraphs(&self) -> Result<Vec<Paragraph>> {
        let styles = self.styles()?;
        let doc = XmlDocument::parse(self.opc.main_document_part()?.blob())?;
        let Some(body) = doc.root().child("body") else {
            return Ok(Vec::new());
        };

        Ok(body
            .elements()
            .filter(|el| el.local_name() == "p")
            .map(|p| {
                let mut para = Paragraph::from_element(p);
                para.style_name = para
                    .style_id
                    .as_deref()
                    .map(|id| styles.name(id).unwrap_or(id).to_string());
                para
            })
            .collect())
    }
}
