//! Package writer for OPC packages.
//!
//! Serializes `[Content_Types].xml`, the package relationships, and every part
//! reachable from them. Parts that nothing relates to any more (for instance
//! slides dropped from a presentation) are left out of the archive.

use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::error::Result;
use crate::ooxml::opc::package::OpcPackage;
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use crate::ooxml::opc::part::Part;
use crate::ooxml::opc::phys_pkg::PhysPkgWriter;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Serializes an [`OpcPackage`] to a ZIP archive.
pub struct PackageWriter;

impl PackageWriter {
    /// Write a package to a file, replacing any existing file.
    pub fn write<P: AsRef<Path>>(path: P, package: &OpcPackage) -> Result<()> {
        let bytes = Self::to_bytes(package)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Serialize a package to bytes.
    pub fn to_bytes(package: &OpcPackage) -> Result<Vec<u8>> {
        let parts = Self::reachable_parts(package);
        let mut phys_writer = PhysPkgWriter::new();

        let cti = ContentTypesItem::from_parts(&parts);
        phys_writer.write(&PackURI::new(CONTENT_TYPES_URI)?, cti.to_xml().as_bytes())?;

        let package_uri = PackURI::new(PACKAGE_URI)?;
        phys_writer.write(&package_uri.rels_uri()?, package.rels().to_xml().as_bytes())?;

        for part in parts {
            phys_writer.write(part.partname(), part.blob())?;
            if !part.rels().is_empty() {
                let rels_uri = part.partname().rels_uri()?;
                phys_writer.write(&rels_uri, part.rels().to_xml().as_bytes())?;
            }
        }

        phys_writer.finish()
    }

    /// Parts reachable from the package relationships, in discovery order.
    fn reachable_parts(package: &OpcPackage) -> Vec<&dyn Part> {
        let mut found: Vec<&dyn Part> = Vec::new();
        let mut visited: HashSet<PackURI> = HashSet::new();
        let mut stack: Vec<PackURI> = package
            .rels()
            .sorted()
            .into_iter()
            .rev()
            .filter(|rel| !rel.is_external())
            .filter_map(|rel| rel.target_partname().ok())
            .collect();

        while let Some(partname) = stack.pop() {
            if !visited.insert(partname.clone()) {
                continue;
            }
            let Ok(part) = package.get_part(&partname) else {
                tracing::debug!(part = %partname, "dangling relationship left unwritten");
                continue;
            };
            for rel in part.rels().sorted().into_iter().rev() {
                if rel.is_external() {
                    continue;
                }
                if let Ok(target) = rel.target_partname() {
                    if !visited.contains(&target) {
                        stack.push(target);
                    }
                }
            }
            found.push(part);
        }
        found
    }
}

/// Builder for `[Content_Types].xml`.
struct ContentTypesItem {
    /// Extension to content type
    defaults: BTreeMap<String, String>,
    /// Partname to content type
    overrides: BTreeMap<String, String>,
}

impl ContentTypesItem {
    fn from_parts(parts: &[&dyn Part]) -> Self {
        let mut cti = Self {
            defaults: BTreeMap::new(),
            overrides: BTreeMap::new(),
        };
        cti.defaults
            .insert("rels".to_string(), ct::OPC_RELATIONSHIPS.to_string());
        cti.defaults.insert("xml".to_string(), ct::XML.to_string());

        for part in parts {
            cti.add_content_type(part.partname(), part.content_type());
        }
        cti
    }

    /// Well-known media extensions become Defaults; everything else an Override.
    fn add_content_type(&mut self, partname: &PackURI, content_type: &str) {
        let ext = partname.ext().to_lowercase();
        if Self::is_default_content_type(&ext, content_type) {
            self.defaults.insert(ext, content_type.to_string());
        } else {
            self.overrides
                .insert(partname.to_string(), content_type.to_string());
        }
    }

    fn is_default_content_type(ext: &str, content_type: &str) -> bool {
        matches!(
            (ext, content_type),
            ("rels", ct::OPC_RELATIONSHIPS)
                | ("xml", ct::XML)
                | ("png", ct::PNG)
                | ("jpg", ct::JPEG)
                | ("jpeg", ct::JPEG)
                | ("gif", ct::GIF)
                | ("bmp", ct::BMP)
                | ("tif", ct::TIFF)
                | ("tiff", ct::TIFF)
                | ("emf", ct::X_EMF)
                | ("wmf", ct::X_WMF)
        )
    }

    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        for (ext, content_type) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(content_type)
            ));
        }
        for (partname, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(content_type)
            ));
        }
        xml.push_str("</Types>");

        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as rt;
    use crate::ooxml::opc::part::{BlobPart, XmlPart};

    #[test]
    fn test_content_types_xml() {
        let slide = XmlPart::new(
            PackURI::new("/ppt/slides/slide1.xml").unwrap(),
            ct::PML_SLIDE.to_string(),
            Vec::new(),
        );
        let image = BlobPart::new(
            PackURI::new("/ppt/media/image1.png").unwrap(),
            ct::PNG.to_string(),
            Vec::new(),
        );
        let parts: Vec<&dyn Part> = vec![&slide, &image];
        let xml = ContentTypesItem::from_parts(&parts).to_xml();

        assert!(xml.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(xml.contains(r#"<Override PartName="/ppt/slides/slide1.xml""#));
        assert!(!xml.contains(r#"PartName="/ppt/media/image1.png""#));
    }

    #[test]
    fn test_unreachable_parts_are_not_written() {
        let mut pkg = OpcPackage::new();
        let pres = PackURI::new("/ppt/presentation.xml").unwrap();
        pkg.add_part(Box::new(XmlPart::new(
            pres.clone(),
            ct::PML_PRESENTATION_MAIN.to_string(),
            b"<p:presentation/>".to_vec(),
        )));
        pkg.add_part(Box::new(XmlPart::new(
            PackURI::new("/ppt/slides/slide9.xml").unwrap(),
            ct::PML_SLIDE.to_string(),
            b"<p:sld/>".to_vec(),
        )));
        pkg.relate_to(&pres, rt::OFFICE_DOCUMENT);

        let bytes = PackageWriter::to_bytes(&pkg).unwrap();
        let reopened = OpcPackage::from_bytes(bytes).unwrap();
        assert!(reopened.contains_part(&pres));
        assert_eq!(reopened.part_count(), 1);
    }
}
