/// Package implementation for PowerPoint presentations.
use crate::common::xml::node::local_name_of;
use crate::common::xml::{XmlDocument, XmlElement, XmlNode};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::{content_type as ct, namespace as ns, relationship_type as rt};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::{BlobPart, Part, PartFactory, XmlPart};
use crate::ooxml::opc::rel::Relationships;
use crate::ooxml::pptx::format::ImageFormat;
use crate::ooxml::pptx::shapes::base::{Geometry, Placeholder};
use crate::ooxml::pptx::shapes::picture;
use crate::ooxml::pptx::slide::{InheritedGeometry, Slide};
use crate::ooxml::pptx::template;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Children of `p:presentation` that follow `p:sldIdLst`, in schema order.
const AFTER_SLD_ID_LST: &[&str] = &[
    "sldSz",
    "notesSz",
    "smartTags",
    "embeddedFontLst",
    "custShowLst",
    "photoAlbum",
    "custDataLst",
    "kinsoku",
    "defaultTextStyle",
    "modifyVerifier",
    "extLst",
];

/// Layout placeholders that are not copied onto new slides.
const NON_CLONEABLE_PLACEHOLDERS: &[&str] = &["dt", "ftr", "sldNum"];

/// Lowest valid `p:sldId/@id`.
const MIN_SLIDE_ID: u32 = 256;

/// A PowerPoint (.pptx) package.
///
/// This is the main entry point for working with PowerPoint presentations.
/// It wraps an OPC package, keeps the presentation part parsed, and hands out
/// slides as owned [`Slide`] values that are edited and committed back.
///
/// # Examples
///
/// ```rust,no_run
/// use longan::ooxml::pptx::Package;
///
/// let pkg = Package::open("presentation.pptx")?;
/// println!("Presentation has {} slides", pkg.slide_count());
/// for index in 0..pkg.slide_count() {
///     let slide = pkg.slide(index)?;
///     if let Some(title) = slide.title_shape() {
///         println!("{}: {}", index, title.text());
///     }
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Package {
    /// The underlying OPC package
    opc: OpcPackage,
    pres_partname: PackURI,
    /// Parsed `presentation.xml`, written back after every edit
    pres: XmlDocument,
    /// SHA-256 of every image part, for de-duplication
    image_digests: HashMap<Vec<u8>, PackURI>,
}

impl Package {
    /// Open a .pptx package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_opc(OpcPackage::open(path)?)
    }

    /// Create a .pptx package from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_opc(OpcPackage::from_reader(reader)?)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_opc(OpcPackage::from_bytes(data)?)
    }

    /// A new presentation built on the default template, with no slides.
    pub fn new() -> Result<Self> {
        Self::from_opc(template::default_package()?)
    }

    fn from_opc(opc: OpcPackage) -> Result<Self> {
        // Verify it's a PowerPoint presentation by checking the main part's content type
        let main_part = opc
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main presentation part: {}", e)))?;

        let content_type = main_part.content_type();
        if content_type != ct::PML_PRESENTATION_MAIN
            && content_type != ct::PML_PRES_MACRO_MAIN
            && content_type != ct::PML_TEMPLATE_MAIN
        {
            return Err(OoxmlError::InvalidContentType {
                expected: ct::PML_PRESENTATION_MAIN.to_string(),
                got: content_type.to_string(),
            });
        }

        let pres_partname = main_part.partname().clone();
        let pres = XmlDocument::parse(main_part.blob())?;

        let image_digests = opc
            .iter_parts()
            .filter(|part| ImageFormat::from_content_type(part.content_type()).is_some())
            .map(|part| (Sha256::digest(part.blob()).to_vec(), part.partname().clone()))
            .collect();

        Ok(Self {
            opc,
            pres_partname,
            pres,
            image_digests,
        })
    }

    /// Get the underlying OPC package.
    #[inline]
    pub fn opc_package(&self) -> &OpcPackage {
        &self.opc
    }

    fn pres_part(&self) -> Result<&dyn Part> {
        Ok(self.opc.get_part(&self.pres_partname)?)
    }

    fn pres_part_mut(&mut self) -> Result<&mut dyn Part> {
        Ok(self.opc.get_part_mut(&self.pres_partname)?)
    }

    /// Write the parsed presentation back into its part.
    fn sync_presentation(&mut self) -> Result<()> {
        let blob = self.pres.to_bytes();
        self.pres_part_mut()?.set_blob(blob);
        Ok(())
    }

    fn sld_ids(&self) -> Vec<&XmlElement> {
        self.pres
            .root()
            .child("sldIdLst")
            .map(|lst| lst.elements().filter(|el| el.local_name() == "sldId").collect())
            .unwrap_or_default()
    }

    /// Number of slides listed in the presentation.
    pub fn slide_count(&self) -> usize {
        self.sld_ids().len()
    }

    /// Slide partnames in presentation order.
    pub fn slide_partnames(&self) -> Result<Vec<PackURI>> {
        let pres_part = self.pres_part()?;
        self.sld_ids()
            .into_iter()
            .map(|sld_id| {
                let r_id = rel_id_attr(sld_id, "id")
                    .ok_or_else(|| OoxmlError::InvalidFormat("p:sldId without r:id".to_string()))?;
                Ok(pres_part.related_partname(&r_id)?)
            })
            .collect()
    }

    /// Load the slide at `index`.
    pub fn slide(&self, index: usize) -> Result<Slide> {
        let partnames = self.slide_partnames()?;
        let partname = partnames.get(index).ok_or(OoxmlError::SlideOutOfRange {
            index,
            count: partnames.len(),
        })?;
        self.load_slide(partname)
    }

    fn load_slide(&self, partname: &PackURI) -> Result<Slide> {
        let part = self.opc.get_part(partname)?;
        let doc = XmlDocument::parse(part.blob())?;
        let layout_partname = part
            .rels()
            .part_with_reltype(rt::SLIDE_LAYOUT)
            .ok()
            .and_then(|rel| rel.target_partname().ok());
        let inherited = self.inherited_geometry(layout_partname.as_ref());
        Ok(Slide::new(
            partname.clone(),
            layout_partname,
            doc,
            part.rels().clone(),
            inherited,
        ))
    }

    /// Placeholder geometry from a layout and its master. Unreadable parts
    /// contribute nothing.
    fn inherited_geometry(&self, layout: Option<&PackURI>) -> InheritedGeometry {
        let Some(layout) = layout else {
            return InheritedGeometry::default();
        };
        let parse = |partname: &PackURI| -> Option<(XmlDocument, &dyn Part)> {
            let part = self.opc.get_part(partname).ok()?;
            Some((XmlDocument::parse(part.blob()).ok()?, part))
        };
        let Some((layout_doc, layout_part)) = parse(layout) else {
            tracing::debug!(layout = %layout, "layout unreadable, no inherited geometry");
            return InheritedGeometry::default();
        };
        let master_doc = layout_part
            .rels()
            .part_with_reltype(rt::SLIDE_MASTER)
            .ok()
            .and_then(|rel| rel.target_partname().ok())
            .and_then(|master| parse(&master))
            .map(|(doc, _)| doc);
        InheritedGeometry::from_trees(Some(layout_doc.root()), master_doc.as_ref().map(|d| d.root()))
    }

    /// Slide layout partnames, master by master, in layout-list order.
    pub fn layout_partnames(&self) -> Result<Vec<PackURI>> {
        let pres_part = self.pres_part()?;
        let mut layouts = Vec::new();
        let master_ids = self
            .pres
            .root()
            .child("sldMasterIdLst")
            .map(|lst| lst.elements().collect::<Vec<_>>())
            .unwrap_or_default();

        for master_id in master_ids {
            let Some(r_id) = rel_id_attr(master_id, "id") else {
                continue;
            };
            let master_partname = pres_part.related_partname(&r_id)?;
            let master_part = self.opc.get_part(&master_partname)?;
            let master = XmlDocument::parse(master_part.blob())?;
            if let Some(lst) = master.root().child("sldLayoutIdLst") {
                for layout_id in lst.elements() {
                    if let Some(r_id) = rel_id_attr(layout_id, "id") {
                        layouts.push(master_part.related_partname(&r_id)?);
                    }
                }
            }
        }
        Ok(layouts)
    }

    pub fn layout_count(&self) -> Result<usize> {
        Ok(self.layout_partnames()?.len())
    }

    /// `p:cSld/@name` of a layout, empty when unnamed.
    pub fn layout_name(&self, layout: &PackURI) -> Result<String> {
        let doc = XmlDocument::parse(self.opc.get_part(layout)?.blob())?;
        Ok(doc
            .root()
            .child("cSld")
            .and_then(|c_sld| c_sld.attr("name"))
            .unwrap_or_default())
    }

    /// First layout with this name.
    pub fn layout_by_name(&self, name: &str) -> Result<Option<PackURI>> {
        for layout in self.layout_partnames()? {
            if self.layout_name(&layout)? == name {
                return Ok(Some(layout));
            }
        }
        Ok(None)
    }

    /// Drop every slide, keeping masters, layouts and theme.
    ///
    /// Slide list entries, their presentation relationships and the slide
    /// parts are removed, along with custom shows and section lists that
    /// would refer to them. Returns the number of slides removed.
    pub fn remove_all_slides(&mut self) -> Result<usize> {
        let r_ids: Vec<String> = self
            .sld_ids()
            .into_iter()
            .filter_map(|sld_id| rel_id_attr(sld_id, "id"))
            .collect();

        let pres_part = self.pres_part_mut()?;
        let stale: Vec<String> = pres_part
            .rels()
            .iter()
            .filter(|rel| rel.reltype() == rt::SLIDE)
            .map(|rel| rel.r_id().to_string())
            .chain(r_ids.iter().cloned())
            .collect();
        let mut removed_parts = Vec::new();
        for r_id in stale {
            if let Some(rel) = pres_part.rels_mut().remove(&r_id) {
                if let Ok(target) = rel.target_partname() {
                    removed_parts.push(target);
                }
            }
        }
        for partname in &removed_parts {
            self.opc.remove_part(partname);
        }

        let root = self.pres.root_mut();
        if let Some(lst) = root.child_mut("sldIdLst") {
            lst.children_mut().clear();
        }
        root.remove_elements("custShowLst");
        if let Some(ext_lst) = root.child_mut("extLst") {
            ext_lst
                .children_mut()
                .retain(|node| match node {
                    XmlNode::Element(ext) => ext.descendants("sectionLst").is_empty(),
                    _ => true,
                });
        }
        self.sync_presentation()?;

        tracing::debug!(slides = r_ids.len(), "removed all slides");
        Ok(r_ids.len())
    }

    /// Append a slide on `layout` whose shape tree is empty.
    ///
    /// `namespaces` are root attributes (`xmlns:*`, `mc:Ignorable`) to declare
    /// on the new slide, typically taken from the slide whose shapes will be
    /// cloned into it.
    pub fn add_blank_slide(
        &mut self,
        layout: &PackURI,
        namespaces: &[(String, String)],
    ) -> Result<Slide> {
        if !self.opc.contains_part(layout) {
            return Err(OoxmlError::PartNotFound(layout.to_string()));
        }
        let partname = self.opc.next_partname("/ppt/slides/slide%d.xml")?;

        let mut root = XmlElement::new("p:sld");
        for (key, value) in namespaces {
            root.set_attr(key, value);
        }
        for (key, uri) in [
            ("xmlns:a", ns::DML_MAIN),
            ("xmlns:r", ns::OFC_RELATIONSHIPS),
            ("xmlns:p", ns::PML_MAIN),
        ] {
            if root.raw_attr(key).is_none() {
                root.set_attr(key, uri);
            }
        }
        root.push(XmlElement::parse_fragment(&format!(
            "<p:cSld><p:spTree>{}</p:spTree></p:cSld>",
            template::SP_TREE_HEAD
        ))?);
        root.push(
            XmlElement::new("p:clrMapOvr").with_child(XmlElement::new("a:masterClrMapping")),
        );
        let doc = XmlDocument::new(root);

        let mut rels = Relationships::new(partname.base_uri().to_string());
        rels.get_or_add(rt::SLIDE_LAYOUT, layout);

        let mut part = XmlPart::new(partname.clone(), ct::PML_SLIDE.to_string(), doc.to_bytes());
        *part.rels_mut() = rels.clone();
        self.opc.add_part(Box::new(part));

        let r_id = self.pres_part_mut()?.relate_to(&partname, rt::SLIDE);
        self.append_sld_id(&r_id)?;

        Ok(Slide::new(
            partname,
            Some(layout.clone()),
            doc,
            rels,
            self.inherited_geometry(Some(layout)),
        ))
    }

    fn append_sld_id(&mut self, r_id: &str) -> Result<()> {
        let next_id = self
            .sld_ids()
            .iter()
            .filter_map(|el| el.attr("id")?.parse::<u32>().ok())
            .max()
            .map_or(MIN_SLIDE_ID, |max| (max + 1).max(MIN_SLIDE_ID));

        let root = self.pres.root_mut();
        if root.position("sldIdLst").is_none() {
            let pos = AFTER_SLD_ID_LST
                .iter()
                .filter_map(|local| root.position(local))
                .min();
            let lst = XmlElement::new("p:sldIdLst");
            match pos {
                Some(pos) => root.insert(pos, lst),
                None => root.push(lst),
            }
        }
        if let Some(lst) = root.child_mut("sldIdLst") {
            lst.push(
                XmlElement::new("p:sldId")
                    .with_attr("id", &next_id.to_string())
                    .with_attr("r:id", r_id),
            );
        }
        self.sync_presentation()
    }

    /// Append a slide on `layout` carrying empty copies of the layout's
    /// placeholders (date, footer and slide number excepted).
    pub fn add_slide(&mut self, layout: &PackURI) -> Result<Slide> {
        let layout_doc = XmlDocument::parse(self.opc.get_part(layout)?.blob())?;
        let mut slide = self.add_blank_slide(layout, &[])?;

        let placeholders: Vec<(String, XmlElement)> = layout_doc
            .root()
            .find(&["cSld", "spTree"])
            .map(|tree| {
                tree.elements()
                    .filter(|el| el.local_name() == "sp")
                    .filter_map(|el| {
                        let ph_el = el.find(&["nvSpPr", "nvPr", "ph"])?;
                        let ph = Placeholder::of(el)?;
                        if NON_CLONEABLE_PLACEHOLDERS.contains(&ph.layout_key()) {
                            return None;
                        }
                        let name = crate::ooxml::pptx::shapes::base::c_nv_pr(el)
                            .and_then(|c| c.attr("name"))
                            .unwrap_or_default();
                        Some((name, ph_el.clone()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        for (name, ph) in placeholders {
            let id = slide.next_shape_id();
            let mut c_nv_pr = XmlElement::new("p:cNvPr").with_attr("id", &id.to_string());
            c_nv_pr.set_attr("name", &name);
            let sp = XmlElement::new("p:sp")
                .with_child(
                    XmlElement::new("p:nvSpPr")
                        .with_child(c_nv_pr)
                        .with_child(
                            XmlElement::new("p:cNvSpPr")
                                .with_child(XmlElement::new("a:spLocks").with_attr("noGrp", "1")),
                        )
                        .with_child(XmlElement::new("p:nvPr").with_child(ph)),
                )
                .with_child(XmlElement::new("p:spPr"))
                .with_child(
                    XmlElement::new("p:txBody")
                        .with_child(XmlElement::new("a:bodyPr"))
                        .with_child(XmlElement::new("a:lstStyle"))
                        .with_child(XmlElement::new("a:p")),
                );
            slide.append_shape(sp)?;
        }
        self.commit_slide(&slide)?;
        Ok(slide)
    }

    /// Store an edited slide's XML and relationships back into the package.
    pub fn commit_slide(&mut self, slide: &Slide) -> Result<()> {
        let part = self.opc.get_part_mut(slide.partname())?;
        part.set_blob(slide.to_xml_bytes());
        *part.rels_mut() = slide.rels().clone();
        Ok(())
    }

    /// Bytes of the image a slide relates to as `r_id`.
    pub fn image_blob(&self, slide: &Slide, r_id: &str) -> Result<&[u8]> {
        let rel = slide.rels().get(r_id).ok_or_else(|| {
            OoxmlError::InvalidRelationship(format!("{} has no relationship {}", slide.partname(), r_id))
        })?;
        if rel.is_external() {
            return Err(OoxmlError::InvalidRelationship(format!(
                "{} links an external image",
                r_id
            )));
        }
        Ok(self.opc.get_part(&rel.target_partname()?)?.blob())
    }

    /// Add an image part (or reuse an identical one) and relate `slide` to it.
    /// Returns the slide's rId for the image.
    pub fn add_image(&mut self, slide: &mut Slide, blob: &[u8]) -> Result<String> {
        let format = ImageFormat::detect_from_bytes(blob)
            .ok_or_else(|| OoxmlError::InvalidFormat("unrecognized image data".to_string()))?;
        let digest = Sha256::digest(blob).to_vec();

        let partname = match self.image_digests.get(&digest) {
            Some(existing) if self.opc.contains_part(existing) => existing.clone(),
            _ => {
                let partname = self
                    .opc
                    .next_partname(&format!("/ppt/media/image%d.{}", format.extension()))?;
                self.opc.add_part(Box::new(BlobPart::new(
                    partname.clone(),
                    format.content_type().to_string(),
                    blob.to_vec(),
                )));
                self.image_digests.insert(digest, partname.clone());
                partname
            },
        };
        Ok(slide.rels_mut().get_or_add(rt::IMAGE, &partname))
    }

    /// Add a picture of `blob` on top of `slide`, stretched over `geometry`.
    pub fn add_picture(&mut self, slide: &mut Slide, blob: &[u8], geometry: Geometry) -> Result<()> {
        let r_id = self.add_image(slide, blob)?;
        let id = slide.next_shape_id();
        let pic = picture::build_picture(id, &format!("Picture {}", id - 1), &r_id, geometry)?;
        slide.append_shape(pic)
    }

    /// Re-create on `dst_slide` every relationship that `element` (cloned from
    /// `src_slide` of `source`) refers to, rewriting the ids in place.
    ///
    /// Ids are kept when free on the destination. Parts missing from this
    /// package are copied from `source` with everything they relate to.
    /// Links to other slides cannot survive and are blanked. Returns the
    /// number of relationships carried over.
    pub fn import_relationships(
        &mut self,
        source: &Package,
        src_slide: &Slide,
        dst_slide: &mut Slide,
        element: &mut XmlElement,
    ) -> Result<usize> {
        let prefix = relationship_prefix(src_slide);
        let is_rel_attr = |key: &str| {
            key.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with(':'))
        };

        let mut old_ids = Vec::new();
        collect_rel_ids(element, &is_rel_attr, &mut old_ids);
        old_ids.sort();
        old_ids.dedup();

        let mut mapping = HashMap::with_capacity(old_ids.len());
        for old in old_ids {
            let new = self.import_relationship(source, src_slide, dst_slide, &old)?;
            mapping.insert(old, new);
        }

        element.visit_mut(&mut |el| {
            let keys: Vec<String> = el
                .attributes()
                .filter(|(key, _)| is_rel_attr(*key))
                .map(|(key, _)| key.to_string())
                .collect();
            for key in keys {
                if let Some(new) = el.attr(&key).and_then(|old| mapping.get(&old)) {
                    el.set_attr(&key, new);
                }
            }
        });
        Ok(mapping.len())
    }

    fn import_relationship(
        &mut self,
        source: &Package,
        src_slide: &Slide,
        dst_slide: &mut Slide,
        r_id: &str,
    ) -> Result<String> {
        let rel = src_slide.rels().get(r_id).ok_or_else(|| {
            OoxmlError::InvalidRelationship(format!(
                "{} has no relationship {}",
                src_slide.partname(),
                r_id
            ))
        })?;
        if rel.is_external() {
            return Ok(dst_slide
                .rels_mut()
                .get_or_add_ext_rel(rel.reltype(), rel.target_ref()));
        }

        let target = rel.target_partname()?;
        if rel.reltype() == rt::SLIDE {
            tracing::debug!(r_id, target = %target, "dropping link to another slide");
            return Ok(String::new());
        }
        if !self.opc.contains_part(&target) {
            self.copy_part_tree(&source.opc, &target)?;
        }

        let keeps_id = match dst_slide.rels().get(r_id) {
            None => {
                let target_ref = target.relative_ref(dst_slide.rels().base_uri());
                dst_slide.rels_mut().add_relationship(
                    rel.reltype().to_string(),
                    target_ref,
                    r_id.to_string(),
                    false,
                );
                true
            },
            Some(existing) => {
                !existing.is_external()
                    && existing.reltype() == rel.reltype()
                    && existing.target_partname().ok().as_ref() == Some(&target)
            },
        };
        if keeps_id {
            Ok(r_id.to_string())
        } else {
            Ok(dst_slide.rels_mut().get_or_add(rel.reltype(), &target))
        }
    }

    /// Copy `partname` and the internal parts it reaches from `source`,
    /// skipping parts this package already has.
    fn copy_part_tree(&mut self, source: &OpcPackage, partname: &PackURI) -> Result<()> {
        let mut stack = vec![partname.clone()];
        while let Some(name) = stack.pop() {
            if self.opc.contains_part(&name) {
                continue;
            }
            let part = source.get_part(&name)?;
            let mut copy = PartFactory::load(
                name.clone(),
                part.content_type().to_string(),
                part.blob().to_vec(),
            )?;
            *copy.rels_mut() = part.rels().clone();
            for rel in part.rels().iter() {
                if rel.is_external() || rel.reltype() == rt::SLIDE {
                    continue;
                }
                if let Ok(target) = rel.target_partname() {
                    if !self.opc.contains_part(&target) {
                        stack.push(target);
                    }
                }
            }
            if ImageFormat::from_content_type(part.content_type()).is_some() {
                self.image_digests
                    .insert(Sha256::digest(part.blob()).to_vec(), name.clone());
            }
            tracing::debug!(part = %name, "copied part from source package");
            self.opc.add_part(copy);
        }
        Ok(())
    }

    /// Save to a file, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        Ok(self.opc.save(path)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.opc.to_bytes()?)
    }
}

/// Value of the relationship-namespace attribute with this local name.
fn rel_id_attr(el: &XmlElement, local: &str) -> Option<String> {
    el.attributes()
        .find(|(key, _)| key.contains(':') && local_name_of(key) == local && !key.starts_with("xmlns"))
        .and_then(|(key, _)| el.attr(key))
}

/// Prefix the slide binds to the relationships namespace, `r` by default.
fn relationship_prefix(slide: &Slide) -> String {
    slide
        .namespace_decls()
        .into_iter()
        .find(|(_, uri)| uri == ns::OFC_RELATIONSHIPS)
        .and_then(|(key, _)| key.strip_prefix("xmlns:").map(str::to_string))
        .unwrap_or_else(|| "r".to_string())
}

fn collect_rel_ids(el: &XmlElement, is_rel_attr: &dyn Fn(&str) -> bool, out: &mut Vec<String>) {
    for (key, _) in el.attributes() {
        if is_rel_attr(key) {
            if let Some(value) = el.attr(key).filter(|v| !v.is_empty()) {
                out.push(value);
            }
        }
    }
    for child in el.elements() {
        collect_rel_ids(child, is_rel_attr, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::shapes::textframe;
    use crate::ooxml::pptx::template::{LAYOUT_TITLE_AND_CONTENT, LAYOUT_TITLE_SLIDE};

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_new_package_layouts() {
        let pkg = Package::new().unwrap();
        assert_eq!(pkg.slide_count(), 0);
        assert_eq!(pkg.layout_count().unwrap(), 3);
        let layout = pkg.layout_by_name(LAYOUT_TITLE_SLIDE).unwrap().unwrap();
        assert_eq!(pkg.layout_name(&layout).unwrap(), LAYOUT_TITLE_SLIDE);
        assert!(pkg.layout_by_name("Comparison").unwrap().is_none());
    }

    #[test]
    fn test_add_slide_with_placeholders() {
        let mut pkg = Package::new().unwrap();
        let layout = pkg.layout_by_name(LAYOUT_TITLE_AND_CONTENT).unwrap().unwrap();
        let mut slide = pkg.add_slide(&layout).unwrap();
        assert_eq!(slide.shapes().len(), 2);

        let index = slide.title_shape().unwrap().index();
        textframe::set_text(slide.shape_mut(index).unwrap(), "Agenda");
        pkg.commit_slide(&slide).unwrap();

        let reopened = Package::from_bytes(pkg.to_bytes().unwrap()).unwrap();
        assert_eq!(reopened.slide_count(), 1);
        let slide = reopened.slide(0).unwrap();
        let title = slide.title_shape().unwrap();
        assert_eq!(title.text(), "Agenda");
        // Geometry comes from the master title placeholder
        assert_eq!(title.top(), 365_125);
        assert_eq!(slide.layout_partname(), Some(&layout));
        assert!(matches!(
            reopened.slide(1),
            Err(OoxmlError::SlideOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn test_remove_all_slides() {
        let mut pkg = Package::new().unwrap();
        let layout = pkg.layout_by_name(LAYOUT_TITLE_SLIDE).unwrap().unwrap();
        pkg.add_slide(&layout).unwrap();
        pkg.add_slide(&layout).unwrap();
        assert_eq!(pkg.slide_count(), 2);

        assert_eq!(pkg.remove_all_slides().unwrap(), 2);
        assert_eq!(pkg.slide_count(), 0);
        assert!(pkg.slide_partnames().unwrap().is_empty());

        // Partnames and slide ids are reused after removal
        let slide = pkg.add_slide(&layout).unwrap();
        assert_eq!(slide.partname().as_str(), "/ppt/slides/slide1.xml");
        let reopened = Package::from_bytes(pkg.to_bytes().unwrap()).unwrap();
        assert_eq!(reopened.slide_count(), 1);
        assert_eq!(reopened.sld_ids()[0].attr("id").as_deref(), Some("256"));
    }

    #[test]
    fn test_images_are_deduplicated() {
        let mut pkg = Package::new().unwrap();
        let layout = pkg.layout_by_name(LAYOUT_TITLE_SLIDE).unwrap().unwrap();
        let mut first = pkg.add_blank_slide(&layout, &[]).unwrap();
        let mut second = pkg.add_blank_slide(&layout, &[]).unwrap();

        pkg.add_picture(&mut first, PNG, Geometry::new(0, 0, 10, 10)).unwrap();
        pkg.add_picture(&mut second, PNG, Geometry::new(5, 5, 10, 10)).unwrap();
        pkg.commit_slide(&first).unwrap();
        pkg.commit_slide(&second).unwrap();

        let media: Vec<_> = pkg
            .opc_package()
            .iter_parts()
            .filter(|p| p.partname().as_str().starts_with("/ppt/media/"))
            .collect();
        assert_eq!(media.len(), 1);

        let pic = second.shapes().into_iter().find(|s| s.is_picture()).unwrap();
        let r_id = picture::image_r_id(pic.element()).unwrap();
        assert_eq!(pkg.image_blob(&second, &r_id).unwrap(), PNG);
        assert!(pkg.add_image(&mut first, b"not an image").is_err());
    }

    #[test]
    fn test_import_relationships() {
        let mut source = Package::new().unwrap();
        let layout = source.layout_by_name(LAYOUT_TITLE_SLIDE).unwrap().unwrap();
        let mut src_slide = source.add_blank_slide(&layout, &[]).unwrap();
        source
            .add_picture(&mut src_slide, PNG, Geometry::new(0, 0, 1, 1))
            .unwrap();
        let link = src_slide
            .rels_mut()
            .get_or_add_ext_rel(rt::HYPERLINK, "https://example.com/");
        source.commit_slide(&src_slide).unwrap();

        let mut pic = src_slide
            .shapes()
            .into_iter()
            .find(|s| s.is_picture())
            .unwrap()
            .element()
            .clone();
        let old_embed = picture::image_r_id(&pic).unwrap();
        pic.find_mut(&["nvPicPr", "cNvPr"])
            .unwrap()
            .push(XmlElement::new("a:hlinkClick").with_attr("r:id", &link));

        // Destination has no media yet, so the image part is copied over
        let mut dest = Package::new().unwrap();
        let mut dst_slide = dest.add_blank_slide(&layout, &src_slide.namespace_decls()).unwrap();
        let carried = dest
            .import_relationships(&source, &src_slide, &mut dst_slide, &mut pic)
            .unwrap();
        assert_eq!(carried, 2);

        let embed = picture::image_r_id(&pic).unwrap();
        assert_eq!(embed, old_embed);
        assert_eq!(dest.image_blob(&dst_slide, &embed).unwrap(), PNG);
        let hlink = pic.find(&["nvPicPr", "cNvPr", "hlinkClick"]).unwrap();
        let rel = dst_slide.rels().get(&hlink.attr("r:id").unwrap()).unwrap();
        assert!(rel.is_external());
        assert_eq!(rel.target_ref(), "https://example.com/");
    }
}
