/// Slides: an owned, editable copy of one slide part.
use crate::common::xml::{XmlDocument, XmlElement, XmlNode};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;
use crate::ooxml::pptx::shapes::base::{Geometry, Placeholder, Shape, ShapeType, c_nv_pr};
use std::collections::HashMap;

/// Placeholder geometry a slide inherits from its layout and master.
#[derive(Debug, Clone, Default)]
pub struct InheritedGeometry {
    layout_by_idx: HashMap<u32, Geometry>,
    layout_by_type: HashMap<String, Geometry>,
    master_by_type: HashMap<String, Geometry>,
}

impl InheritedGeometry {
    /// Collect placeholder geometry from a layout tree and its master tree.
    pub fn from_trees(layout: Option<&XmlElement>, master: Option<&XmlElement>) -> Self {
        let mut inherited = Self::default();
        if let Some(master) = master {
            for (ph, geometry) in placeholder_geometry(master) {
                if let Some(geometry) = geometry {
                    inherited
                        .master_by_type
                        .entry(ph.master_key().to_string())
                        .or_insert(geometry);
                }
            }
        }
        if let Some(layout) = layout {
            for (ph, geometry) in placeholder_geometry(layout) {
                let geometry = geometry.or_else(|| inherited.from_master(&ph));
                if let Some(geometry) = geometry {
                    inherited.layout_by_idx.entry(ph.idx).or_insert(geometry);
                    inherited
                        .layout_by_type
                        .entry(ph.layout_key().to_string())
                        .or_insert(geometry);
                }
            }
        }
        inherited
    }

    fn from_master(&self, ph: &Placeholder) -> Option<Geometry> {
        self.master_by_type.get(ph.master_key()).copied()
    }

    /// Geometry for a placeholder that carries none itself.
    pub fn resolve(&self, ph: &Placeholder) -> Option<Geometry> {
        self.layout_by_idx
            .get(&ph.idx)
            .or_else(|| self.layout_by_type.get(ph.layout_key()))
            .copied()
            .or_else(|| self.from_master(ph))
    }
}

/// Placeholders of a slide, layout or master root with their own geometry.
fn placeholder_geometry(root: &XmlElement) -> Vec<(Placeholder, Option<Geometry>)> {
    let Some(tree) = root.find(&["cSld", "spTree"]) else {
        return Vec::new();
    };
    tree.elements()
        .filter_map(|el| Some((Placeholder::of(el)?, Geometry::of(el))))
        .collect()
}

/// A slide loaded from a package.
///
/// The slide owns its XML tree and relationships; edits stay local until the
/// slide is committed back with [`Package::commit_slide`](crate::ooxml::pptx::Package::commit_slide).
#[derive(Debug, Clone)]
pub struct Slide {
    partname: PackURI,
    layout_partname: Option<PackURI>,
    doc: XmlDocument,
    rels: Relationships,
    inherited: InheritedGeometry,
}

impl Slide {
    pub(crate) fn new(
        partname: PackURI,
        layout_partname: Option<PackURI>,
        doc: XmlDocument,
        rels: Relationships,
        inherited: InheritedGeometry,
    ) -> Self {
        Self {
            partname,
            layout_partname,
            doc,
            rels,
            inherited,
        }
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Partname of the slide layout this slide is built on.
    #[inline]
    pub fn layout_partname(&self) -> Option<&PackURI> {
        self.layout_partname.as_ref()
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    #[inline]
    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// The `p:sld` root element.
    #[inline]
    pub fn root(&self) -> &XmlElement {
        self.doc.root()
    }

    #[inline]
    pub fn root_mut(&mut self) -> &mut XmlElement {
        self.doc.root_mut()
    }

    /// `xmlns` declarations and `mc:Ignorable` on the root, unescaped.
    pub fn namespace_decls(&self) -> Vec<(String, String)> {
        let root = self.doc.root();
        root.attributes()
            .filter(|(key, _)| key.starts_with("xmlns") || *key == "mc:Ignorable")
            .filter_map(|(key, _)| Some((key.to_string(), root.attr(key)?)))
            .collect()
    }

    /// The `p:cSld/p:spTree` element.
    pub fn sp_tree(&self) -> Result<&XmlElement> {
        self.doc
            .root()
            .find(&["cSld", "spTree"])
            .ok_or_else(|| OoxmlError::InvalidFormat(format!("{} has no shape tree", self.partname)))
    }

    pub fn sp_tree_mut(&mut self) -> Result<&mut XmlElement> {
        let partname = &self.partname;
        self.doc
            .root_mut()
            .find_mut(&["cSld", "spTree"])
            .ok_or_else(|| OoxmlError::InvalidFormat(format!("{} has no shape tree", partname)))
    }

    /// Shapes of the shape tree in document (z) order.
    pub fn shapes(&self) -> Vec<Shape<'_>> {
        let Ok(tree) = self.sp_tree() else {
            return Vec::new();
        };
        tree.children()
            .iter()
            .enumerate()
            .filter_map(|(index, node)| match node {
                XmlNode::Element(el) => {
                    let shape_type = ShapeType::of(el)?;
                    let placeholder = Placeholder::of(el);
                    let geometry = Geometry::of(el)
                        .or_else(|| placeholder.as_ref().and_then(|ph| self.inherited.resolve(ph)))
                        .unwrap_or_default();
                    Some(Shape::new(index, el, shape_type, placeholder, geometry))
                },
                _ => None,
            })
            .collect()
    }

    /// The first title or centered-title placeholder.
    pub fn title_shape(&self) -> Option<Shape<'_>> {
        self.shapes()
            .into_iter()
            .find(|shape| shape.role().is_some_and(|role| role.is_title()))
    }

    /// Mutable shape-tree child at `index` (see [`Shape::index`]).
    pub fn shape_mut(&mut self, index: usize) -> Option<&mut XmlElement> {
        match self.sp_tree_mut().ok()?.children_mut().get_mut(index)? {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Append a shape on top of the z-order.
    pub fn append_shape(&mut self, shape: XmlElement) -> Result<()> {
        self.sp_tree_mut()?.insert_before(shape, "extLst");
        Ok(())
    }

    /// Remove shape-tree children by index. Indexes that no longer name a
    /// shape are ignored. Returns how many shapes were removed.
    pub fn remove_shapes(&mut self, indexes: &[usize]) -> usize {
        let Ok(tree) = self.sp_tree_mut() else {
            return 0;
        };
        let mut indexes = indexes.to_vec();
        indexes.sort_unstable();
        indexes.dedup();

        let mut removed = 0;
        for index in indexes.into_iter().rev() {
            let is_shape = matches!(
                tree.children().get(index),
                Some(XmlNode::Element(el)) if ShapeType::of(el).is_some()
            );
            if is_shape && tree.remove_child(index).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// One more than the largest shape id used anywhere on the slide.
    pub fn next_shape_id(&self) -> u32 {
        let root = self.doc.root();
        root.descendants("cNvPr")
            .iter()
            .filter_map(|el| el.attr("id")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Names of all shapes, for diagnostics.
    pub fn shape_names(&self) -> Vec<String> {
        self.shapes()
            .iter()
            .map(|shape| {
                c_nv_pr(shape.element())
                    .and_then(|el| el.attr("name"))
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Serialized slide part content.
    pub fn to_xml_bytes(&self) -> Vec<u8> {
        self.doc.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::shapes::PlaceholderRole;

    const LAYOUT: &str = r#"<p:sldLayout xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
        <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
          <p:spPr><a:xfrm><a:off x="100" y="200"/><a:ext cx="300" cy="400"/></a:xfrm></p:spPr></p:sp>
        <p:sp><p:nvSpPr><p:cNvPr id="3" name="Body"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
    </p:spTree></p:cSld></p:sldLayout>"#;

    const MASTER: &str = r#"<p:sldMaster xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
        <p:sp><p:nvSpPr><p:cNvPr id="3" name="Body"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr>
          <p:spPr><a:xfrm><a:off x="5" y="6"/><a:ext cx="7" cy="8"/></a:xfrm></p:spPr></p:sp>
    </p:spTree></p:cSld></p:sldMaster>"#;

    const SLIDE: &str = r#"<p:sld xmlns:a="a" xmlns:p="p" xmlns:r="r"><p:cSld><p:spTree>
        <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>
        <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/>
          <p:txBody><a:bodyPr/><a:p><a:r><a:t>Deck title</a:t></a:r></a:p></p:txBody></p:sp>
        <p:sp><p:nvSpPr><p:cNvPr id="3" name="Content 2"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
        <p:pic><p:nvPicPr><p:cNvPr id="9" name="Picture 8"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>
          <p:blipFill><a:blip r:embed="rId2"/></p:blipFill><p:spPr><a:xfrm><a:off x="1" y="1"/><a:ext cx="2" cy="2"/></a:xfrm></p:spPr></p:pic>
        <p:extLst/>
    </p:spTree></p:cSld></p:sld>"#;

    fn slide() -> Slide {
        let layout = XmlDocument::parse(LAYOUT.as_bytes()).unwrap();
        let master = XmlDocument::parse(MASTER.as_bytes()).unwrap();
        Slide::new(
            PackURI::new("/ppt/slides/slide1.xml").unwrap(),
            None,
            XmlDocument::parse(SLIDE.as_bytes()).unwrap(),
            Relationships::new("/ppt/slides".to_string()),
            InheritedGeometry::from_trees(Some(layout.root()), Some(master.root())),
        )
    }

    #[test]
    fn test_shapes_inherit_geometry() {
        let slide = slide();
        let shapes = slide.shapes();
        assert_eq!(shapes.len(), 3);

        assert_eq!(shapes[0].role(), Some(PlaceholderRole::Title));
        assert_eq!(shapes[0].geometry(), Geometry::new(100, 200, 300, 400));
        // Layout body has no xfrm, so it comes from the master body
        assert_eq!(shapes[1].geometry(), Geometry::new(5, 6, 7, 8));
        assert!(shapes[2].is_picture());
        assert_eq!(shapes[2].geometry(), Geometry::new(1, 1, 2, 2));
    }

    #[test]
    fn test_title_and_ids() {
        let slide = slide();
        assert_eq!(slide.title_shape().unwrap().text(), "Deck title");
        assert_eq!(slide.next_shape_id(), 10);
        assert_eq!(slide.shape_names(), ["Title 1", "Content 2", "Picture 8"]);
        assert_eq!(slide.namespace_decls().len(), 3);
    }

    #[test]
    fn test_remove_and_append_shapes() {
        let mut slide = slide();
        let indexes: Vec<usize> = slide.shapes().iter().take(2).map(|s| s.index()).collect();
        // A stale index pointing at the group properties is ignored
        let mut with_stale = indexes.clone();
        with_stale.push(1);
        assert_eq!(slide.remove_shapes(&with_stale), 2);
        assert_eq!(slide.shapes().len(), 1);

        let extra = XmlElement::parse_fragment(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="10" name="Added"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr></p:sp>"#,
        )
        .unwrap();
        slide.append_shape(extra).unwrap();
        let tree = slide.sp_tree().unwrap();
        assert_eq!(tree.elements().last().unwrap().local_name(), "extLst");
        assert_eq!(slide.shape_names(), ["Picture 8", "Added"]);
    }
}
