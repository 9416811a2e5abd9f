/// Base shape types for PowerPoint presentations.
use crate::common::xml::XmlElement;
use crate::ooxml::pptx::shapes::{picture, textframe};

/// Shape type enumeration.
///
/// Indicates what kind of shape this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    /// An auto shape or text box (p:sp)
    Shape,
    /// A picture shape (p:pic)
    Picture,
    /// A graphic frame containing a table or chart (p:graphicFrame)
    GraphicFrame,
    /// A group shape (p:grpSp)
    GroupShape,
    /// A connector shape (p:cxnSp)
    Connector,
    /// Content part or anything else found in a shape tree
    Unknown,
}

impl ShapeType {
    /// Shape type of a shape-tree child, `None` for the tree's own properties.
    pub fn of(element: &XmlElement) -> Option<Self> {
        match element.local_name() {
            "sp" => Some(Self::Shape),
            "pic" => Some(Self::Picture),
            "graphicFrame" => Some(Self::GraphicFrame),
            "grpSp" => Some(Self::GroupShape),
            "cxnSp" => Some(Self::Connector),
            "contentPart" | "AlternateContent" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Semantic role of a placeholder, from `p:ph/@type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderRole {
    Title,
    CenterTitle,
    Body,
    /// `obj`, also the role of a placeholder with no type
    Object,
    Subtitle,
    Picture,
    /// Date, footer, slide number, chart, table and the rest
    Other,
}

impl PlaceholderRole {
    pub fn from_type_attr(value: Option<&str>) -> Self {
        match value {
            None | Some("obj") => Self::Object,
            Some("title") => Self::Title,
            Some("ctrTitle") => Self::CenterTitle,
            Some("body") => Self::Body,
            Some("subTitle") => Self::Subtitle,
            Some("pic") => Self::Picture,
            Some(_) => Self::Other,
        }
    }

    #[inline]
    pub fn is_title(&self) -> bool {
        matches!(self, Self::Title | Self::CenterTitle)
    }
}

/// A `p:ph` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub role: PlaceholderRole,
    /// Raw `type` attribute, `None` when absent
    pub kind: Option<String>,
    /// `idx` attribute, 0 when absent
    pub idx: u32,
}

impl Placeholder {
    /// Placeholder description of a shape, `None` when it is not a placeholder.
    pub fn of(shape: &XmlElement) -> Option<Self> {
        let ph = non_visual_props(shape)?.find(&["nvPr", "ph"])?;
        let kind = ph.attr("type");
        Some(Self {
            role: PlaceholderRole::from_type_attr(kind.as_deref()),
            idx: ph
                .attr("idx")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            kind,
        })
    }

    /// Type key used when matching against master placeholders.
    pub fn master_key(&self) -> &str {
        match self.kind.as_deref() {
            Some("title") | Some("ctrTitle") => "title",
            None | Some("obj") | Some("body") | Some("subTitle") => "body",
            Some(other) => other,
        }
    }

    /// Type key used when matching against layout placeholders.
    pub fn layout_key(&self) -> &str {
        self.kind.as_deref().unwrap_or("obj")
    }
}

/// Position and size in EMU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Geometry {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Geometry {
    pub fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Geometry from an `a:xfrm` or `p:xfrm` element.
    pub fn from_xfrm(xfrm: &XmlElement) -> Option<Self> {
        let off = xfrm.child("off");
        let ext = xfrm.child("ext");
        if off.is_none() && ext.is_none() {
            return None;
        }
        let coord = |el: Option<&XmlElement>, key: &str| {
            el.and_then(|e| e.attr(key))
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(0)
        };
        Some(Self {
            left: coord(off, "x"),
            top: coord(off, "y"),
            width: coord(ext, "cx"),
            height: coord(ext, "cy"),
        })
    }

    /// Geometry written on the shape itself, if any.
    pub fn of(shape: &XmlElement) -> Option<Self> {
        let xfrm = match shape.local_name() {
            "graphicFrame" => shape.child("xfrm"),
            "grpSp" => shape.find(&["grpSpPr", "xfrm"]),
            _ => shape.find(&["spPr", "xfrm"]),
        };
        xfrm.and_then(Self::from_xfrm)
    }
}

/// The `p:nvSpPr`, `p:nvPicPr` (etc.) child of a shape.
pub fn non_visual_props(shape: &XmlElement) -> Option<&XmlElement> {
    shape.elements().find(|el| {
        let local = el.local_name();
        local.starts_with("nv") && local.ends_with("Pr")
    })
}

/// `cNvPr` of a shape, holding its id and name.
pub fn c_nv_pr(shape: &XmlElement) -> Option<&XmlElement> {
    non_visual_props(shape)?.child("cNvPr")
}

/// A read-only view of one shape-tree child.
///
/// Geometry is the effective one: a placeholder without its own `a:xfrm`
/// reports the geometry it inherits from its layout or master.
#[derive(Debug, Clone)]
pub struct Shape<'a> {
    index: usize,
    element: &'a XmlElement,
    shape_type: ShapeType,
    placeholder: Option<Placeholder>,
    geometry: Geometry,
}

impl<'a> Shape<'a> {
    pub(crate) fn new(
        index: usize,
        element: &'a XmlElement,
        shape_type: ShapeType,
        placeholder: Option<Placeholder>,
        geometry: Geometry,
    ) -> Self {
        Self {
            index,
            element,
            shape_type,
            placeholder,
            geometry,
        }
    }

    /// Position among the shape tree's child nodes.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn element(&self) -> &'a XmlElement {
        self.element
    }

    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    #[inline]
    pub fn placeholder(&self) -> Option<&Placeholder> {
        self.placeholder.as_ref()
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    pub fn role(&self) -> Option<PlaceholderRole> {
        self.placeholder.as_ref().map(|ph| ph.role)
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    pub fn left(&self) -> i64 {
        self.geometry.left
    }

    #[inline]
    pub fn top(&self) -> i64 {
        self.geometry.top
    }

    /// `cNvPr/@name`, empty when missing.
    pub fn name(&self) -> String {
        c_nv_pr(self.element)
            .and_then(|el| el.attr("name"))
            .unwrap_or_default()
    }

    /// `cNvPr/@id`.
    pub fn id(&self) -> Option<u32> {
        c_nv_pr(self.element).and_then(|el| el.attr("id")?.parse().ok())
    }

    /// Whether this shape can hold a text frame. Only auto shapes do.
    #[inline]
    pub fn has_text_frame(&self) -> bool {
        self.shape_type == ShapeType::Shape
    }

    /// Text of the shape's text frame, empty for shapes without one.
    pub fn text(&self) -> String {
        if self.has_text_frame() {
            textframe::text_of(self.element)
        } else {
            String::new()
        }
    }

    /// Whether this is a stand-alone picture, not a placeholder or media frame.
    pub fn is_picture(&self) -> bool {
        self.shape_type == ShapeType::Picture && picture::is_picture(self.element)
    }
}
