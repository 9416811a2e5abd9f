/// Picture (image) shapes.
use crate::common::xml::{XmlElement, XmlError, escape_xml};
use crate::ooxml::pptx::shapes::base::{Geometry, non_visual_props};
use std::fmt::Write as FmtWrite;

/// Media markers that turn a `p:pic` into a video or audio frame.
const MEDIA_ELEMENTS: &[&str] = &[
    "videoFile",
    "audioFile",
    "quickTimeFile",
    "wavAudioFile",
    "audioCd",
    "media",
];

/// Whether a `p:pic` is a plain picture: not a placeholder and not media.
pub fn is_picture(pic: &XmlElement) -> bool {
    if pic.local_name() != "pic" {
        return false;
    }
    let Some(nv_pr) = non_visual_props(pic).and_then(|nv| nv.child("nvPr")) else {
        return true;
    };
    if nv_pr.child("ph").is_some() {
        return false;
    }
    !MEDIA_ELEMENTS
        .iter()
        .any(|local| !nv_pr.descendants(local).is_empty())
}

/// rId of the embedded image (`a:blip/@r:embed`).
pub fn image_r_id(pic: &XmlElement) -> Option<String> {
    pic.find(&["blipFill", "blip"])?
        .attr("r:embed")
        .filter(|r_id| !r_id.is_empty())
}

/// rId of a linked image (`a:blip/@r:link`).
pub fn linked_r_id(pic: &XmlElement) -> Option<String> {
    pic.find(&["blipFill", "blip"])?
        .attr("r:link")
        .filter(|r_id| !r_id.is_empty())
}

/// Build a `p:pic` showing the image related as `r_id`, stretched over `geometry`.
pub fn build_picture(
    shape_id: u32,
    name: &str,
    r_id: &str,
    geometry: Geometry,
) -> Result<XmlElement, XmlError> {
    let mut xml = String::with_capacity(512);
    xml.push_str("<p:pic>");
    xml.push_str("<p:nvPicPr>");
    let _ = write!(
        xml,
        r#"<p:cNvPr id="{}" name="{}" descr=""/>"#,
        shape_id,
        escape_xml(name)
    );
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvPicPr>");

    xml.push_str("<p:blipFill>");
    let _ = write!(xml, r#"<a:blip r:embed="{}"/>"#, escape_xml(r_id));
    xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
    xml.push_str("</p:blipFill>");

    xml.push_str("<p:spPr>");
    xml.push_str("<a:xfrm>");
    let _ = write!(xml, r#"<a:off x="{}" y="{}"/>"#, geometry.left, geometry.top);
    let _ = write!(
        xml,
        r#"<a:ext cx="{}" cy="{}"/>"#,
        geometry.width, geometry.height
    );
    xml.push_str("</a:xfrm>");
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("</p:spPr>");
    xml.push_str("</p:pic>");

    XmlElement::parse_fragment(&xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_picture() {
        let pic = build_picture(7, "Picture <7>", "rId3", Geometry::new(1, 2, 3, 4)).unwrap();
        assert!(is_picture(&pic));
        assert_eq!(image_r_id(&pic).as_deref(), Some("rId3"));
        assert_eq!(Geometry::of(&pic), Some(Geometry::new(1, 2, 3, 4)));
        assert_eq!(
            non_visual_props(&pic).unwrap().child("cNvPr").unwrap().attr("name").as_deref(),
            Some("Picture <7>")
        );
    }

    #[test]
    fn test_placeholder_and_media_are_not_pictures() {
        let ph = XmlElement::parse_fragment(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="4" name="P"/><p:cNvPicPr/><p:nvPr><p:ph type="pic" idx="1"/></p:nvPr></p:nvPicPr></p:pic>"#,
        )
        .unwrap();
        assert!(!is_picture(&ph));

        let video = XmlElement::parse_fragment(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="5" name="V"/><p:cNvPicPr/><p:nvPr><a:videoFile r:link="rId2"/></p:nvPr></p:nvPicPr></p:pic>"#,
        )
        .unwrap();
        assert!(!is_picture(&video));
    }

    #[test]
    fn test_linked_picture() {
        let pic = XmlElement::parse_fragment(
            r#"<p:pic><p:blipFill><a:blip r:link="rId9"/></p:blipFill></p:pic>"#,
        )
        .unwrap();
        assert_eq!(image_r_id(&pic), None);
        assert_eq!(linked_r_id(&pic).as_deref(), Some("rId9"));
    }
}
