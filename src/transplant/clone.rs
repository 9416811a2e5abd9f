//! Copying a template slide's design onto an output slide.
use crate::common::xml::XmlNode;
use crate::ooxml::pptx::{Package, Slide};
use crate::transplant::outcome::{BatchOutcome, ShapeError};

/// Deep-copy every shape of `template_slide` onto `dst`, in z-order.
///
/// Relationships the shapes use (images, charts, hyperlinks) are re-created
/// on `dst`. A shape that cannot be carried over is recorded and skipped.
/// Successes are the copied shape names.
pub fn clone_shapes(
    output: &mut Package,
    template: &Package,
    template_slide: &Slide,
    dst: &mut Slide,
) -> BatchOutcome<String> {
    let mut outcome = BatchOutcome::new();
    for shape in template_slide.shapes() {
        let name = shape.name();
        let mut element = shape.element().clone();
        let result = output
            .import_relationships(template, template_slide, dst, &mut element)
            .and_then(|_| dst.append_shape(element))
            .map(|()| name.clone())
            .map_err(|e| ShapeError::Clone {
                name,
                reason: e.to_string(),
            });
        outcome.push(result);
    }
    outcome
}

/// Copy the template slide's own background, if it has one.
pub fn clone_background(
    output: &mut Package,
    template: &Package,
    template_slide: &Slide,
    dst: &mut Slide,
) -> Result<bool, ShapeError> {
    let Some(mut bg) = template_slide.root().find(&["cSld", "bg"]).cloned() else {
        return Ok(false);
    };
    output
        .import_relationships(template, template_slide, dst, &mut bg)
        .map_err(|e| ShapeError::Clone {
            name: "background".to_string(),
            reason: e.to_string(),
        })?;
    let Some(c_sld) = dst.root_mut().child_mut("cSld") else {
        return Err(ShapeError::Clone {
            name: "background".to_string(),
            reason: "output slide has no p:cSld".to_string(),
        });
    };
    c_sld.remove_elements("bg");
    c_sld.children_mut().insert(0, XmlNode::Element(bg));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::xml::XmlElement;
    use crate::ooxml::pptx::shapes::picture;
    use crate::transplant::fixtures::{self, picture_slide, placeholder, text_box};

    #[test]
    fn test_clone_keeps_order_and_images() {
        let template = fixtures::deck(vec![picture_slide(
            vec![
                text_box(2, "Banner", "ACME", (0, 0, 100, 10), None),
                placeholder(3, "Title 1", r#"type="title""#, Some((0, 20, 100, 10)), "", None),
            ],
            vec![(5, 5, 20, 20)],
        )]);
        let tpl_slide = template.slide(0).unwrap();

        let mut output = fixtures::empty_copy(&template);
        let layout = tpl_slide.layout_partname().unwrap().clone();
        let mut dst = output
            .add_blank_slide(&layout, &tpl_slide.namespace_decls())
            .unwrap();
        let outcome = clone_shapes(&mut output, &template, &tpl_slide, &mut dst);
        assert!(outcome.is_clean());
        assert_eq!(outcome.succeeded().len(), 3);
        assert_eq!(dst.shape_names(), tpl_slide.shape_names());

        let pic = dst.shapes().into_iter().find(|s| s.is_picture()).unwrap();
        let r_id = picture::image_r_id(pic.element()).unwrap();
        assert_eq!(output.image_blob(&dst, &r_id).unwrap(), fixtures::PNG);
    }

    #[test]
    fn test_broken_shape_is_skipped() {
        let broken = XmlElement::parse_fragment(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="7" name="Dangling"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId42"/></p:blipFill><p:spPr/></p:pic>"#,
        )
        .unwrap();
        let template = fixtures::deck(vec![fixtures::slide(vec![
            text_box(2, "Kept", "x", (0, 0, 1, 1), None),
            broken,
        ])]);
        let tpl_slide = template.slide(0).unwrap();
        let mut output = fixtures::empty_copy(&template);
        let layout = tpl_slide.layout_partname().unwrap().clone();
        let mut dst = output.add_blank_slide(&layout, &[]).unwrap();

        let outcome = clone_shapes(&mut output, &template, &tpl_slide, &mut dst);
        assert_eq!(outcome.succeeded(), &["Kept".to_string()]);
        assert_eq!(outcome.failures().len(), 1);
        assert_eq!(dst.shapes().len(), 1);
    }

    #[test]
    fn test_background_is_copied() {
        let template = fixtures::deck(vec![fixtures::slide(vec![])]);
        let mut tpl_slide = template.slide(0).unwrap();
        let bg = XmlElement::parse_fragment(
            r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="112233"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
        )
        .unwrap();
        tpl_slide
            .root_mut()
            .child_mut("cSld")
            .unwrap()
            .children_mut()
            .insert(0, XmlNode::Element(bg));

        let mut output = fixtures::empty_copy(&template);
        let layout = tpl_slide.layout_partname().unwrap().clone();
        let mut dst = output.add_blank_slide(&layout, &[]).unwrap();
        assert!(clone_background(&mut output, &template, &tpl_slide, &mut dst).unwrap());

        let c_sld = dst.root().child("cSld").unwrap();
        assert_eq!(c_sld.elements().next().unwrap().local_name(), "bg");
        assert_eq!(c_sld.descendants("srgbClr")[0].attr("val").as_deref(), Some("112233"));
    }
}
