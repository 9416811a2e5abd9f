//! Positional copy of input pictures.
use crate::ooxml::pptx::{Package, Slide};
use crate::ooxml::pptx::shapes::Geometry;
use crate::transplant::analyzer::SlideInfo;
use crate::transplant::outcome::{BatchOutcome, ShapeError};

/// Add every picture of the input slide to `dst` at its original position.
///
/// Template pictures already on `dst` are left alone. A picture whose image
/// cannot be read or inserted is recorded and skipped.
pub fn copy_pictures(
    output: &mut Package,
    input: &Package,
    src: &Slide,
    info: &SlideInfo,
    dst: &mut Slide,
) -> BatchOutcome<Geometry> {
    info.pictures
        .iter()
        .map(|pic| -> Result<Geometry, ShapeError> {
            let fail = |reason: String| ShapeError::Image {
                name: pic.name.clone(),
                reason,
            };
            let r_id = pic
                .r_id
                .as_deref()
                .ok_or_else(|| fail("no embedded image".to_string()))?;
            let blob = input
                .image_blob(src, r_id)
                .map_err(|e| fail(e.to_string()))?;
            output
                .add_picture(dst, blob, pic.geometry)
                .map_err(|e| fail(e.to_string()))?;
            Ok(pic.geometry)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transplant::analyzer::analyze;
    use crate::transplant::fixtures::{self, picture_slide};

    #[test]
    fn test_pictures_keep_their_box() {
        let input = fixtures::deck(vec![picture_slide(vec![], vec![(1, 2, 3, 4), (5, 6, 7, 8)])]);
        let src = input.slide(0).unwrap();
        let info = analyze(&src, 0, 1, String::new());

        let mut output = fixtures::empty_copy(&input);
        let layout = src.layout_partname().unwrap().clone();
        let mut dst = output.add_blank_slide(&layout, &[]).unwrap();

        let outcome = copy_pictures(&mut output, &input, &src, &info, &mut dst);
        assert!(outcome.is_clean());
        let boxes: Vec<_> = dst
            .shapes()
            .iter()
            .filter(|s| s.is_picture())
            .map(|s| s.geometry())
            .collect();
        assert_eq!(boxes, vec![Geometry::new(1, 2, 3, 4), Geometry::new(5, 6, 7, 8)]);
    }

    #[test]
    fn test_unreadable_picture_is_recorded() {
        let input = fixtures::deck(vec![picture_slide(vec![], vec![(1, 2, 3, 4), (5, 6, 7, 8)])]);
        let src = input.slide(0).unwrap();
        let mut info = analyze(&src, 0, 1, String::new());
        info.pictures[0].r_id = Some("rId99".to_string());

        let mut output = fixtures::empty_copy(&input);
        let layout = src.layout_partname().unwrap().clone();
        let mut dst = output.add_blank_slide(&layout, &[]).unwrap();

        let outcome = copy_pictures(&mut output, &input, &src, &info, &mut dst);
        assert_eq!(outcome.succeeded(), &[Geometry::new(5, 6, 7, 8)]);
        assert!(matches!(outcome.failures(), [ShapeError::Image { .. }]));
    }
}
