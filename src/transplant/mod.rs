//! Template transplant.
//!
//! Re-hosts the content of an input deck on the design of a template deck.
//! The output starts as a copy of the template with its slides stripped; each
//! input slide then gets exactly one output slide, cloned from the template
//! slide chosen by [`select_template_slide`], with the input's title and body
//! text substituted into the clone's placeholders and its pictures copied at
//! their original positions. Leftover placeholders are deleted. The last input
//! slide reuses the template's closing slide unchanged apart from its title.
//!
//! Failures on single shapes or pictures never fail the call; they are logged
//! and counted in the returned [`TransplantReport`].
//!
//! # Example
//!
//! ```rust,no_run
//! let report = longan::transplant::transplant("notes.pptx", "corporate.pptx", "out.pptx")?;
//! println!("{} slides, {} skipped shapes", report.slides_written, report.failure_count());
//! # Ok::<(), longan::Error>(())
//! ```

pub mod analyzer;
pub mod classifier;
pub mod clone;
pub mod images;
pub mod outcome;
pub mod selector;
pub mod substitute;

pub use analyzer::{PictureInfo, SlideInfo, TextShapeInfo, analyze};
pub use classifier::{Candidate, CandidateRole, PlaceholderSet};
pub use outcome::{BatchOutcome, ShapeError, SlideOutcome, TransplantReport};
pub use selector::select_template_slide;

use crate::common::error::{Error, Result};
use crate::ooxml::pptx::{Package, Slide};
use std::path::Path;
use tracing::{debug, info, info_span, warn};

/// Transplant the deck at `input` onto the design of the deck at `template`
/// and write the result to `output`, replacing any existing file.
///
/// Fails with [`Error::NotFound`] when either deck cannot be opened,
/// [`Error::Write`] when the output cannot be written, and
/// [`Error::InvalidTemplate`] when the template has no slide to imitate.
pub fn transplant<P, Q, R>(input: P, template: Q, output: R) -> Result<TransplantReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let (input, template, output) = (input.as_ref(), template.as_ref(), output.as_ref());
    let span = info_span!(
        "transplant",
        input = %input.display(),
        template = %template.display()
    );
    let _enter = span.enter();

    let input_deck = Package::open(input).map_err(|e| Error::not_found(input, e))?;
    let template_deck = Package::open(template).map_err(|e| Error::not_found(template, e))?;

    let (deck, report) = transplant_decks(&input_deck, &template_deck)?;
    deck.save(output).map_err(|e| Error::write(output, e))?;

    info!(
        output = %output.display(),
        slides = report.slides_written,
        failures = report.failure_count(),
        dropped = report.dropped_contents(),
        "transplant finished"
    );
    Ok(report)
}

/// In-memory form of [`transplant`]: returns the assembled deck unsaved.
pub fn transplant_decks(input: &Package, template: &Package) -> Result<(Package, TransplantReport)> {
    Transplanter::new(input, template)?.run()
}

/// State of one transplant call: the two source decks and the deck being built.
struct Transplanter<'a> {
    input: &'a Package,
    template: &'a Package,
    output: Package,
    template_count: usize,
}

impl<'a> Transplanter<'a> {
    fn new(input: &'a Package, template: &'a Package) -> Result<Self> {
        let template_count = template.slide_count();
        if template_count == 0 && input.slide_count() > 0 {
            return Err(Error::InvalidTemplate(
                "template has no slides to imitate".to_string(),
            ));
        }

        let mut output = Package::from_bytes(template.to_bytes()?)?;
        let removed = output.remove_all_slides()?;
        debug!(removed, "stripped template slides from output");

        Ok(Self {
            input,
            template,
            output,
            template_count,
        })
    }

    fn run(mut self) -> Result<(Package, TransplantReport)> {
        let total = self.input.slide_count();
        info!(
            input_slides = total,
            template_slides = self.template_count,
            template_layouts = self.template.layout_count()?,
            "transplanting"
        );

        let mut report = TransplantReport::default();
        for index in 0..total {
            let span = info_span!("slide", index);
            let _enter = span.enter();

            let src = self.input.slide(index)?;
            let layout_name = src
                .layout_partname()
                .and_then(|layout| self.input.layout_name(layout).ok())
                .unwrap_or_default();
            let info = analyze(&src, index, total, layout_name);
            report.slides.push(self.transplant_slide(&src, &info)?);
        }

        report.slides_written = self.output.slide_count();
        Ok((self.output, report))
    }

    fn transplant_slide(&mut self, src: &Slide, info: &SlideInfo) -> Result<SlideOutcome> {
        let template_index = select_template_slide(info, self.template_count).ok_or_else(|| {
            Error::InvalidTemplate("template has no slides to imitate".to_string())
        })?;
        let template_slide = self.template.slide(template_index)?;
        let layout = template_slide.layout_partname().cloned().ok_or_else(|| {
            Error::InvalidTemplate(format!("template slide {} has no layout", template_index + 1))
        })?;

        let mut dst = self
            .output
            .add_blank_slide(&layout, &template_slide.namespace_decls())?;
        let mut outcome = SlideOutcome {
            input_index: info.index,
            template_index,
            final_slide: info.is_last,
            ..Default::default()
        };

        if let Err(err) = clone::clone_background(&mut self.output, self.template, &template_slide, &mut dst)
        {
            warn!(error = %err, "background not copied");
            outcome.failures.push(err);
        }
        let (cloned, failures) =
            clone::clone_shapes(&mut self.output, self.template, &template_slide, &mut dst)
                .into_parts();
        debug!(template_index, shapes = ?cloned, "cloned template shapes");
        outcome.shapes_cloned = cloned.len();
        outcome.failures.extend(failures);

        if info.is_last {
            // Closing slide: only the title changes
            if let Some(title) = &info.title {
                let index = dst.title_shape().map(|shape| shape.index());
                if let Some(shape) = index.and_then(|index| dst.shape_mut(index)) {
                    substitute::substitute_text(shape, title, true);
                    outcome.titles_set = 1;
                }
            }
        } else {
            let set = PlaceholderSet::of(&dst);
            let filled =
                substitute::fill_candidates(&mut dst, &set, info.title.as_deref(), &info.contents());
            outcome.titles_set = filled.titles_set;
            outcome.contents_set = filled.contents_set;
            outcome.dropped_contents = filled.dropped_contents;
            outcome.placeholders_removed = substitute::prune(&mut dst, &filled.unused);
        }

        let (copied, failures) =
            images::copy_pictures(&mut self.output, self.input, src, info, &mut dst).into_parts();
        outcome.images_copied = copied.len();
        outcome.failures.extend(failures);

        self.output.commit_slide(&dst)?;
        info!(
            template_index,
            layout = %info.layout_name,
            titles = outcome.titles_set,
            contents = outcome.contents_set,
            removed = outcome.placeholders_removed,
            images = outcome.images_copied,
            "slide done"
        );
        Ok(outcome)
    }
}

/// Deck builders shared by the transplant tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use crate::common::xml::{XmlElement, escape_xml};
    use crate::ooxml::pptx::Package;
    use crate::ooxml::pptx::shapes::Geometry;
    use crate::ooxml::pptx::template::LAYOUT_TITLE_ONLY;

    pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    pub struct SlideFixture {
        shapes: Vec<XmlElement>,
        pictures: Vec<(i64, i64, i64, i64)>,
    }

    pub fn slide(shapes: Vec<XmlElement>) -> SlideFixture {
        picture_slide(shapes, Vec::new())
    }

    pub fn picture_slide(shapes: Vec<XmlElement>, pictures: Vec<(i64, i64, i64, i64)>) -> SlideFixture {
        SlideFixture { shapes, pictures }
    }

    fn tx_body(text: &str, sz: Option<u32>) -> String {
        let r_pr = match sz {
            Some(sz) => format!(r#"<a:rPr lang="en-US" sz="{}"/>"#, sz),
            None => r#"<a:rPr lang="en-US"/>"#.to_string(),
        };
        let run = if text.is_empty() {
            String::new()
        } else {
            format!("<a:r>{}<a:t>{}</a:t></a:r>", r_pr, escape_xml(text))
        };
        format!("<p:txBody><a:bodyPr/><a:lstStyle/><a:p>{}</a:p></p:txBody>", run)
    }

    fn xfrm((x, y, cx, cy): (i64, i64, i64, i64)) -> String {
        format!(
            r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            x, y, cx, cy
        )
    }

    /// A plain text box.
    pub fn text_box(id: u32, name: &str, text: &str, bbox: (i64, i64, i64, i64), sz: Option<u32>) -> XmlElement {
        XmlElement::parse_fragment(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>{}</p:sp>"#,
            id,
            escape_xml(name),
            xfrm(bbox),
            tx_body(text, sz)
        ))
        .unwrap()
    }

    /// A placeholder; `ph_attrs` is the raw attribute list of `p:ph`.
    pub fn placeholder(
        id: u32,
        name: &str,
        ph_attrs: &str,
        bbox: Option<(i64, i64, i64, i64)>,
        text: &str,
        sz: Option<u32>,
    ) -> XmlElement {
        XmlElement::parse_fragment(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph {}/></p:nvPr></p:nvSpPr><p:spPr>{}</p:spPr>{}</p:sp>"#,
            id,
            escape_xml(name),
            ph_attrs,
            bbox.map(xfrm).unwrap_or_default(),
            tx_body(text, sz)
        ))
        .unwrap()
    }

    /// A decorative connector, never a text candidate.
    pub fn connector(id: u32, name: &str) -> XmlElement {
        XmlElement::parse_fragment(&format!(
            r#"<p:cxnSp><p:nvCxnSpPr><p:cNvPr id="{}" name="{}"/><p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr><p:spPr>{}<a:prstGeom prst="line"><a:avLst/></a:prstGeom></p:spPr></p:cxnSp>"#,
            id,
            escape_xml(name),
            xfrm((0, 6_000_000, 12_000_000, 0))
        ))
        .unwrap()
    }

    /// A picture whose image relationship does not exist.
    pub fn dangling_picture(id: u32, name: &str, bbox: (i64, i64, i64, i64)) -> XmlElement {
        XmlElement::parse_fragment(&format!(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{}" name="{}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId99"/></p:blipFill><p:spPr>{}</p:spPr></p:pic>"#,
            id,
            escape_xml(name),
            xfrm(bbox)
        ))
        .unwrap()
    }

    /// A deck on the default template, every slide on the "Title Only" layout.
    pub fn deck(slides: Vec<SlideFixture>) -> Package {
        let mut pkg = Package::new().unwrap();
        let layout = pkg.layout_by_name(LAYOUT_TITLE_ONLY).unwrap().unwrap();
        for fixture in slides {
            let mut slide = pkg.add_blank_slide(&layout, &[]).unwrap();
            for shape in fixture.shapes {
                slide.append_shape(shape).unwrap();
            }
            for (x, y, cx, cy) in fixture.pictures {
                pkg.add_picture(&mut slide, PNG, Geometry::new(x, y, cx, cy))
                    .unwrap();
            }
            pkg.commit_slide(&slide).unwrap();
        }
        Package::from_bytes(pkg.to_bytes().unwrap()).unwrap()
    }

    /// Copy of a deck with all slides removed.
    pub fn empty_copy(deck: &Package) -> Package {
        let mut copy = Package::from_bytes(deck.to_bytes().unwrap()).unwrap();
        copy.remove_all_slides().unwrap();
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{self, connector, dangling_picture, picture_slide, placeholder, text_box};
    use super::*;
    use crate::ooxml::pptx::shapes::PlaceholderRole;

    fn title(text: &str) -> crate::common::xml::XmlElement {
        placeholder(2, "Title 1", r#"type="title""#, Some((838_200, 365_125, 10_515_600, 1_325_563)), text, Some(4400))
    }

    fn body(id: u32, idx: u32, top: i64, text: &str) -> crate::common::xml::XmlElement {
        placeholder(
            id,
            &format!("Content {}", id),
            &format!(r#"idx="{}""#, idx),
            Some((838_200, top, 10_515_600, 1_000_000)),
            text,
            Some(2800),
        )
    }

    /// Title, interior-A, interior-B and closing designs.
    fn template() -> Package {
        fixtures::deck(vec![
            fixtures::slide(vec![
                placeholder(2, "Title 1", r#"type="ctrTitle""#, Some((1_524_000, 1_122_363, 9_144_000, 2_387_600)), "Cover title", Some(6000)),
                placeholder(3, "Subtitle 2", r#"type="subTitle" idx="1""#, Some((1_524_000, 3_602_038, 9_144_000, 1_655_762)), "Cover subtitle", None),
                connector(4, "Cover"),
            ]),
            fixtures::slide(vec![title("A title"), body(3, 1, 1_825_625, "A body"), connector(4, "Motif A")]),
            fixtures::slide(vec![
                title("B title"),
                body(3, 1, 1_825_625, "B left"),
                body(4, 2, 3_500_000, "B right"),
                connector(5, "Motif B"),
            ]),
            fixtures::slide(vec![
                title("Thank you"),
                connector(3, "Closing"),
                text_box(4, "Contact", "hello@example.com", (838_200, 5_000_000, 4_000_000, 400_000), None),
            ]),
        ])
    }

    fn input() -> Package {
        fixtures::deck(vec![
            fixtures::slide(vec![title("Quarterly review")]),
            picture_slide(
                vec![title("Findings"), body(3, 1, 2_000_000, "Revenue grew")],
                vec![(100, 200, 300, 400), (500, 600, 700, 800)],
            ),
            fixtures::slide(vec![title("Questions?")]),
        ])
    }

    fn reopen(deck: &Package) -> Package {
        Package::from_bytes(deck.to_bytes().unwrap()).unwrap()
    }

    #[test]
    fn test_three_slide_scenario() {
        let template = template();
        let (deck, report) = transplant_decks(&input(), &template).unwrap();
        let deck = reopen(&deck);

        assert_eq!(deck.slide_count(), 3);
        assert_eq!(report.slides_written, 3);
        let chosen: Vec<_> = report.slides.iter().map(|s| s.template_index).collect();
        assert_eq!(chosen, vec![0, 1, 3]);
        assert_eq!(report.failure_count(), 0);

        // Opening slide: centered title takes the input title, the unused subtitle goes
        let first = deck.slide(0).unwrap();
        assert_eq!(first.shape_names(), vec!["Title 1", "Cover"]);
        assert_eq!(first.title_shape().unwrap().text(), "Quarterly review");
        assert_eq!(report.slides[0].placeholders_removed, 1);

        // Interior slide imitates interior-A and gains both pictures
        let second = deck.slide(1).unwrap();
        let texts: Vec<_> = second.shapes().iter().map(|s| s.text()).collect();
        assert_eq!(texts[..2], ["Findings".to_string(), "Revenue grew".to_string()]);
        assert!(second.shape_names().contains(&"Motif A".to_string()));
        let pictures: Vec<_> = second
            .shapes()
            .iter()
            .filter(|s| s.is_picture())
            .map(|s| s.geometry())
            .collect();
        assert_eq!(pictures.len(), 2);
        assert_eq!(report.slides[1].images_copied, 2);

        // Closing slide keeps the template's closing design
        let last = deck.slide(2).unwrap();
        assert!(report.slides[2].final_slide);
        assert_eq!(last.title_shape().unwrap().text(), "Questions?");
        assert_eq!(last.shape_names(), vec!["Title 1", "Closing", "Contact"]);
        assert_eq!(report.slides[2].images_copied, 0);
    }

    #[test]
    fn test_slide_count_matches_input() {
        let one_slide_template = fixtures::deck(vec![fixtures::slide(vec![title("Only")])]);
        for template in [template(), one_slide_template] {
            for n in [0usize, 1, 2, 7] {
                let slides = (0..n)
                    .map(|i| fixtures::slide(vec![title(&format!("Slide {}", i))]))
                    .collect();
                let input = fixtures::deck(slides);
                let (deck, report) = transplant_decks(&input, &template).unwrap();
                assert_eq!(reopen(&deck).slide_count(), n);
                assert_eq!(report.slides.len(), n);
            }
        }
    }

    #[test]
    fn test_closing_slide_keeps_template_structure() {
        let template = template();
        let (deck, _) = transplant_decks(&input(), &template).unwrap();
        let deck = reopen(&deck);

        let expected = template.slide(3).unwrap();
        let actual = deck.slide(2).unwrap();
        let expected_shapes = expected.shapes();
        let actual_shapes = actual.shapes();
        assert_eq!(expected_shapes.len(), actual_shapes.len());
        for (want, got) in expected_shapes.iter().zip(&actual_shapes) {
            if want.role() == Some(PlaceholderRole::Title) {
                assert_eq!(got.geometry(), want.geometry());
                continue;
            }
            assert_eq!(got.element(), want.element());
        }
    }

    #[test]
    fn test_interior_templates_cycle() {
        let slides = (0..6)
            .map(|i| fixtures::slide(vec![title(&format!("Slide {}", i))]))
            .collect();
        let (_, report) = transplant_decks(&fixtures::deck(slides), &template()).unwrap();
        let chosen: Vec<_> = report.slides.iter().map(|s| s.template_index).collect();
        assert_eq!(chosen, vec![0, 1, 2, 1, 2, 3]);
    }

    #[test]
    fn test_unused_candidates_pruned_and_resized() {
        // Interior-B has one title and two content candidates
        let input = fixtures::deck(vec![
            fixtures::slide(vec![]),
            fixtures::slide(vec![]),
            fixtures::slide(vec![title("Only title"), body(3, 1, 2_000_000, "Only body")]),
            fixtures::slide(vec![]),
        ]);
        let (deck, report) = transplant_decks(&input, &template()).unwrap();
        let deck = reopen(&deck);
        assert_eq!(report.slides[2].template_index, 2);
        assert_eq!(report.slides[2].placeholders_removed, 1);

        let slide = deck.slide(2).unwrap();
        assert_eq!(slide.shape_names(), vec!["Title 1", "Content 3", "Motif B"]);
        let body = &slide.shapes()[1];
        assert_eq!(body.text(), "Only body");
        let sizes: Vec<_> = body
            .element()
            .descendants("rPr")
            .iter()
            .filter_map(|r| r.attr("sz"))
            .collect();
        assert_eq!(sizes, vec!["1400"]);
        let title_sizes: Vec<_> = slide.shapes()[0]
            .element()
            .descendants("rPr")
            .iter()
            .filter_map(|r| r.attr("sz"))
            .collect();
        assert_eq!(title_sizes, vec!["4400"]);

        // Slides without any text lose every candidate
        let empty = deck.slide(1).unwrap();
        assert_eq!(empty.shape_names(), vec!["Motif A"]);
    }

    #[test]
    fn test_broken_picture_does_not_fail_the_call() {
        let input = fixtures::deck(vec![
            fixtures::slide(vec![]),
            picture_slide(
                vec![title("Pictures"), dangling_picture(9, "Broken", (1, 1, 1, 1))],
                vec![(10, 20, 30, 40)],
            ),
            fixtures::slide(vec![]),
        ]);
        let (deck, report) = transplant_decks(&input, &template()).unwrap();
        let deck = reopen(&deck);

        assert_eq!(report.slides[1].images_copied, 1);
        assert_eq!(report.failure_count(), 1);
        assert!(matches!(report.slides[1].failures[0], ShapeError::Image { .. }));
        let boxes: Vec<_> = deck
            .slide(1)
            .unwrap()
            .shapes()
            .iter()
            .filter(|s| s.is_picture())
            .map(|s| s.geometry())
            .collect();
        assert_eq!(boxes, vec![crate::ooxml::pptx::shapes::Geometry::new(10, 20, 30, 40)]);
    }

    #[test]
    fn test_surplus_content_is_counted() {
        let input = fixtures::deck(vec![
            fixtures::slide(vec![]),
            fixtures::slide(vec![
                title("Busy"),
                body(3, 1, 2_000_000, "one"),
                body(4, 2, 3_000_000, "two"),
                body(5, 3, 4_000_000, "three"),
            ]),
            fixtures::slide(vec![]),
        ]);
        let (_, report) = transplant_decks(&input, &template()).unwrap();
        assert_eq!(report.slides[1].contents_set, 1);
        assert_eq!(report.slides[1].dropped_contents, 2);
        assert_eq!(report.dropped_contents(), 2);
    }

    #[test]
    fn test_template_without_slides() {
        let empty_template = fixtures::deck(vec![]);
        assert!(matches!(
            transplant_decks(&input(), &empty_template),
            Err(Error::InvalidTemplate(_))
        ));

        let (deck, report) = transplant_decks(&fixtures::deck(vec![]), &empty_template).unwrap();
        assert_eq!(reopen(&deck).slide_count(), 0);
        assert_eq!(report.slides_written, 0);
    }

    #[test]
    fn test_transplant_files() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("input.pptx");
        let template_path = dir.path().join("template.pptx");
        let output_path = dir.path().join("output.pptx");
        input().save(&input_path).unwrap();
        template().save(&template_path).unwrap();
        std::fs::write(&output_path, b"stale").unwrap();

        let report = transplant(&input_path, &template_path, &output_path).unwrap();
        assert_eq!(report.slides_written, 3);
        assert_eq!(Package::open(&output_path).unwrap().slide_count(), 3);

        let missing = transplant(dir.path().join("absent.pptx"), &template_path, &output_path);
        assert!(matches!(missing, Err(Error::NotFound(_))));

        std::fs::write(dir.path().join("notes.txt"), b"not a deck").unwrap();
        let invalid = transplant(dir.path().join("notes.txt"), &template_path, &output_path);
        assert!(matches!(invalid, Err(Error::NotFound(_))));

        let unwritable = transplant(
            &input_path,
            &template_path,
            dir.path().join("no-such-dir").join("out.pptx"),
        );
        assert!(matches!(unwritable, Err(Error::Write(_))));
    }
}
