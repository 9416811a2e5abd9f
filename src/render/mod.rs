//! Slide renderer.
//!
//! Builds a deck from a slide outline on the built-in template. Each
//! [`SlideSpec`] variant has a fixed layout:
//!
//! | spec      | layout              | filled placeholders        |
//! |-----------|---------------------|----------------------------|
//! | `Title`   | "Title Slide"       | title, subtitle (`idx=1`)  |
//! | `Content` | "Title and Content" | title, body (`idx=1`)      |
//! | `Ending`  | "Title Only"        | title                      |
//!
//! The text is formatted from a [`Profile`].

use crate::common::{Error, Result};
use crate::ooxml::error::OoxmlError;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::pptx::shapes::textframe;
use crate::ooxml::pptx::template::{LAYOUT_TITLE_AND_CONTENT, LAYOUT_TITLE_ONLY, LAYOUT_TITLE_SLIDE};
use crate::ooxml::pptx::{Package, Slide, TextFormat};
use crate::profile::Profile;
use crate::summarize::{DEFAULT_CLOSING_TITLE, SlideSpec};
use std::path::Path;
use tracing::{debug, info, info_span};

/// Placeholder index of the subtitle and body placeholders.
const BODY_IDX: u32 = 1;

/// Layout partnames of the built-in template, resolved once per deck.
struct Layouts {
    title: PackURI,
    content: PackURI,
    closing: PackURI,
}

impl Layouts {
    fn resolve(pkg: &Package) -> Result<Self> {
        let find = |name: &str| -> Result<PackURI> {
            pkg.layout_by_name(name)?.ok_or_else(|| {
                Error::Ooxml(OoxmlError::PartNotFound(format!("layout '{}'", name)))
            })
        };
        Ok(Self {
            title: find(LAYOUT_TITLE_SLIDE)?,
            content: find(LAYOUT_TITLE_AND_CONTENT)?,
            closing: find(LAYOUT_TITLE_ONLY)?,
        })
    }
}

/// Run formats derived from a profile.
struct Formats {
    title: TextFormat,
    subtitle: TextFormat,
    heading: TextFormat,
    body: TextFormat,
}

impl Formats {
    fn of(profile: &Profile) -> Self {
        let font = Some(profile.font.clone());
        Self {
            title: TextFormat {
                font: font.clone(),
                size: Some(profile.title_size),
                color: Some(profile.primary_color.to_hex()),
                ..TextFormat::default()
            },
            subtitle: TextFormat {
                font: font.clone(),
                size: Some(profile.subtitle_size),
                color: Some(profile.secondary_color.to_hex()),
                ..TextFormat::default()
            },
            heading: TextFormat {
                font: font.clone(),
                color: Some(profile.primary_color.to_hex()),
                ..TextFormat::default()
            },
            body: TextFormat {
                font,
                size: Some(profile.content_size),
                ..TextFormat::default()
            },
        }
    }
}

/// Shape-tree indexes of the title placeholder and the `idx=1` placeholder.
fn placeholder_indexes(slide: &Slide) -> (Option<usize>, Option<usize>) {
    let shapes = slide.shapes();
    let title = shapes
        .iter()
        .find(|shape| shape.role().is_some_and(|role| role.is_title()))
        .map(|shape| shape.index());
    let body = shapes
        .iter()
        .find(|shape| shape.placeholder().is_some_and(|ph| ph.idx == BODY_IDX && !ph.role.is_title()))
        .map(|shape| shape.index());
    (title, body)
}

/// Write `text` into the shape at `index` and format its runs.
fn fill(slide: &mut Slide, index: Option<usize>, text: &str, format: &TextFormat) {
    let Some(shape) = index.and_then(|index| slide.shape_mut(index)) else {
        debug!(chars = text.len(), "layout has no placeholder for text");
        return;
    };
    textframe::set_text(shape, text);
    textframe::apply_text_format(shape, format);
}

/// Text of one line per bullet. Line breaks inside a bullet stay within it.
fn bullet_text(bullets: &[String]) -> String {
    bullets
        .iter()
        .map(|b| b.replace(['\r', '\n'], "\u{b}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_slide(
    pkg: &mut Package,
    layouts: &Layouts,
    formats: &Formats,
    spec: &SlideSpec,
) -> Result<()> {
    let layout = match spec {
        SlideSpec::Title { .. } => &layouts.title,
        SlideSpec::Content { .. } => &layouts.content,
        SlideSpec::Ending { .. } => &layouts.closing,
    };
    let mut slide = pkg.add_slide(layout)?;
    let (title_idx, body_idx) = placeholder_indexes(&slide);

    match spec {
        SlideSpec::Title { title, subtitle } => {
            fill(&mut slide, title_idx, title, &formats.title);
            fill(&mut slide, body_idx, subtitle, &formats.subtitle);
        },
        SlideSpec::Content { heading, bullets } => {
            fill(&mut slide, title_idx, heading, &formats.heading);
            fill(&mut slide, body_idx, &bullet_text(bullets), &formats.body);
        },
        SlideSpec::Ending { title } => {
            let title = if title.trim().is_empty() {
                DEFAULT_CLOSING_TITLE
            } else {
                title.as_str()
            };
            fill(&mut slide, title_idx, title, &formats.title);
        },
    }

    pkg.commit_slide(&slide)?;
    Ok(())
}

/// Build a deck for `slides` in memory.
///
/// An empty outline yields one title slide with an empty title.
pub fn build_deck(slides: &[SlideSpec], profile: &Profile) -> Result<Package> {
    let mut pkg = Package::new()?;
    let layouts = Layouts::resolve(&pkg)?;
    let formats = Formats::of(profile);

    let placeholder_title = [SlideSpec::Title {
        title: String::new(),
        subtitle: String::new(),
    }];
    let slides = if slides.is_empty() {
        &placeholder_title[..]
    } else {
        slides
    };

    for spec in slides {
        render_slide(&mut pkg, &layouts, &formats, spec)?;
    }
    Ok(pkg)
}

/// Render `slides` with `profile` to a .pptx at `output_path`, creating its
/// directory when missing.
///
/// # Example
///
/// ```rust,no_run
/// use longan::profile::Profile;
/// use longan::render::render;
/// use longan::summarize::SlideSpec;
///
/// let slides = vec![
///     SlideSpec::Title { title: "Roadmap".into(), subtitle: "2025".into() },
///     SlideSpec::Content { heading: "Goals".into(), bullets: vec!["Ship".into()] },
///     SlideSpec::Ending { title: String::new() },
/// ];
/// render(&slides, &Profile::professional(), "out/roadmap.pptx")?;
/// # Ok::<(), longan::common::Error>(())
/// ```
pub fn render<P: AsRef<Path>>(slides: &[SlideSpec], profile: &Profile, output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    let _span = info_span!("render", output = %output_path.display(), profile = %profile.name).entered();

    let pkg = build_deck(slides, profile)?;

    if let Some(dir) = output_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| Error::write(dir, e))?;
    }
    pkg.save(output_path).map_err(|e| Error::write(output_path, e))?;

    info!(slides = pkg.slide_count(), "deck rendered");
    Ok(())
}
