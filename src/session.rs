//! Request session.
//!
//! A [`Session`] owns what one caller needs across requests: the summarizer,
//! the known profiles, the output directory, and the last analysis so a deck
//! can be re-rendered with another profile without summarizing again.

use crate::common::{Error, Result};
use crate::config::Config;
use crate::document::parse_document;
use crate::profile::{Profile, Profiles};
use crate::render::render;
use crate::summarize::{Analysis, Summarizer, Theme, generator_from_config};
use crate::transplant::{TransplantReport, transplant};
use std::path::{Path, PathBuf};
use tracing::{info, info_span};

/// A rendered deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub output_path: PathBuf,
    /// Profile the deck was rendered with
    pub profile_name: String,
    /// Theme chosen by the summarizer
    pub theme: Theme,
    pub used_external_model: bool,
    pub slide_count: usize,
}

/// Analysis kept for re-rendering.
#[derive(Debug, Clone)]
struct LastAnalysis {
    analysis: Analysis,
    stem: String,
}

/// Caller-owned state for document-to-deck requests.
///
/// # Example
///
/// ```rust,no_run
/// use longan::config::Config;
/// use longan::session::Session;
///
/// let mut session = Session::from_config(&Config::default())?;
/// let first = session.generate("notes.md", None)?;
/// let again = session.regenerate("academic")?;
/// assert_eq!(first.output_path, again.output_path);
/// # Ok::<(), longan::common::Error>(())
/// ```
pub struct Session {
    summarizer: Summarizer,
    profiles: Profiles,
    output_dir: PathBuf,
    last: Option<LastAnalysis>,
}

impl Session {
    pub fn new(summarizer: Summarizer, profiles: Profiles, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            summarizer,
            profiles,
            output_dir: output_dir.into(),
            last: None,
        }
    }

    /// Session wired from configuration: limits, generative service, profiles
    /// and output directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut summarizer = Summarizer::new(config.summarizer.limits());
        if let Some(generator) = generator_from_config(&config.summarizer.generative) {
            summarizer = summarizer.with_generator(generator);
        }
        Ok(Self::new(summarizer, config.profiles()?, &config.output.dir))
    }

    pub fn profiles(&self) -> &Profiles {
        &self.profiles
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// The analysis of the last generated document.
    pub fn last_analysis(&self) -> Option<&Analysis> {
        self.last.as_ref().map(|last| &last.analysis)
    }

    /// Profile for a requested name. Theme names, including the ones a
    /// generative service replies with, map to their profile; anything else
    /// unknown gets the fallback profile.
    pub fn resolve_profile(&self, name: &str) -> &Profile {
        if self.profiles.contains(name) {
            return self.profiles.get(name);
        }
        match name.parse::<Theme>() {
            Ok(theme) => self.profiles.get(theme.profile_name()),
            Err(_) => self.profiles.get(name),
        }
    }

    fn output_path(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("{}.pptx", stem))
    }

    /// Structure, summarize and render the document at `path` to
    /// `<output_dir>/<stem>.pptx`.
    ///
    /// The deck uses `forced_profile` when given, otherwise the profile of the
    /// detected theme. The analysis is kept for [`Session::regenerate`].
    pub fn generate<P: AsRef<Path>>(&mut self, path: P, forced_profile: Option<&str>) -> Result<Generated> {
        let path = path.as_ref();
        let _span = info_span!("generate", document = %path.display()).entered();

        let structured = parse_document(path)?;
        let analysis = self.summarizer.analyze(&structured);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "presentation".to_string());

        let profile_name = forced_profile.unwrap_or(analysis.theme.profile_name());
        let profile = self.resolve_profile(profile_name).clone();
        let generated = self.render_analysis(&analysis, &stem, &profile)?;

        self.last = Some(LastAnalysis { analysis, stem });
        Ok(generated)
    }

    /// Re-render the last analysis with another profile, to the same path.
    ///
    /// Fails with [`Error::NoPriorAnalysis`] before the first successful
    /// [`Session::generate`].
    pub fn regenerate(&self, profile_name: &str) -> Result<Generated> {
        let last = self.last.as_ref().ok_or(Error::NoPriorAnalysis)?;
        let _span = info_span!("regenerate", profile = profile_name).entered();
        let profile = self.resolve_profile(profile_name);
        self.render_analysis(&last.analysis, &last.stem, profile)
    }

    fn render_analysis(&self, analysis: &Analysis, stem: &str, profile: &Profile) -> Result<Generated> {
        let output_path = self.output_path(stem);
        render(&analysis.slides, profile, &output_path)?;
        info!(
            output = %output_path.display(),
            profile = %profile.name,
            theme = %analysis.theme,
            external = analysis.used_external_model,
            "deck generated"
        );
        Ok(Generated {
            output_path,
            profile_name: profile.name.clone(),
            theme: analysis.theme,
            used_external_model: analysis.used_external_model,
            slide_count: analysis.slides.len().max(1),
        })
    }

    /// Transplant `input` onto the design of `template`.
    pub fn restyle<P, Q, R>(&self, input: P, template: Q, output: R) -> Result<TransplantReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        transplant(input, template, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::Package;
    use crate::summarize::Limits;

    fn session(dir: &Path) -> Session {
        Session::new(Summarizer::new(Limits::default()), Profiles::builtin(), dir.join("out"))
    }

    fn title_font(path: &Path) -> Option<String> {
        let pkg = Package::open(path).unwrap();
        let slide = pkg.slide(0).unwrap();
        let title = slide.title_shape()?;
        title.element().descendants("latin").first()?.attr("typeface")
    }

    #[test]
    fn test_generate_then_regenerate() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("study.md");
        std::fs::write(&doc, "# Study\nOur research method.\n## Results\n- up\n- down\n").unwrap();

        let mut session = session(dir.path());
        let first = session.generate(&doc, None).unwrap();
        assert_eq!(first.theme, Theme::Academic);
        assert_eq!(first.profile_name, "academic");
        assert_eq!(first.output_path, dir.path().join("out").join("study.pptx"));
        assert_eq!(first.slide_count, 4);
        assert_eq!(title_font(&first.output_path).as_deref(), Some("Times New Roman"));

        let second = session.regenerate("professional").unwrap();
        assert_eq!(second.output_path, first.output_path);
        assert_eq!(second.profile_name, "professional");
        assert_eq!(second.theme, Theme::Academic);
        assert_eq!(title_font(&second.output_path).as_deref(), Some("Calibri"));
    }

    #[test]
    fn test_forced_profile_and_aliases() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("plain.txt");
        std::fs::write(&doc, "hello").unwrap();

        let mut session = session(dir.path());
        assert_eq!(session.generate(&doc, Some("專業技術")).unwrap().profile_name, "professional");
        assert_eq!(session.generate(&doc, Some("neon")).unwrap().profile_name, "minimal");
        assert_eq!(session.resolve_profile("Academic").name, "academic");
    }

    #[test]
    fn test_regenerate_without_analysis() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            session(dir.path()).regenerate("minimal"),
            Err(Error::NoPriorAnalysis)
        ));
    }

    #[test]
    fn test_failed_generate_keeps_previous_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("a.md");
        std::fs::write(&doc, "# A\n").unwrap();

        let mut session = session(dir.path());
        session.generate(&doc, None).unwrap();
        assert!(matches!(
            session.generate(dir.path().join("b.pdf"), None),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(session.last_analysis().is_some());
        assert!(session.regenerate("minimal").unwrap().output_path.ends_with("a.pptx"));
    }

    #[test]
    fn test_restyle_reports_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = session(dir.path()).restyle(
            dir.path().join("in.pptx"),
            dir.path().join("template.pptx"),
            dir.path().join("out.pptx"),
        );
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
