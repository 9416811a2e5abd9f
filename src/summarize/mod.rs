//! Content summarizer.
//!
//! Reduces a [`StructuredDocument`] to a slide outline and a visual theme.
//! When a [`TextGenerator`] is attached the outline is requested from it
//! first; any failure there falls back to the deterministic
//! [`heuristic`] splitter, so [`Summarizer::analyze`] itself never fails.

pub mod generative;
pub mod heuristic;

#[cfg(feature = "gemini")]
pub mod gemini;

pub use generative::TextGenerator;

use crate::common::{Error, Result};
use crate::config::GenerativeConfig;
use crate::document::StructuredDocument;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Closing slide title used when none is configured or given.
pub const DEFAULT_CLOSING_TITLE: &str = "Thank you for listening";

/// One slide of an outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SlideSpec {
    Title {
        title: String,
        #[serde(default)]
        subtitle: String,
    },
    Content {
        heading: String,
        #[serde(default)]
        bullets: Vec<String>,
    },
    #[serde(alias = "closing")]
    Ending {
        #[serde(default)]
        title: String,
    },
}

/// Visual theme of an outline. Each theme names a template profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[serde(alias = "專業技術", alias = "Professional")]
    Professional,
    #[serde(alias = "學術研究", alias = "Academic")]
    Academic,
    #[default]
    #[serde(alias = "簡約", alias = "Minimal")]
    Minimal,
}

impl Theme {
    /// Name of the template profile rendering this theme.
    pub fn profile_name(self) -> &'static str {
        match self {
            Theme::Professional => "professional",
            Theme::Academic => "academic",
            Theme::Minimal => "minimal",
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    /// Profile names and the theme names a generative service may reply with.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "professional" | "專業技術" => Ok(Theme::Professional),
            "academic" | "學術研究" => Ok(Theme::Academic),
            "minimal" | "簡約" => Ok(Theme::Minimal),
            other => Err(Error::Config(format!("unknown theme '{}'", other))),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile_name())
    }
}

/// Theme and slide outline of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub theme: Theme,
    pub slides: Vec<SlideSpec>,
    /// Whether the outline came from the generative service
    pub used_external_model: bool,
}

/// Heuristic splitter limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub max_bullets_per_slide: usize,
    pub max_chars_per_bullet: usize,
    /// Title of the closing slide
    pub closing_title: String,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_bullets_per_slide: 5,
            max_chars_per_bullet: 80,
            closing_title: DEFAULT_CLOSING_TITLE.to_string(),
        }
    }
}

/// Outline builder with an optional generative service.
///
/// # Example
///
/// ```rust
/// use longan::document::parse_text_content;
/// use longan::summarize::{Limits, Summarizer, Theme};
///
/// let doc = parse_text_content("# Design\nThe API is small.\n");
/// let analysis = Summarizer::new(Limits::default()).analyze(&doc);
/// assert_eq!(analysis.theme, Theme::Professional);
/// assert!(!analysis.used_external_model);
/// ```
pub struct Summarizer {
    limits: Limits,
    generator: Option<Box<dyn TextGenerator>>,
}

impl Summarizer {
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            generator: None,
        }
    }

    /// Ask `generator` for outlines before falling back to the heuristic.
    pub fn with_generator(mut self, generator: Box<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Outline `doc`.
    pub fn analyze(&self, doc: &StructuredDocument) -> Analysis {
        if let Some(generator) = &self.generator {
            match generative::analyze(generator.as_ref(), doc) {
                Ok(analysis) => {
                    info!(
                        service = generator.name(),
                        slides = analysis.slides.len(),
                        theme = %analysis.theme,
                        "outline generated"
                    );
                    return analysis;
                },
                Err(e) => {
                    warn!(service = generator.name(), error = %e, "generative summary failed, using heuristic");
                },
            }
        }

        let analysis = heuristic::analyze(doc, &self.limits);
        debug!(slides = analysis.slides.len(), theme = %analysis.theme, "heuristic outline");
        analysis
    }
}

/// The generative service described by `config`, if it is enabled and usable.
///
/// Returns `None` when the service is disabled, when its API key variable is
/// unset, or when the crate was built without a service implementation.
pub fn generator_from_config(config: &GenerativeConfig) -> Option<Box<dyn TextGenerator>> {
    if !config.enabled {
        debug!("generative summary disabled");
        return None;
    }

    #[cfg(feature = "gemini")]
    {
        match gemini::GeminiGenerator::from_config(config) {
            Some(generator) => Some(Box::new(generator)),
            None => {
                warn!(env = %config.api_key_env, "API key not set; using heuristic summarizer");
                None
            },
        }
    }

    #[cfg(not(feature = "gemini"))]
    {
        warn!("built without a generative service; using heuristic summarizer");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_text_content;

    struct Canned(std::result::Result<&'static str, &'static str>);

    impl TextGenerator for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        fn generate(&self, _prompt: &str) -> Result<String> {
            self.0
                .map(str::to_string)
                .map_err(|e| Error::Service(e.to_string()))
        }
    }

    #[test]
    fn test_slide_spec_json_shape() {
        let json = r#"[
            {"type": "title", "title": "Deck"},
            {"type": "content", "heading": "Why", "bullets": ["a", "b"]},
            {"type": "ending", "title": "Bye"}
        ]"#;
        let slides: Vec<SlideSpec> = serde_json::from_str(json).unwrap();
        assert_eq!(
            slides[0],
            SlideSpec::Title {
                title: "Deck".to_string(),
                subtitle: String::new()
            }
        );
        assert!(matches!(&slides[1], SlideSpec::Content { bullets, .. } if bullets.len() == 2));

        let back = serde_json::to_value(&slides[2]).unwrap();
        assert_eq!(back["type"], "ending");
    }

    #[test]
    fn test_theme_names_and_aliases() {
        let themes: Vec<Theme> =
            serde_json::from_str(r#"["academic", "專業技術", "簡約", "Academic"]"#).unwrap();
        assert_eq!(
            themes,
            vec![Theme::Academic, Theme::Professional, Theme::Minimal, Theme::Academic]
        );
        assert_eq!(Theme::Professional.profile_name(), "professional");
        assert_eq!(Theme::default(), Theme::Minimal);
        assert_eq!(" Academic ".parse::<Theme>().unwrap(), Theme::Academic);
        assert_eq!("簡約".parse::<Theme>().unwrap(), Theme::Minimal);
        assert!("baroque".parse::<Theme>().is_err());
    }

    #[test]
    fn test_generator_result_is_used() {
        let reply = r#"```json
{"theme": "學術研究", "slides": [{"type": "title", "title": "Study"}]}
```"#;
        let summarizer = Summarizer::new(Limits::default()).with_generator(Box::new(Canned(Ok(reply))));
        let analysis = summarizer.analyze(&parse_text_content("# Study\n"));
        assert!(analysis.used_external_model);
        assert_eq!(analysis.theme, Theme::Academic);
        assert_eq!(analysis.slides.len(), 1);
    }

    #[test]
    fn test_falls_back_on_service_error() {
        let summarizer =
            Summarizer::new(Limits::default()).with_generator(Box::new(Canned(Err("quota"))));
        let analysis = summarizer.analyze(&parse_text_content("# Notes\nline\n"));
        assert!(!analysis.used_external_model);
        assert_eq!(analysis.slides.len(), 3);
    }

    #[test]
    fn test_falls_back_on_malformed_reply() {
        let summarizer = Summarizer::new(Limits::default())
            .with_generator(Box::new(Canned(Ok("Sure! Here is your deck."))));
        let analysis = summarizer.analyze(&parse_text_content("# Notes\n"));
        assert!(!analysis.used_external_model);
    }

    #[test]
    fn test_disabled_service_yields_no_generator() {
        let config = GenerativeConfig {
            enabled: false,
            ..GenerativeConfig::default()
        };
        assert!(generator_from_config(&config).is_none());
    }
}
