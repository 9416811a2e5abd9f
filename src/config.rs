//! Application configuration.
//!
//! Read from a YAML file; every section and field is optional and falls back
//! to its default. A missing file is the same as an empty one.
//!
//! ```yaml
//! logging:
//!   level: debug
//! output:
//!   dir: decks
//! summarizer:
//!   max_bullets_per_slide: 6
//!   generative:
//!     enabled: false
//! profiles_file: profiles.yaml
//! ```

use crate::common::{Error, Result};
use crate::profile::Profiles;
use crate::summarize::Limits;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: Logging,
    pub output: Output,
    pub summarizer: SummarizerConfig,
    /// YAML list of additional template profiles, relative to the working
    /// directory
    pub profiles_file: Option<PathBuf>,
}

impl Config {
    /// Load `path`, or the defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("reading config {}: {}", path.display(), e)))?;
        let cfg = Self::from_yaml(&raw).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let cfg: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_saphyr::from_str(yaml).map_err(|e| Error::Config(format!("parsing YAML: {}", e)))?
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.summarizer.max_bullets_per_slide == 0 {
            return Err(Error::Config(
                "summarizer.max_bullets_per_slide must be at least 1".to_string(),
            ));
        }
        if self.summarizer.max_chars_per_bullet == 0 {
            return Err(Error::Config(
                "summarizer.max_chars_per_bullet must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Built-in profiles plus those of `profiles_file`.
    pub fn profiles(&self) -> Result<Profiles> {
        match &self.profiles_file {
            Some(path) => Profiles::load(path),
            None => Ok(Profiles::builtin()),
        }
    }

    /// Effective config as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| Error::Config(format!("serializing config: {}", e)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Filter directive used when neither `--log-level` nor `RUST_LOG` is set
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    /// Directory generated decks are written to
    pub dir: PathBuf,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub max_bullets_per_slide: usize,
    pub max_chars_per_bullet: usize,
    pub closing_title: String,
    pub generative: GenerativeConfig,
}

impl SummarizerConfig {
    pub fn limits(&self) -> Limits {
        Limits {
            max_bullets_per_slide: self.max_bullets_per_slide,
            max_chars_per_bullet: self.max_chars_per_bullet,
            closing_title: self.closing_title.clone(),
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        let limits = Limits::default();
        Self {
            max_bullets_per_slide: limits.max_bullets_per_slide,
            max_chars_per_bullet: limits.max_chars_per_bullet,
            closing_title: limits.closing_title,
            generative: GenerativeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerativeConfig {
    pub enabled: bool,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gemini-2.5-flash".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".into(),
            timeout_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.output.dir, PathBuf::from("output"));
        assert_eq!(cfg.summarizer.limits(), Limits::default());
        assert!(cfg.summarizer.generative.enabled);
        assert_eq!(cfg.summarizer.generative.api_key_env, "GEMINI_API_KEY");
        assert!(cfg.profiles_file.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let cfg = Config::from_yaml(
            "summarizer:\n  max_bullets_per_slide: 7\n  generative:\n    enabled: false\noutput:\n  dir: decks\n",
        )
        .unwrap();
        assert_eq!(cfg.summarizer.max_bullets_per_slide, 7);
        assert_eq!(cfg.summarizer.max_chars_per_bullet, 80);
        assert!(!cfg.summarizer.generative.enabled);
        assert_eq!(cfg.summarizer.generative.model, "gemini-2.5-flash");
        assert_eq!(cfg.output.dir, PathBuf::from("decks"));
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_yaml("summarizer:\n  max_bullets_per_slide: 0\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_yaml("logging: [not, a, map]\n"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_and_present() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Config::load(&dir.path().join("longan.yaml")).unwrap();
        assert_eq!(missing.logging.level, "info");

        let path = dir.path().join("present.yaml");
        std::fs::write(&path, "logging:\n  level: debug\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().logging.level, "debug");

        std::fs::write(&path, "").unwrap();
        assert_eq!(Config::load(&path).unwrap().output.dir, PathBuf::from("output"));
    }

    #[test]
    fn test_profiles_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.yaml");
        std::fs::write(
            &path,
            "- name: sepia\n  font: Georgia\n  primary_color: \"#704214\"\n  secondary_color: \"#A0522D\"\n  title_size: 40\n  subtitle_size: 20\n  content_size: 18\n",
        )
        .unwrap();
        let cfg = Config {
            profiles_file: Some(path),
            ..Config::default()
        };
        let profiles = cfg.profiles().unwrap();
        assert_eq!(profiles.get("sepia").font, "Georgia");
        assert_eq!(profiles.len(), 4);
    }
}
