//! Named template profiles.
//!
//! A profile is the font and color scheme the renderer applies to every
//! slide. Three profiles are built in; more can be loaded from a YAML list:
//!
//! ```yaml
//! - name: corporate
//!   font: Segoe UI
//!   primary_color: "#C8102E"
//!   secondary_color: "#333333"
//!   title_size: 40
//!   subtitle_size: 22
//!   content_size: 18
//! ```

use crate::common::{Error, RGBColor, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Name of the profile used for unknown names.
pub const FALLBACK_PROFILE: &str = "minimal";

/// Font family, colors and point sizes applied by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub font: String,
    pub primary_color: RGBColor,
    pub secondary_color: RGBColor,
    /// Point sizes
    pub title_size: f64,
    pub subtitle_size: f64,
    pub content_size: f64,
}

impl Profile {
    fn builtin(
        name: &str,
        font: &str,
        primary: RGBColor,
        secondary: RGBColor,
        sizes: (f64, f64, f64),
    ) -> Self {
        Self {
            name: name.to_string(),
            font: font.to_string(),
            primary_color: primary,
            secondary_color: secondary,
            title_size: sizes.0,
            subtitle_size: sizes.1,
            content_size: sizes.2,
        }
    }

    pub fn professional() -> Self {
        Self::builtin(
            "professional",
            "Calibri",
            RGBColor::new(0x0B, 0x63, 0xB8),
            RGBColor::new(0x1F, 0x3A, 0x93),
            (44.0, 24.0, 20.0),
        )
    }

    pub fn academic() -> Self {
        Self::builtin(
            "academic",
            "Times New Roman",
            RGBColor::new(0x34, 0x56, 0x8B),
            RGBColor::new(0x6B, 0x7B, 0x8C),
            (40.0, 20.0, 18.0),
        )
    }

    pub fn minimal() -> Self {
        Self::builtin(
            FALLBACK_PROFILE,
            "Arial",
            RGBColor::new(0x00, 0x00, 0x00),
            RGBColor::new(0x66, 0x66, 0x66),
            (42.0, 20.0, 18.0),
        )
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("profile without a name".to_string()));
        }
        if self.font.trim().is_empty() {
            return Err(Error::Config(format!("profile '{}' has no font", self.name)));
        }
        for (field, size) in [
            ("title_size", self.title_size),
            ("subtitle_size", self.subtitle_size),
            ("content_size", self.content_size),
        ] {
            if !(size > 0.0 && size <= 400.0) {
                return Err(Error::Config(format!(
                    "profile '{}': {} must be within (0, 400] pt, got {}",
                    self.name, field, size
                )));
            }
        }
        Ok(())
    }
}

/// Profiles by name, with a fallback for unknown names.
///
/// # Example
///
/// ```rust
/// use longan::profile::Profiles;
///
/// let profiles = Profiles::builtin();
/// assert_eq!(profiles.get("Academic").font, "Times New Roman");
/// assert_eq!(profiles.get("no-such-profile").name, "minimal");
/// ```
#[derive(Debug, Clone)]
pub struct Profiles {
    profiles: Vec<Profile>,
}

impl Profiles {
    /// The three built-in profiles.
    pub fn builtin() -> Self {
        Self {
            profiles: vec![Profile::professional(), Profile::academic(), Profile::minimal()],
        }
    }

    /// Built-ins extended with the profiles listed in a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("reading {}: {}", path.display(), e)))?;
        let mut profiles = Self::builtin();
        profiles.extend_from_yaml(&raw)?;
        debug!(path = %path.display(), count = profiles.len(), "profiles loaded");
        Ok(profiles)
    }

    /// Add or replace profiles from a YAML list.
    pub fn extend_from_yaml(&mut self, yaml: &str) -> Result<()> {
        let extra: Vec<Profile> = serde_saphyr::from_str(yaml)
            .map_err(|e| Error::Config(format!("parsing profiles: {}", e)))?;
        for profile in extra {
            profile.validate()?;
            self.insert(profile);
        }
        Ok(())
    }

    /// Add a profile, replacing one with the same name.
    pub fn insert(&mut self, profile: Profile) {
        match self.position(&profile.name) {
            Some(index) => self.profiles[index] = profile,
            None => self.profiles.push(profile),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.profiles
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Whether `name` names a known profile.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// The profile called `name` (case-insensitive), else the fallback profile.
    pub fn get(&self, name: &str) -> &Profile {
        self.position(name)
            .or_else(|| self.position(FALLBACK_PROFILE))
            .map(|index| &self.profiles[index])
            .unwrap_or(&self.profiles[0])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for Profiles {
    fn default() -> Self {
        Self::builtin()
    }
}
