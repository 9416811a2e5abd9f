//! Per-item results of a transplant.
//!
//! A shape that fails to clone or a picture that fails to copy does not fail
//! the slide. Each such failure is kept as a [`ShapeError`] in a
//! [`BatchOutcome`] and surfaces in the [`TransplantReport`] as a count.
use serde::Serialize;
use thiserror::Error;

/// A recoverable failure on a single shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// A template shape could not be copied onto the output slide
    #[error("cannot clone shape '{name}': {reason}")]
    Clone { name: String, reason: String },

    /// An input picture could not be extracted or inserted
    #[error("cannot copy picture '{name}': {reason}")]
    Image { name: String, reason: String },
}

/// Successes and recorded failures of a batch of per-shape operations.
#[derive(Debug, Clone)]
pub struct BatchOutcome<T> {
    succeeded: Vec<T>,
    failed: Vec<ShapeError>,
}

impl<T> BatchOutcome<T> {
    pub fn new() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Record one result. Failures are logged as they are recorded.
    pub fn push(&mut self, result: Result<T, ShapeError>) {
        match result {
            Ok(value) => self.succeeded.push(value),
            Err(err) => {
                tracing::warn!(error = %err, "skipping shape");
                self.failed.push(err);
            },
        }
    }

    #[inline]
    pub fn succeeded(&self) -> &[T] {
        &self.succeeded
    }

    #[inline]
    pub fn failures(&self) -> &[ShapeError] {
        &self.failed
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Split into successes and failures.
    pub fn into_parts(self) -> (Vec<T>, Vec<ShapeError>) {
        (self.succeeded, self.failed)
    }
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<Result<T, ShapeError>> for BatchOutcome<T> {
    fn from_iter<I: IntoIterator<Item = Result<T, ShapeError>>>(iter: I) -> Self {
        let mut outcome = Self::new();
        for result in iter {
            outcome.push(result);
        }
        outcome
    }
}

/// What happened to one input slide.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SlideOutcome {
    pub input_index: usize,
    /// Template slide whose shapes were cloned
    pub template_index: usize,
    /// Whether the closing-slide path produced this slide
    pub final_slide: bool,
    pub shapes_cloned: usize,
    pub titles_set: usize,
    pub contents_set: usize,
    /// Input text with no content placeholder left to receive it
    pub dropped_contents: usize,
    pub placeholders_removed: usize,
    pub images_copied: usize,
    #[serde(serialize_with = "serialize_failures")]
    pub failures: Vec<ShapeError>,
}

fn serialize_failures<S: serde::Serializer>(
    failures: &[ShapeError],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(failures.iter().map(ToString::to_string))
}

/// Summary of a transplant call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransplantReport {
    pub slides_written: usize,
    pub slides: Vec<SlideOutcome>,
}

impl TransplantReport {
    /// Recoverable failures across all slides.
    pub fn failure_count(&self) -> usize {
        self.slides.iter().map(|s| s.failures.len()).sum()
    }

    pub fn dropped_contents(&self) -> usize {
        self.slides.iter().map(|s| s.dropped_contents).sum()
    }

    pub fn images_copied(&self) -> usize {
        self.slides.iter().map(|s| s.images_copied).sum()
    }
}
