//! Error conversion implementations.
//!
//! Folds package-layer errors into the unified Error type, and offers the
//! helpers used at the transplant boundary to classify a failure as fatal.

use super::types::Error;
use crate::ooxml::error::OoxmlError;
use std::path::Path;

impl From<crate::ooxml::opc::error::OpcError> for Error {
    fn from(err: crate::ooxml::opc::error::OpcError) -> Self {
        Error::Ooxml(OoxmlError::Opc(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Service(format!("malformed reply: {}", err))
    }
}

impl Error {
    /// Re-label an open failure of a deck or document at `path` as `NotFound`.
    pub fn not_found<P: AsRef<Path>>(path: P, cause: impl std::fmt::Display) -> Self {
        Error::NotFound(format!("{}: {}", path.as_ref().display(), cause))
    }

    /// Re-label a persist failure at `path` as `Write`.
    pub fn write<P: AsRef<Path>>(path: P, cause: impl std::fmt::Display) -> Self {
        Error::Write(format!("{}: {}", path.as_ref().display(), cause))
    }

    /// Whether this error aborts a transplant call.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::Write(_) | Error::InvalidTemplate(_)
        )
    }
}
