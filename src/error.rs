//! Error taxonomy for the import pipeline.
//!
//! Sanitization is total and has no error type. Parse and reconcile failures
//! are recovered by the pipeline and turned into [`crate::ImportError`]s.

use thiserror::Error;

use crate::{io::Format, layer::LayerId};

/// Failure to turn raw text into features.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input was empty or whitespace only.
    #[error("nothing to import: the input is empty")]
    Empty,

    /// The text is not well-formed for the declared format.
    #[error("invalid {format} data: {reason}")]
    Syntax { format: Format, reason: String },

    /// The document parsed but its structure is not what the format expects.
    #[error("unsupported {format} document: {reason}")]
    Structure { format: Format, reason: String },

    /// CSV header has no recognizable latitude/longitude columns.
    #[error("cannot find latitude and longitude columns in CSV header [{}]", headers.join(", "))]
    MissingCoordinateColumns { headers: Vec<String> },

    /// A geometry could not be decoded.
    #[error("invalid geometry: {0}")]
    Geometry(String),
}

impl ParseError {
    pub(crate) fn syntax(format: Format, reason: impl ToString) -> Self {
        Self::Syntax { format, reason: reason.to_string() }
    }

    pub(crate) fn structure(format: Format, reason: impl ToString) -> Self {
        Self::Structure { format, reason: reason.to_string() }
    }
}

/// Failure to merge parsed features into the layer set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The directive names a layer that is not part of the session.
    #[error("target layer {0} does not exist")]
    UnknownLayer(LayerId),

    /// The parser produced zero features; no layer is created or modified.
    #[error("no features found in the imported data")]
    NothingToImport,
}
