use std::fmt;

use serde::Serialize;

use crate::layer::LayerId;

/// Pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Parse,
    Reconcile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
}

impl Stage {
    pub fn to_str(&self) -> &'static str {
        match self {
            Stage::Parse => "parse",
            Stage::Reconcile => "reconcile",
        }
    }
}

impl Level {
    pub fn to_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportError {
    pub stage: Stage,
    pub level: Level,
    pub message: String,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}] {}", self.stage.to_str(), self.level.to_str(), self.message)
    }
}

/// A single dismissible notification summarizing an import's failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub level: Level,
    pub message: String,
}

/// Ordered list of errors gathered while an import runs.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    errors: Vec<ImportError>,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(ImportError { stage, level: Level::Error, message: message.into() });
    }

    pub fn warning(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(ImportError { stage, level: Level::Warning, message: message.into() });
    }

    pub fn push(&mut self, error: ImportError) {
        match error.level {
            Level::Error => log::warn!("[import] {}", error),
            Level::Warning => log::info!("[import] {}", error),
        }
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[ImportError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| e.level == Level::Error)
    }

    pub fn alert(&self) -> Option<Alert> {
        alert_for(&self.errors)
    }

    pub fn into_errors(self) -> Vec<ImportError> {
        self.errors
    }
}

/// Result of one import operation. Failure paths populate `errors` and
/// leave the other fields empty; they never panic or return `Err`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportOutcome {
    /// Layers created by this import, in creation order. Empty for imports
    /// into an existing layer.
    pub created_layers: Vec<LayerId>,
    pub features_added: usize,
    pub errors: Vec<ImportError>,
}

impl ImportOutcome {
    /// The first created layer, if any.
    pub fn created_layer(&self) -> Option<LayerId> {
        self.created_layers.first().copied()
    }

    /// True when no `Error`-level entry was reported. Warnings about
    /// skipped items do not make an import fail.
    pub fn is_success(&self) -> bool {
        !self.errors.iter().any(|e| e.level == Level::Error)
    }

    pub fn alert(&self) -> Option<Alert> {
        alert_for(&self.errors)
    }
}

/// Lead with the first error-level entry (falling back to the first
/// warning) and count the rest.
fn alert_for(errors: &[ImportError]) -> Option<Alert> {
    let first = errors.iter().min_by_key(|e| e.level)?;
    let message = match errors.len() - 1 {
        0 => first.message.clone(),
        more => format!("{} (and {} more)", first.message, more),
    };
    Some(Alert { level: first.level, message })
}
