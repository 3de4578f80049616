//! The import pipeline: directive in, parsed features reconciled into the
//! session's layers, structured outcome out.

mod directive;
mod pipeline;
mod reconcile;
mod report;

pub use directive::{ImportDirective, ImportMode, ImportTarget};
pub use pipeline::run_import;
pub use reconcile::{Reconciliation, reconcile};
pub use report::{Alert, ImportError, ImportOutcome, ImportReport, Level, Stage};
