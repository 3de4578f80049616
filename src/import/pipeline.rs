use crate::{ImportConfig, layer::MapSession};

use super::{ImportDirective, ImportOutcome, ImportReport, Stage, reconcile};

/// Run one import end to end: parse the directive's text, then reconcile
/// the features into the session's layers.
///
/// Never fails. Parse and reconcile errors end up in the outcome's
/// `errors`, and the session is left exactly as it was when they occur.
pub fn run_import(directive: &ImportDirective, session: &mut MapSession, config: &ImportConfig) -> ImportOutcome {
    let mut report = ImportReport::new();
    log::info!("[import] importing {} bytes of {} data", directive.source_text.len(), directive.format);

    let parsed = match directive.format.parse(&directive.source_text, config) {
        Ok(parsed) => parsed,
        Err(e) => {
            report.error(Stage::Parse, e.to_string());
            return ImportOutcome { errors: report.into_errors(), ..ImportOutcome::default() };
        }
    };
    for issue in parsed.issues {
        report.warning(Stage::Parse, issue);
    }

    let result = reconcile(
        session.layers_mut(),
        directive.target,
        parsed.layers,
        directive.layer_name.as_deref(),
        config,
    );
    match result {
        Ok(done) => {
            if let Some(options) = parsed.map_options {
                session.merge_options(options);
            }
            ImportOutcome {
                created_layers: done.created_layers,
                features_added: done.features_added,
                errors: report.into_errors(),
            }
        }
        Err(e) => {
            report.error(Stage::Reconcile, e.to_string());
            ImportOutcome { errors: report.into_errors(), ..ImportOutcome::default() }
        }
    }
}

impl MapSession {
    /// Import into this session with the default configuration.
    pub fn import(&mut self, directive: &ImportDirective) -> ImportOutcome {
        run_import(directive, self, &ImportConfig::default())
    }
}
