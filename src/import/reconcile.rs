use crate::{
    ImportConfig, ReconcileError,
    io::ParsedLayer,
    layer::{LayerId, LayerSet},
};

use super::{ImportMode, ImportTarget};

/// What a successful reconciliation changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub created_layers: Vec<LayerId>,
    pub features_added: usize,
}

/// Merge parsed layers into `layers` according to `target`.
///
/// All checks run before the first mutation, so on `Err` the layer set is
/// untouched. A zero-feature parse never creates or modifies a layer.
pub fn reconcile(
    layers: &mut LayerSet,
    target: ImportTarget,
    parsed: Vec<ParsedLayer>,
    layer_name: Option<&str>,
    config: &ImportConfig,
) -> Result<Reconciliation, ReconcileError> {
    let features_added: usize = parsed.iter().map(|l| l.features.len()).sum();
    if let ImportTarget::ExistingLayer { id, .. } = target {
        if !layers.contains(id) {
            return Err(ReconcileError::UnknownLayer(id));
        }
    }
    if features_added == 0 {
        return Err(ReconcileError::NothingToImport);
    }

    let created_layers = match target {
        ImportTarget::NewLayer => create_layers(layers, parsed, layer_name, config),
        ImportTarget::ExistingLayer { id, mode } => {
            let layer = layers.get_mut(id).ok_or(ReconcileError::UnknownLayer(id))?;
            let features = parsed.into_iter().flat_map(|l| l.features).collect();
            match mode {
                ImportMode::Append => layer.append(features),
                ImportMode::Replace => layer.replace(features),
            }
            log::info!("[import] {:?} {} features into layer {} ({} total)", mode, features_added, id, layer.len());
            Vec::new()
        }
    };

    Ok(Reconciliation { created_layers, features_added })
}

/// One new layer per parsed layer. An explicit name applies to single-layer
/// imports, and to unnamed layers of a multi-layer document.
fn create_layers(
    layers: &mut LayerSet,
    parsed: Vec<ParsedLayer>,
    layer_name: Option<&str>,
    config: &ImportConfig,
) -> Vec<LayerId> {
    let single = parsed.len() == 1;
    let mut created = Vec::with_capacity(parsed.len());
    for source in parsed {
        let name = match (layer_name, source.name) {
            (Some(explicit), _) if single => explicit.to_string(),
            (_, Some(own)) => own,
            (Some(explicit), None) => explicit.to_string(),
            (None, None) => format!("{} {}", config.default_layer_name, layers.len() + 1),
        };
        let id = layers.create(name, source.options);
        if let Some(layer) = layers.get_mut(id) {
            log::info!("[import] new layer {} \"{}\" with {} features", id, layer.name(), source.features.len());
            layer.append(source.features);
        }
        created.push(id);
    }
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{Feature, Geometry, Position, Properties};
    use serde_json::{Map, json};

    fn point(lon: f64, lat: f64) -> Feature {
        Feature::new(Geometry::Point(Position::new(lon, lat)), Properties::new())
    }

    fn parsed(features: Vec<Feature>) -> Vec<ParsedLayer> {
        vec![ParsedLayer { features, ..ParsedLayer::default() }]
    }

    fn layers_with(features: Vec<Feature>) -> (LayerSet, LayerId) {
        let mut layers = LayerSet::new();
        let id = layers.create("Existing", Map::new());
        layers.get_mut(id).unwrap().append(features);
        (layers, id)
    }

    #[test]
    fn new_layer_is_distinct_and_selectable() {
        let (mut layers, existing) = layers_with(vec![point(0.0, 0.0)]);
        let config = ImportConfig::default();
        let result = reconcile(&mut layers, ImportTarget::NewLayer, parsed(vec![point(1.0, 1.0), point(2.0, 2.0)]), None, &config).unwrap();

        let created = result.created_layers[0];
        assert_ne!(created, existing);
        assert_eq!(result.features_added, 2);
        assert_eq!(layers.get(created).unwrap().features(), &[point(1.0, 1.0), point(2.0, 2.0)]);
        assert_eq!(layers.get(created).unwrap().name(), "Layer 2");
        assert!(layers.choices().iter().any(|(id, _)| *id == created));
    }

    #[test]
    fn append_puts_new_features_last() {
        let (mut layers, id) = layers_with(vec![point(0.0, 0.0)]);
        let result = reconcile(&mut layers, ImportTarget::append_to(id), parsed(vec![point(1.0, 1.0)]), None, &ImportConfig::default()).unwrap();
        assert!(result.created_layers.is_empty());
        assert_eq!(layers.len(), 1);
        assert_eq!(layers.get(id).unwrap().features(), &[point(0.0, 0.0), point(1.0, 1.0)]);
    }

    #[test]
    fn replace_drops_previous_features() {
        let (mut layers, id) = layers_with(vec![point(0.0, 0.0), point(5.0, 5.0)]);
        reconcile(&mut layers, ImportTarget::replace(id), parsed(vec![point(1.0, 1.0)]), None, &ImportConfig::default()).unwrap();
        assert_eq!(layers.get(id).unwrap().features(), &[point(1.0, 1.0)]);
    }

    #[test]
    fn nothing_parsed_changes_nothing() {
        let config = ImportConfig::default();
        let (mut layers, id) = layers_with(vec![point(0.0, 0.0)]);
        for target in [ImportTarget::NewLayer, ImportTarget::append_to(id), ImportTarget::replace(id)] {
            let err = reconcile(&mut layers, target, parsed(Vec::new()), None, &config).unwrap_err();
            assert_eq!(err, ReconcileError::NothingToImport);
        }
        assert_eq!(layers.len(), 1);
        assert_eq!(layers.get(id).unwrap().len(), 1);
    }

    #[test]
    fn unknown_target_is_rejected_before_mutation() {
        let (mut layers, _) = layers_with(Vec::new());
        let missing = LayerId::new(99);
        let err = reconcile(&mut layers, ImportTarget::replace(missing), parsed(vec![point(1.0, 1.0)]), None, &ImportConfig::default()).unwrap_err();
        assert_eq!(err, ReconcileError::UnknownLayer(missing));
        assert_eq!(layers.feature_count(), 0);
    }

    #[test]
    fn multi_layer_documents() {
        let mut options = Map::new();
        options.insert("color".into(), json!("blue"));
        let source = vec![
            ParsedLayer { name: Some("Cities".into()), options, features: vec![point(1.0, 1.0)] },
            ParsedLayer { name: None, options: Map::new(), features: vec![point(2.0, 2.0), point(3.0, 3.0)] },
        ];

        let mut layers = LayerSet::new();
        let result = reconcile(&mut layers, ImportTarget::NewLayer, source.clone(), None, &ImportConfig::default()).unwrap();
        assert_eq!(result.created_layers.len(), 2);
        let names: Vec<_> = layers.iter().map(|l| l.name().to_string()).collect();
        assert_eq!(names, vec!["Cities", "Layer 2"]);
        assert_eq!(layers.get(result.created_layers[0]).unwrap().options().get("color"), Some(&json!("blue")));

        let target = result.created_layers[0];
        reconcile(&mut layers, ImportTarget::append_to(target), source, None, &ImportConfig::default()).unwrap();
        assert_eq!(layers.get(target).unwrap().len(), 4);
        assert_eq!(layers.len(), 2);
    }

    #[test]
    fn explicit_name_wins_for_single_layer() {
        let mut layers = LayerSet::new();
        let source = vec![ParsedLayer { name: Some("From file".into()), features: vec![point(1.0, 1.0)], ..ParsedLayer::default() }];
        let result = reconcile(&mut layers, ImportTarget::NewLayer, source, Some("Mine"), &ImportConfig::default()).unwrap();
        assert_eq!(layers.get(result.created_layers[0]).unwrap().name(), "Mine");
    }
}
