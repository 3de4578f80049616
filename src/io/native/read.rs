use serde_json::{Map, Value};

use crate::{
    ImportConfig, ParseError,
    io::{Format, ParsedData, ParsedLayer, geojson},
    layer::{LayerSet, MapSession},
};

/// Older documents keep layer settings under this key.
const LEGACY_LAYER_OPTIONS_KEY: &str = "_storage";
/// Map option holding the initial view center.
pub(crate) const CENTER_KEY: &str = "center";

/// Read a native map document. Map-identity keys listed in the config are
/// dropped from the map options, and layer ids from every layer.
pub(crate) fn read_native(text: &str, config: &ImportConfig) -> Result<ParsedData, ParseError> {
    let value: Value = serde_json::from_str(text).map_err(|e| ParseError::syntax(Format::Native, e))?;
    let object = value.as_object()
        .ok_or_else(|| ParseError::structure(Format::Native, "expected a JSON object"))?;
    if let Some(ty) = object.get("type").and_then(Value::as_str) {
        if ty != "umap" {
            return Err(ParseError::structure(Format::Native, format!("unexpected document type `{ty}`")));
        }
    }
    let layers = object.get("layers").and_then(Value::as_array)
        .ok_or_else(|| ParseError::structure(Format::Native, "document has no `layers` array"))?;

    let mut map_options = object.get("properties").and_then(Value::as_object).cloned().unwrap_or_default();
    strip_identity(&mut map_options, config);
    if let Some(center) = object.get("geometry").filter(|g| g.get("type").and_then(Value::as_str) == Some("Point")) {
        map_options.insert(CENTER_KEY.to_string(), center.clone());
    }

    let mut parsed_layers = Vec::with_capacity(layers.len());
    let mut issues = Vec::new();
    for (idx, layer) in layers.iter().enumerate() {
        let mut layer_issues = Vec::new();
        match read_layer(layer, config, &mut layer_issues) {
            Ok(parsed) => parsed_layers.push(parsed),
            Err(e) => issues.push(format!("layer {}: {}", idx + 1, e)),
        }
        issues.extend(layer_issues.into_iter().map(|issue| format!("layer {}, {}", idx + 1, issue)));
    }

    Ok(ParsedData { layers: parsed_layers, map_options: Some(map_options), issues })
}

fn read_layer(layer: &Value, config: &ImportConfig, issues: &mut Vec<String>) -> Result<ParsedLayer, ParseError> {
    let object = layer.as_object()
        .ok_or_else(|| ParseError::structure(Format::Native, "layer is not an object"))?;
    let mut options = object.get(geojson::LAYER_OPTIONS_KEY)
        .or_else(|| object.get(LEGACY_LAYER_OPTIONS_KEY))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    // A layer id only means something in the map it came from.
    options.remove("id");
    strip_identity(&mut options, config);
    let name = match options.remove("name") {
        Some(Value::String(name)) => Some(name),
        _ => None,
    };

    let mut features = Vec::new();
    geojson::read_document(layer, &mut features, issues)?;
    Ok(ParsedLayer { name, options, features })
}

fn strip_identity(options: &mut Map<String, Value>, config: &ImportConfig) {
    options.retain(|key, _| !config.is_identity_key(key));
}

impl MapSession {
    /// Load a session previously written with [`MapSession::to_native`].
    /// Unlike an import, the map's own options are kept as they are.
    pub fn from_native(text: &str) -> Result<MapSession, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::Empty);
        }
        let keep_identity = ImportConfig { identity_keys: Vec::new(), ..ImportConfig::default() };
        let parsed = read_native(text, &keep_identity)?;
        if let Some(issue) = parsed.issues.first() {
            return Err(ParseError::structure(Format::Native, issue));
        }

        let mut layers = LayerSet::new();
        for (idx, parsed_layer) in parsed.layers.into_iter().enumerate() {
            let name = parsed_layer.name.unwrap_or_else(|| format!("{} {}", keep_identity.default_layer_name, idx + 1));
            let id = layers.create(name, parsed_layer.options);
            if let Some(layer) = layers.get_mut(id) {
                layer.append(parsed_layer.features);
            }
        }
        Ok(MapSession::from_parts(parsed.map_options.unwrap_or_default(), layers))
    }
}
