use serde_json::{Map, Value};

use super::LayerSet;

/// State owned by the map-session controller: map-level options and the
/// layer collection imports are reconciled into.
#[derive(Debug, Clone)]
pub struct MapSession {
    options: Map<String, Value>,
    layers: LayerSet,
    locale: String,
}

impl Default for MapSession {
    fn default() -> Self {
        Self { options: Map::new(), layers: LayerSet::new(), locale: "en".to_string() }
    }
}

impl MapSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub(crate) fn from_parts(options: Map<String, Value>, layers: LayerSet) -> Self {
        Self { options, layers, ..Self::default() }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.options
    }

    /// Map title, if set.
    pub fn name(&self) -> Option<&str> {
        self.options.get("name").and_then(Value::as_str)
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerSet {
        &mut self.layers
    }

    /// Overwrite map options with `incoming`, key by key.
    pub(crate) fn merge_options(&mut self, incoming: Map<String, Value>) {
        for (key, value) in incoming {
            self.options.insert(key, value);
        }
    }
}
