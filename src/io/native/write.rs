use serde_json::{Map, Value, json};

use super::read::CENTER_KEY;
use crate::layer::MapSession;

impl MapSession {
    /// Serialize the whole session as a native map document: map options as
    /// `properties`, the view center as `geometry`, then every layer as a
    /// FeatureCollection.
    pub fn to_native(&self) -> Value {
        let mut properties: Map<String, Value> = self.options().clone();
        let geometry = properties.remove(CENTER_KEY)
            .filter(|center| center.get("type").and_then(Value::as_str) == Some("Point"));
        json!({
            "type": "umap",
            "properties": properties,
            "geometry": geometry,
            "layers": self.layers().iter().map(|layer| layer.to_geojson()).collect::<Vec<_>>(),
        })
    }

    pub fn to_native_string(&self) -> String {
        self.to_native().to_string()
    }
}
