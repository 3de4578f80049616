use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tunables of the import pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// CSV header names recognized as latitude (case-insensitive).
    pub lat_headers: Vec<String>,
    /// CSV header names recognized as longitude (case-insensitive).
    pub lon_headers: Vec<String>,
    /// Map-level keys of a native document that identify the source map and
    /// are never carried into the destination.
    pub identity_keys: Vec<String>,
    /// Prefix of generated layer names ("Layer 3").
    pub default_layer_name: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            lat_headers: vec!["lat".into(), "latitude".into()],
            lon_headers: vec!["lon".into(), "lng".into(), "long".into(), "longitude".into()],
            identity_keys: vec!["umap_id".into(), "id".into(), "uri".into()],
            default_layer_name: "Layer".into(),
        }
    }
}

impl ImportConfig {
    /// Reads an `ImportConfig` from a JSON file at `path`; missing fields take
    /// their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("[config] Failed to open config file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("[config] Failed to parse config file: {}", path.display()))
    }

    pub(crate) fn is_lat_header(&self, header: &str) -> bool {
        matches_any(&self.lat_headers, header)
    }

    pub(crate) fn is_lon_header(&self, header: &str) -> bool {
        matches_any(&self.lon_headers, header)
    }

    pub(crate) fn is_identity_key(&self, key: &str) -> bool {
        self.identity_keys.iter().any(|k| k == key)
    }
}

fn matches_any(names: &[String], header: &str) -> bool {
    let header = header.trim();
    names.iter().any(|n| n.eq_ignore_ascii_case(header))
}
