//! Format parsers and writers.
//!
//! Every input format lives in its own module and exposes one reader with
//! the same shape, `(&str) -> Result<ParsedData, ParseError>`; [`Format`]
//! maps the format tag to its reader. GeoJSON and native writers serve the
//! persistence side.
//!
//! - `geojson` - Feature/FeatureCollection/Geometry, plus the GeoJSON writer
//! - `csv` - delimited text with latitude/longitude columns
//! - `kml` - KML placemarks
//! - `gpx` - GPX waypoints, routes and tracks
//! - `osm` - Overpass OSM-JSON nodes and ways
//! - `native` - uMap map documents with several layers

mod csv;
mod format;
mod geojson;
mod gpx;
mod kml;
mod native;
mod osm;
mod xml;

use serde_json::{Map, Value};

use crate::feature::Feature;

pub use format::{Format, parse_features};
pub use geojson::{feature_to_geojson, features_to_geojson, geometry_to_geojson};

/// Output of one parser run.
#[derive(Debug, Clone, Default)]
pub struct ParsedData {
    /// Parsed layers; every format but the native one yields exactly one.
    pub layers: Vec<ParsedLayer>,
    /// Map-level options carried by a native document, identity fields
    /// already removed.
    pub map_options: Option<Map<String, Value>>,
    /// Items skipped without aborting the parse (bad row, bad feature).
    pub issues: Vec<String>,
}

/// Features of one source layer plus whatever the source says about it.
#[derive(Debug, Clone, Default)]
pub struct ParsedLayer {
    pub name: Option<String>,
    pub options: Map<String, Value>,
    pub features: Vec<Feature>,
}

impl ParsedData {
    pub(crate) fn single(features: Vec<Feature>, issues: Vec<String>) -> Self {
        Self {
            layers: vec![ParsedLayer { features, ..ParsedLayer::default() }],
            map_options: None,
            issues,
        }
    }

    pub fn feature_count(&self) -> usize {
        self.layers.iter().map(|l| l.features.len()).sum()
    }

    pub fn into_features(self) -> Vec<Feature> {
        self.layers.into_iter().flat_map(|l| l.features).collect()
    }
}
