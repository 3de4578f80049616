use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ImportConfig, ParseError, feature::Feature};

use super::{ParsedData, csv, geojson, gpx, kml, native, osm};

/// Input encodings the import pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    GeoJson,
    Kml,
    Gpx,
    Csv,
    /// Overpass OSM-JSON (`elements` array).
    Osm,
    /// Self-describing map document (uMap `.umap` files).
    #[serde(rename = "umap")]
    Native,
}

impl Format {
    pub fn all() -> [Format; 6] {
        [Format::GeoJson, Format::Kml, Format::Gpx, Format::Csv, Format::Osm, Format::Native]
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            Format::GeoJson => "geojson",
            Format::Kml => "kml",
            Format::Gpx => "gpx",
            Format::Csv => "csv",
            Format::Osm => "osm",
            Format::Native => "umap",
        }
    }

    /// Guess the format from a file name's extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "geojson" | "json" => Some(Format::GeoJson),
            "kml" => Some(Format::Kml),
            "gpx" => Some(Format::Gpx),
            "csv" | "tsv" => Some(Format::Csv),
            "osm" => Some(Format::Osm),
            "umap" => Some(Format::Native),
            _ => None,
        }
    }

    /// Parse `text` into features with this format's parser.
    pub fn parse(self, text: &str, config: &ImportConfig) -> Result<ParsedData, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::Empty);
        }
        let parsed = match self {
            Format::GeoJson => geojson::read_geojson(text)?,
            Format::Kml => kml::read_kml(text)?,
            Format::Gpx => gpx::read_gpx(text)?,
            Format::Csv => csv::read_csv(text, config)?,
            Format::Osm => osm::read_osm(text)?,
            Format::Native => native::read_native(text, config)?,
        };
        log::debug!(
            "[io::{}] parsed {} features in {} layers ({} skipped)",
            self, parsed.feature_count(), parsed.layers.len(), parsed.issues.len()
        );
        Ok(parsed)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "geojson" | "json" => Ok(Format::GeoJson),
            "kml" => Ok(Format::Kml),
            "gpx" => Ok(Format::Gpx),
            "csv" => Ok(Format::Csv),
            "osm" => Ok(Format::Osm),
            "umap" | "native" => Ok(Format::Native),
            _ => Err(format!("Unknown format: {}. Expected one of geojson, kml, gpx, csv, osm, umap", s)),
        }
    }
}

/// Parse `text` as `format` with the default configuration and return the
/// features of every parsed layer, in parse order.
pub fn parse_features(format: Format, text: &str) -> Result<Vec<Feature>, ParseError> {
    format.parse(text, &ImportConfig::default()).map(ParsedData::into_features)
}
