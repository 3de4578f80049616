use std::{collections::BTreeMap, fmt, str::FromStr};

use geo::{BoundingRect, GeometryCollection, Rect};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::feature::{Feature, GeometryType};

/// Session-scoped identifier of a data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LayerId(u32);

impl LayerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LayerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(LayerId)
    }
}

/// A named, ordered collection of features plus its display settings.
/// Duplicate features are allowed.
#[derive(Debug, Clone)]
pub struct DataLayer {
    id: LayerId,
    name: String,
    options: Map<String, Value>,
    features: Vec<Feature>,
}

impl DataLayer {
    pub(crate) fn new(id: LayerId, name: String, options: Map<String, Value>) -> Self {
        Self { id, name, options, features: Vec::new() }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Display settings (colour, icon, popup template, ...), opaque here.
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.options
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of features per geometry type.
    pub fn count_by_type(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for feature in &self.features {
            *counts.entry(feature.geometry_type().to_str()).or_default() += 1;
        }
        counts
    }

    /// Number of features drawn as markers (points).
    pub fn marker_count(&self) -> usize {
        self.features.iter()
            .filter(|f| matches!(f.geometry_type(), GeometryType::Point | GeometryType::MultiPoint))
            .count()
    }

    /// Bounding box of all features in lon/lat, `None` when empty.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let geoms = self.features.iter().map(|f| f.geometry().to_geo()).collect::<Vec<_>>();
        GeometryCollection::new_from(geoms).bounding_rect()
    }

    pub(crate) fn append(&mut self, features: Vec<Feature>) {
        self.features.extend(features);
    }

    pub(crate) fn replace(&mut self, features: Vec<Feature>) {
        self.features = features;
    }
}
