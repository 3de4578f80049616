//! GeoJSON reading and writing operations.

mod read;
mod write;

pub(crate) use read::*;
pub use write::{feature_to_geojson, features_to_geojson, geometry_to_geojson};
pub(crate) use write::LAYER_OPTIONS_KEY;
