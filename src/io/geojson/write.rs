use serde_json::{Value, json};

use crate::{
    feature::{Feature, Geometry, Position},
    layer::DataLayer,
};

/// Key under which layer settings travel inside a FeatureCollection.
pub(crate) const LAYER_OPTIONS_KEY: &str = "_umap_options";

impl DataLayer {
    /// Serialize the layer for storage: a GeoJSON FeatureCollection carrying
    /// the layer name and display options in `_umap_options`.
    pub fn to_geojson(&self) -> Value {
        let mut options = self.options().clone();
        options.insert("name".to_string(), json!(self.name()));
        let mut collection = features_to_geojson(self.features());
        if let Some(object) = collection.as_object_mut() {
            object.insert(LAYER_OPTIONS_KEY.to_string(), Value::Object(options));
        }
        collection
    }
}

/// Write features as a GeoJSON FeatureCollection.
pub fn features_to_geojson(features: &[Feature]) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": features.iter().map(feature_to_geojson).collect::<Vec<_>>(),
    })
}

pub fn feature_to_geojson(feature: &Feature) -> Value {
    json!({
        "type": "Feature",
        "geometry": geometry_to_geojson(feature.geometry()),
        "properties": feature.properties().to_json(),
    })
}

pub fn geometry_to_geojson(geometry: &Geometry) -> Value {
    let ty = geometry.geometry_type().to_str();
    match geometry {
        Geometry::GeometryCollection(members) => json!({
            "type": ty,
            "geometries": members.iter().map(geometry_to_geojson).collect::<Vec<_>>(),
        }),
        Geometry::Point(p) => json!({"type": ty, "coordinates": position(p)}),
        Geometry::LineString(line) | Geometry::MultiPoint(line) => json!({"type": ty, "coordinates": positions(line)}),
        Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => json!({
            "type": ty,
            "coordinates": rings.iter().map(|r| positions(r)).collect::<Vec<_>>(),
        }),
        Geometry::MultiPolygon(polygons) => json!({
            "type": ty,
            "coordinates": polygons.iter()
                .map(|rings| rings.iter().map(|r| positions(r)).collect::<Vec<_>>())
                .collect::<Vec<_>>(),
        }),
    }
}

fn position(p: &Position) -> Value {
    match p.alt {
        Some(alt) => json!([p.lon, p.lat, alt]),
        None => json!([p.lon, p.lat]),
    }
}

fn positions(line: &[Position]) -> Value {
    Value::Array(line.iter().map(position).collect())
}
