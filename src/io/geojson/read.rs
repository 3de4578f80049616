use serde_json::Value;

use crate::{
    ParseError,
    feature::{Feature, Geometry, GeometryType, Position, Properties, close_ring},
    io::{Format, ParsedData},
};

/// Read GeoJSON text: a FeatureCollection, a Feature, a bare geometry or an
/// array of features.
pub(crate) fn read_geojson(text: &str) -> Result<ParsedData, ParseError> {
    let value: Value = serde_json::from_str(text).map_err(|e| ParseError::syntax(Format::GeoJson, e))?;
    let mut features = Vec::new();
    let mut issues = Vec::new();
    read_document(&value, &mut features, &mut issues)?;
    Ok(ParsedData::single(features, issues))
}

/// Collect the features of a GeoJSON document. Malformed members of a
/// collection are recorded in `issues`; a malformed top-level object fails.
pub(crate) fn read_document(value: &Value, features: &mut Vec<Feature>, issues: &mut Vec<String>) -> Result<(), ParseError> {
    match value {
        Value::Array(items) => read_feature_list(items, features, issues),
        Value::Object(object) => match object.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => {
                let items = object.get("features").and_then(Value::as_array)
                    .ok_or_else(|| ParseError::structure(Format::GeoJson, "FeatureCollection without a `features` array"))?;
                read_feature_list(items, features, issues);
            }
            Some("Feature") => features.extend(read_feature(value)?),
            Some(ty) if GeometryType::from_geojson_type(ty).is_some() => {
                features.extend(Feature::explode(read_geometry(value)?, Properties::new()));
            }
            Some(ty) => return Err(ParseError::structure(Format::GeoJson, format!("unknown type `{ty}`"))),
            None => return Err(ParseError::structure(Format::GeoJson, "object has no `type` member")),
        },
        _ => return Err(ParseError::structure(Format::GeoJson, "expected a JSON object or array")),
    }
    Ok(())
}

fn read_feature_list(items: &[Value], features: &mut Vec<Feature>, issues: &mut Vec<String>) {
    for (idx, item) in items.iter().enumerate() {
        match read_feature(item) {
            Ok(parsed) => features.extend(parsed),
            Err(e) => issues.push(format!("feature {}: {}", idx + 1, e)),
        }
    }
}

/// Read one GeoJSON Feature. A null geometry yields no feature; a
/// GeometryCollection yields one feature per member.
pub(crate) fn read_feature(value: &Value) -> Result<Vec<Feature>, ParseError> {
    let object = value.as_object()
        .ok_or_else(|| ParseError::structure(Format::GeoJson, "feature is not an object"))?;

    let properties = match object.get("properties") {
        Some(Value::Object(props)) => Properties::from_json_object(props),
        None | Some(Value::Null) => Properties::new(),
        Some(_) => return Err(ParseError::structure(Format::GeoJson, "`properties` must be an object")),
    };

    match object.get("geometry") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(geometry) => Ok(Feature::explode(read_geometry(geometry)?, properties)),
    }
}

/// Decode a GeoJSON geometry object.
pub(crate) fn read_geometry(value: &Value) -> Result<Geometry, ParseError> {
    let ty = value.get("type").and_then(Value::as_str)
        .ok_or_else(|| ParseError::Geometry("geometry has no `type`".into()))?;
    let ty = GeometryType::from_geojson_type(ty)
        .ok_or_else(|| ParseError::Geometry(format!("unknown geometry type `{ty}`")))?;

    let coords = || value.get("coordinates")
        .ok_or_else(|| ParseError::Geometry(format!("{ty} without `coordinates`")));
    match ty {
        GeometryType::Point => Ok(Geometry::Point(read_position(coords()?)?)),
        GeometryType::LineString => Ok(Geometry::LineString(read_line(coords()?)?)),
        GeometryType::Polygon => Ok(Geometry::Polygon(read_rings(coords()?)?)),
        GeometryType::MultiPoint => Ok(Geometry::MultiPoint(read_positions(coords()?)?)),
        GeometryType::MultiLineString => {
            let lines = as_array(coords()?)?.iter().map(read_line).collect::<Result<_, _>>()?;
            Ok(Geometry::MultiLineString(lines))
        }
        GeometryType::MultiPolygon => {
            let polygons = as_array(coords()?)?.iter().map(read_rings).collect::<Result<_, _>>()?;
            Ok(Geometry::MultiPolygon(polygons))
        }
        GeometryType::GeometryCollection => {
            let members = value.get("geometries").and_then(Value::as_array)
                .ok_or_else(|| ParseError::Geometry("GeometryCollection without `geometries`".into()))?;
            members.iter().map(read_geometry).collect::<Result<_, _>>().map(Geometry::GeometryCollection)
        }
    }
}

/// `[lon, lat]` or `[lon, lat, alt]`.
pub(crate) fn read_position(value: &Value) -> Result<Position, ParseError> {
    let coords = as_array(value)?;
    if coords.len() < 2 {
        return Err(ParseError::Geometry(format!("position needs at least 2 numbers, got {}", coords.len())));
    }
    let number = |v: &Value| v.as_f64()
        .ok_or_else(|| ParseError::Geometry(format!("coordinate must be a number, got {v}")));
    let position = match coords.get(2) {
        Some(alt) if !alt.is_null() => Position::with_alt(number(&coords[0])?, number(&coords[1])?, number(alt)?),
        _ => Position::new(number(&coords[0])?, number(&coords[1])?),
    };
    if !position.is_finite() {
        return Err(ParseError::Geometry("coordinates must be finite".into()));
    }
    Ok(position)
}

fn read_positions(value: &Value) -> Result<Vec<Position>, ParseError> {
    as_array(value)?.iter().map(read_position).collect()
}

fn read_line(value: &Value) -> Result<Vec<Position>, ParseError> {
    let line = read_positions(value)?;
    if line.len() < 2 {
        return Err(ParseError::Geometry(format!("line needs at least 2 positions, got {}", line.len())));
    }
    Ok(line)
}

/// Polygon rings, exterior first; open rings are closed.
fn read_rings(value: &Value) -> Result<Vec<Vec<Position>>, ParseError> {
    let mut rings = as_array(value)?.iter().map(read_positions).collect::<Result<Vec<_>, _>>()?;
    if rings.is_empty() {
        return Err(ParseError::Geometry("polygon without rings".into()));
    }
    if let Some(ring) = rings.iter().find(|r| r.len() < 3) {
        return Err(ParseError::Geometry(format!("ring needs at least 3 positions, got {}", ring.len())));
    }
    rings.iter_mut().for_each(close_ring);
    Ok(rings)
}

fn as_array(value: &Value) -> Result<&Vec<Value>, ParseError> {
    value.as_array().ok_or_else(|| ParseError::Geometry(format!("expected an array, got {value}")))
}
