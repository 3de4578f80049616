use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::{
    ParseError,
    feature::{Feature, Geometry, Position, Properties},
    io::{Format, ParsedData},
};

/// Keys whose closed ways are still lines unless tagged `area=yes`.
const LINEAR_KEYS: [&str; 7] = ["highway", "barrier", "railway", "waterway", "power", "route", "aerialway"];

/// Read Overpass OSM-JSON. Tagged nodes and nodes not used by any way become
/// Points; ways become LineStrings, or Polygons when closed with area
/// semantics. Relations and unknown element types are skipped.
pub(crate) fn read_osm(text: &str) -> Result<ParsedData, ParseError> {
    let value: Value = serde_json::from_str(text).map_err(|e| ParseError::syntax(Format::Osm, e))?;
    let elements = value.get("elements").and_then(Value::as_array)
        .ok_or_else(|| ParseError::structure(Format::Osm, "expected an `elements` array"))?;

    let mut nodes: HashMap<i64, Position> = HashMap::new();
    let mut way_nodes: HashSet<i64> = HashSet::new();
    for element in elements {
        match element.get("type").and_then(Value::as_str) {
            Some("node") => {
                if let (Some(id), Ok(position)) = (element_id(element), node_position(element)) {
                    nodes.insert(id, position);
                }
            }
            Some("way") => way_nodes.extend(node_refs(element)),
            _ => {}
        }
    }

    let mut features = Vec::new();
    let mut issues = Vec::new();
    for element in elements {
        let ty = element.get("type").and_then(Value::as_str).unwrap_or("");
        let label = format!("{}/{}", ty, element.get("id").map(Value::to_string).unwrap_or_default());
        let result = match ty {
            "node" => read_node(element, &way_nodes),
            "way" => read_way(element, &nodes).map(Some),
            other => {
                log::debug!("[io::osm] skipping {} element", other);
                Ok(None)
            }
        };
        match result {
            Ok(Some(geometry)) => features.push(Feature::new(geometry, properties(element, &label))),
            Ok(None) => {}
            Err(e) => issues.push(format!("{label}: {e}")),
        }
    }

    Ok(ParsedData::single(features, issues))
}

fn read_node(element: &Value, way_nodes: &HashSet<i64>) -> Result<Option<Geometry>, ParseError> {
    let used_by_way = element_id(element).is_some_and(|id| way_nodes.contains(&id));
    if used_by_way && tags(element).is_none_or(Map::is_empty) {
        return Ok(None);
    }
    node_position(element).map(|p| Some(Geometry::Point(p)))
}

fn read_way(element: &Value, nodes: &HashMap<i64, Position>) -> Result<Geometry, ParseError> {
    let line = match element.get("geometry").and_then(Value::as_array) {
        Some(points) => points.iter().map(node_position).collect::<Result<Vec<_>, _>>()?,
        None => node_refs(element)
            .map(|id| nodes.get(&id).copied().ok_or_else(|| ParseError::Geometry(format!("unknown node {id}"))))
            .collect::<Result<Vec<_>, _>>()?,
    };
    if line.len() < 2 {
        return Err(ParseError::Geometry(format!("way needs at least 2 nodes, got {}", line.len())));
    }

    let closed = line.len() >= 4 && line.first().zip(line.last()).is_some_and(|(a, b)| a.same_location(b));
    if closed && is_area(tags(element)) {
        Ok(Geometry::polygon(vec![line]))
    } else {
        Ok(Geometry::LineString(line))
    }
}

fn is_area(tags: Option<&Map<String, Value>>) -> bool {
    let tag = |key: &str| tags.and_then(|t| t.get(key)).and_then(Value::as_str);
    match tag("area") {
        Some("no") => false,
        Some("yes") => true,
        _ => !LINEAR_KEYS.iter().any(|key| tag(key).is_some()) && tag("natural") != Some("coastline"),
    }
}

fn properties(element: &Value, label: &str) -> Properties {
    let mut properties = Properties::new();
    if let Some(tags) = tags(element) {
        for (key, value) in tags {
            match value {
                Value::String(s) => properties.insert(key, s.as_str()),
                other => properties.insert(key, other.to_string()),
            };
        }
    }
    properties.insert("id", label);
    properties
}

fn tags(element: &Value) -> Option<&Map<String, Value>> {
    element.get("tags").and_then(Value::as_object)
}

fn element_id(element: &Value) -> Option<i64> {
    element.get("id").and_then(Value::as_i64)
}

fn node_refs(element: &Value) -> impl Iterator<Item = i64> + '_ {
    element.get("nodes").and_then(Value::as_array).into_iter().flatten().filter_map(Value::as_i64)
}

fn node_position(value: &Value) -> Result<Position, ParseError> {
    let coord = |key: &str| value.get(key).and_then(Value::as_f64)
        .ok_or_else(|| ParseError::Geometry(format!("missing or invalid `{key}`")));
    let position = Position::new(coord("lon")?, coord("lat")?);
    if !position.is_finite() || !position.in_wgs84_range() {
        return Err(ParseError::Geometry("coordinates out of range".into()));
    }
    Ok(position)
}
