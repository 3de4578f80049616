use crate::{
    ParseError,
    feature::{Feature, Geometry, Position, Properties},
    io::{Format, ParsedData, xml::{self, Element}},
};

const WAYPOINT_KEYS: [&str; 6] = ["name", "desc", "cmt", "type", "time", "sym"];
const PATH_KEYS: [&str; 3] = ["name", "desc", "type"];

/// Read GPX text: waypoints become Points, routes LineStrings, tracks a
/// LineString per single segment or a MultiLineString for several.
pub(crate) fn read_gpx(text: &str) -> Result<ParsedData, ParseError> {
    let root = xml::parse_document(text, Format::Gpx)?;
    if root.name != "gpx" {
        return Err(ParseError::structure(Format::Gpx, format!("expected <gpx> root, found <{}>", root.name)));
    }

    let mut features = Vec::new();
    let mut issues = Vec::new();

    for (idx, wpt) in root.children_named("wpt").enumerate() {
        match point(wpt) {
            Ok(position) => features.push(Feature::new(Geometry::Point(position), properties(wpt, &WAYPOINT_KEYS))),
            Err(e) => issues.push(format!("waypoint {}: {}", idx + 1, e)),
        }
    }

    for (idx, rte) in root.children_named("rte").enumerate() {
        match path(rte, "rtept") {
            Ok(line) => features.push(Feature::new(Geometry::LineString(line), properties(rte, &PATH_KEYS))),
            Err(e) => issues.push(format!("route {}: {}", idx + 1, e)),
        }
    }

    for (idx, trk) in root.children_named("trk").enumerate() {
        let mut segments = Vec::new();
        for seg in trk.children_named("trkseg") {
            match path(seg, "trkpt") {
                Ok(line) => segments.push(line),
                Err(e) => issues.push(format!("track {}: {}", idx + 1, e)),
            }
        }
        let geometry = match segments.len() {
            0 => {
                issues.push(format!("track {}: no usable segment", idx + 1));
                continue;
            }
            1 => Geometry::LineString(segments.remove(0)),
            _ => Geometry::MultiLineString(segments),
        };
        features.push(Feature::new(geometry, properties(trk, &PATH_KEYS)));
    }

    Ok(ParsedData::single(features, issues))
}

/// Position of a `wpt`/`rtept`/`trkpt` from its `lat`/`lon` attributes and
/// optional `ele` child.
fn point(element: &Element) -> Result<Position, ParseError> {
    let attr = |name: &str| element.attr(name)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .ok_or_else(|| ParseError::Geometry(format!("missing or invalid `{name}` attribute")));
    let (lat, lon) = (attr("lat")?, attr("lon")?);
    let position = match element.child_text("ele").and_then(|e| e.parse::<f64>().ok()) {
        Some(ele) => Position::with_alt(lon, lat, ele),
        None => Position::new(lon, lat),
    };
    if !position.is_finite() || !position.in_wgs84_range() {
        return Err(ParseError::Geometry(format!("coordinates out of range (lat={lat}, lon={lon})")));
    }
    Ok(position)
}

fn path(element: &Element, point_name: &str) -> Result<Vec<Position>, ParseError> {
    let line = element.children_named(point_name).map(point).collect::<Result<Vec<_>, _>>()?;
    if line.len() < 2 {
        return Err(ParseError::Geometry(format!("path needs at least 2 points, got {}", line.len())));
    }
    Ok(line)
}

fn properties(element: &Element, keys: &[&str]) -> Properties {
    keys.iter()
        .filter_map(|&key| element.child_text(key).map(|value| (key, value)))
        .collect()
}
