use crate::{
    ParseError,
    feature::{Feature, Geometry, Position, Properties},
    io::{Format, ParsedData, xml::{self, Element}},
};

/// Read KML text. Every Placemark with a supported geometry becomes one
/// feature (MultiGeometry members become one feature each); placemarks
/// without geometry and unknown elements are ignored.
pub(crate) fn read_kml(text: &str) -> Result<ParsedData, ParseError> {
    let root = xml::parse_document(text, Format::Kml)?;
    if !matches!(root.name.as_str(), "kml" | "Document" | "Folder" | "Placemark") {
        return Err(ParseError::structure(Format::Kml, format!("unexpected root element <{}>", root.name)));
    }

    let mut placemarks = Vec::new();
    if root.name == "Placemark" {
        placemarks.push(&root);
    } else {
        root.descendants_named("Placemark", &mut placemarks);
    }

    let mut features = Vec::new();
    let mut issues = Vec::new();
    for (idx, placemark) in placemarks.into_iter().enumerate() {
        match read_placemark(placemark) {
            Ok(parsed) => features.extend(parsed),
            Err(e) => issues.push(format!("placemark {}: {}", idx + 1, e)),
        }
    }
    Ok(ParsedData::single(features, issues))
}

fn read_placemark(placemark: &Element) -> Result<Vec<Feature>, ParseError> {
    let mut geometries = Vec::new();
    for child in &placemark.children {
        if let Some(geometry) = read_geometry(child)? {
            geometries.push(geometry);
        }
    }
    let geometry = match geometries.len() {
        0 => return Ok(Vec::new()),
        1 => geometries.remove(0),
        _ => Geometry::GeometryCollection(geometries),
    };
    Ok(Feature::explode(geometry, read_properties(placemark)))
}

fn read_properties(placemark: &Element) -> Properties {
    let mut properties = Properties::new();
    for key in ["name", "description", "address"] {
        if let Some(value) = placemark.child_text(key) {
            properties.insert(key, value);
        }
    }
    if let Some(when) = placemark.child("TimeStamp").and_then(|t| t.child_text("when")) {
        properties.insert("timestamp", when);
    }
    if let Some(extended) = placemark.child("ExtendedData") {
        for data in extended.children_named("Data") {
            if let Some(name) = data.attr("name") {
                properties.insert(name, data.child("value").map(Element::text).unwrap_or(""));
            }
        }
        for schema_data in extended.children_named("SchemaData") {
            for simple in schema_data.children_named("SimpleData") {
                if let Some(name) = simple.attr("name") {
                    properties.insert(name, simple.text());
                }
            }
        }
    }
    properties
}

/// Decode a KML geometry element, `None` for anything that is not one.
fn read_geometry(element: &Element) -> Result<Option<Geometry>, ParseError> {
    let geometry = match element.name.as_str() {
        "Point" => {
            let position = coordinates(element)?.into_iter().next()
                .ok_or_else(|| ParseError::Geometry("Point without coordinates".into()))?;
            Geometry::Point(position)
        }
        "LineString" => Geometry::LineString(line(coordinates(element)?)?),
        "LinearRing" => Geometry::polygon(vec![ring(coordinates(element)?)?]),
        "Polygon" => {
            let outer = element.child("outerBoundaryIs").and_then(|b| b.child("LinearRing"))
                .ok_or_else(|| ParseError::Geometry("Polygon without outerBoundaryIs".into()))?;
            let mut rings = vec![ring(coordinates(outer)?)?];
            for inner in element.children_named("innerBoundaryIs") {
                for linear_ring in inner.children_named("LinearRing") {
                    rings.push(ring(coordinates(linear_ring)?)?);
                }
            }
            Geometry::polygon(rings)
        }
        "MultiGeometry" => {
            let mut members = Vec::new();
            for child in &element.children {
                if let Some(member) = read_geometry(child)? {
                    members.push(member);
                }
            }
            Geometry::GeometryCollection(members)
        }
        "Track" => Geometry::LineString(line(track_coordinates(element)?)?),
        "MultiTrack" => {
            let lines = element.children_named("Track")
                .map(|t| track_coordinates(t).and_then(line))
                .collect::<Result<Vec<_>, _>>()?;
            Geometry::MultiLineString(lines)
        }
        _ => return Ok(None),
    };
    Ok(Some(geometry))
}

fn coordinates(element: &Element) -> Result<Vec<Position>, ParseError> {
    let text = element.child("coordinates").map(Element::text).unwrap_or("");
    parse_coordinates(text)
}

/// Parse a KML `<coordinates>` body: whitespace separated `lon,lat[,alt]`
/// tuples.
pub(crate) fn parse_coordinates(text: &str) -> Result<Vec<Position>, ParseError> {
    text.split_whitespace().map(|tuple| parse_tuple(tuple.split(','), tuple)).collect()
}

/// `gx:coord` values are space separated `lon lat [alt]`.
fn track_coordinates(track: &Element) -> Result<Vec<Position>, ParseError> {
    track.children_named("coord")
        .map(|c| parse_tuple(c.text().split_whitespace(), c.text()))
        .collect()
}

fn parse_tuple<'a>(parts: impl Iterator<Item = &'a str>, raw: &str) -> Result<Position, ParseError> {
    let numbers = parts
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ParseError::Geometry(format!("invalid coordinate `{raw}`")))?;
    let position = match numbers.as_slice() {
        [lon, lat] => Position::new(*lon, *lat),
        [lon, lat, alt, ..] => Position::with_alt(*lon, *lat, *alt),
        _ => return Err(ParseError::Geometry(format!("invalid coordinate `{raw}`"))),
    };
    if !position.is_finite() {
        return Err(ParseError::Geometry(format!("invalid coordinate `{raw}`")));
    }
    Ok(position)
}

fn line(positions: Vec<Position>) -> Result<Vec<Position>, ParseError> {
    if positions.len() < 2 {
        return Err(ParseError::Geometry(format!("line needs at least 2 positions, got {}", positions.len())));
    }
    Ok(positions)
}

fn ring(positions: Vec<Position>) -> Result<Vec<Position>, ParseError> {
    if positions.len() < 3 {
        return Err(ParseError::Geometry(format!("ring needs at least 3 positions, got {}", positions.len())));
    }
    Ok(positions)
}
