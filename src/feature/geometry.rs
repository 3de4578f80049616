use std::fmt;

use geo::{Coord, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};

/// A single coordinate: longitude, latitude and optional altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
    pub alt: Option<f64>,
}

impl Position {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat, alt: None }
    }

    pub fn with_alt(lon: f64, lat: f64, alt: f64) -> Self {
        Self { lon, lat, alt: Some(alt) }
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite() && self.alt.is_none_or(f64::is_finite)
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180].
    pub fn in_wgs84_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Same horizontal location, ignoring altitude.
    pub fn same_location(&self, other: &Position) -> bool {
        self.lon == other.lon && self.lat == other.lat
    }

    fn coord(&self) -> Coord<f64> {
        Coord { x: self.lon, y: self.lat }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryType {
    pub fn to_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }

    /// Parse a GeoJSON `type` member.
    pub fn from_geojson_type(s: &str) -> Option<Self> {
        match s {
            "Point" => Some(GeometryType::Point),
            "LineString" => Some(GeometryType::LineString),
            "Polygon" => Some(GeometryType::Polygon),
            "MultiPoint" => Some(GeometryType::MultiPoint),
            "MultiLineString" => Some(GeometryType::MultiLineString),
            "MultiPolygon" => Some(GeometryType::MultiPolygon),
            "GeometryCollection" => Some(GeometryType::GeometryCollection),
            _ => None,
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Coordinate data of a feature. Polygons are a list of rings, exterior
/// first then holes, each ring closed.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Position),
    LineString(Vec<Position>),
    Polygon(Vec<Vec<Position>>),
    MultiPoint(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    /// Build a polygon, closing any open ring.
    pub fn polygon(mut rings: Vec<Vec<Position>>) -> Self {
        rings.iter_mut().for_each(close_ring);
        Geometry::Polygon(rings)
    }

    /// Convert to the `geo` representation (altitude is dropped).
    pub fn to_geo(&self) -> geo::Geometry<f64> {
        match self {
            Geometry::Point(p) => Point::from(p.coord()).into(),
            Geometry::LineString(line) => to_line_string(line).into(),
            Geometry::Polygon(rings) => to_polygon(rings).into(),
            Geometry::MultiPoint(points) => {
                MultiPoint::new(points.iter().map(|p| Point::from(p.coord())).collect()).into()
            }
            Geometry::MultiLineString(lines) => {
                MultiLineString::new(lines.iter().map(|l| to_line_string(l)).collect()).into()
            }
            Geometry::MultiPolygon(polygons) => {
                MultiPolygon::new(polygons.iter().map(|p| to_polygon(p)).collect()).into()
            }
            Geometry::GeometryCollection(members) => {
                geo::Geometry::GeometryCollection(geo::GeometryCollection::new_from(
                    members.iter().map(Geometry::to_geo).collect(),
                ))
            }
        }
    }
}

/// Ensure ring is closed (first point == last point)
pub(crate) fn close_ring(ring: &mut Vec<Position>) {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if !first.same_location(&last) {
            ring.push(first);
        }
    }
}

fn to_line_string(positions: &[Position]) -> LineString<f64> {
    LineString::new(positions.iter().map(Position::coord).collect())
}

fn to_polygon(rings: &[Vec<Position>]) -> Polygon<f64> {
    let mut rings = rings.iter().map(|r| to_line_string(r));
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Polygon::new(exterior, rings.collect())
}
