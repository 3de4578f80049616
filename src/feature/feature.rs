use super::{Geometry, GeometryType, Properties};

/// One geometry plus its property mapping: the canonical import unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    geometry: Geometry,
    properties: Properties,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Self { geometry, properties }
    }

    /// Build the features for one parsed geometry. A `GeometryCollection`
    /// (nested ones included) yields one feature per member, each with its
    /// own copy of `properties`; any other geometry, Multi* included, yields
    /// exactly one feature.
    pub fn explode(geometry: Geometry, properties: Properties) -> Vec<Feature> {
        let mut features = Vec::new();
        explode_into(geometry, &properties, &mut features);
        features
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.geometry.geometry_type()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    pub fn into_parts(self) -> (Geometry, Properties) {
        (self.geometry, self.properties)
    }
}

fn explode_into(geometry: Geometry, properties: &Properties, out: &mut Vec<Feature>) {
    match geometry {
        Geometry::GeometryCollection(members) => {
            for member in members {
                explode_into(member, properties, out);
            }
        }
        other => out.push(Feature::new(other, properties.clone())),
    }
}
