mod feature;
mod geometry;
mod properties;
mod sanitize;

pub use feature::Feature;
pub use geometry::{Geometry, GeometryType, Position};
pub use properties::Properties;
pub use sanitize::{is_sanitized, sanitize_key};

pub(crate) use geometry::close_ring;
