#![doc = "geoimport public API"]
mod config;
mod error;
mod feature;
mod import;
mod io;
mod layer;
mod template;

#[doc(inline)]
pub use config::ImportConfig;

#[doc(inline)]
pub use error::{ParseError, ReconcileError};

#[doc(inline)]
pub use feature::{Feature, Geometry, GeometryType, Position, Properties, is_sanitized, sanitize_key};

#[doc(inline)]
pub use layer::{DataLayer, LayerId, LayerSet, MapSession};

#[doc(inline)]
pub use io::{
    Format, ParsedData, ParsedLayer, feature_to_geojson, features_to_geojson, geometry_to_geojson,
    parse_features,
};

#[doc(inline)]
pub use import::{
    Alert, ImportDirective, ImportError, ImportMode, ImportOutcome, ImportReport, ImportTarget, Level,
    Reconciliation, Stage, reconcile, run_import,
};

#[doc(inline)]
pub use template::{TemplateContext, render_template};
