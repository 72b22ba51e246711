//! Common types and utilities shared across the geogrid crates.

pub mod bbox;
pub mod error;
pub mod geojson;
pub mod units;

pub use bbox::BoundingBox;
pub use error::{GeoError, GeoResult};
pub use geojson::{Feature, FeatureCollection, Geometry, Position, Properties};
pub use units::{distance, LengthUnit};
