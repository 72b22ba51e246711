//! GeoJSON interchange types.
//!
//! Inputs (sample points, triangles, point lattices) and outputs (grids,
//! isobands, isolines) travel as FeatureCollections of typed geometries with
//! an attached JSON property map.
//!
//! See: <https://datatracker.ietf.org/doc/html/rfc7946>

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A position: `[x, y]` or `[x, y, z]`.
pub type Position = Vec<f64>;

/// Feature property map.
pub type Properties = Map<String, Value>;

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Array of features.
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    /// Add a feature to the collection.
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// Add multiple features to the collection.
    pub fn with_features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features.extend(features);
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<T: IntoIterator<Item = Feature>>(iter: T) -> Self {
        Self::new().with_features(iter)
    }
}

/// A GeoJSON Feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// Optional feature identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The geometry of this feature.
    pub geometry: Geometry,

    /// Arbitrary key-value properties.
    #[serde(default)]
    pub properties: Properties,
}

impl Feature {
    /// Create a feature with the given geometry and no properties.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: None,
            geometry,
            properties: Properties::new(),
        }
    }

    /// Create a new feature with a point geometry.
    pub fn point(x: f64, y: f64) -> Self {
        Self::new(Geometry::point(x, y))
    }

    /// Set the feature ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Replace the properties.
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Set a single property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Read a numeric property.
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(Value::as_f64)
    }
}

/// GeoJSON geometry types used by the workspace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: Position,
    },

    LineString {
        coordinates: Vec<Position>,
    },

    /// Linear rings; the first is the exterior, the rest are holes.
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },

    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },

    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
}

impl Geometry {
    /// Create a 2D point geometry.
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point {
            coordinates: vec![x, y],
        }
    }

    /// Create a single-ring polygon from 2D vertices. The ring is closed if needed.
    pub fn polygon_from_ring(ring: &[[f64; 2]]) -> Self {
        Geometry::Polygon {
            coordinates: vec![close_ring(ring)],
        }
    }

    /// Geometry type name as it appears on the wire.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::LineString { .. } => "LineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
        }
    }

    /// Point coordinates, if this is a point with at least two ordinates.
    pub fn as_point(&self) -> Option<&[f64]> {
        match self {
            Geometry::Point { coordinates } if coordinates.len() >= 2 => Some(coordinates),
            _ => None,
        }
    }
}

/// Convert `[x, y]` pairs to a closed ring of positions.
pub fn close_ring(ring: &[[f64; 2]]) -> Vec<Position> {
    let mut coords: Vec<Position> = ring.iter().map(|p| vec![p[0], p[1]]).collect();
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            coords.push(vec![first[0], first[1]]);
        }
    }
    coords
}
