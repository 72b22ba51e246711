//! Scattered sample points.

use geo_common::{BoundingBox, Feature, FeatureCollection, GeoError, GeoResult};

/// A located scalar observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Longitude or planar x.
    pub x: f64,
    /// Latitude or planar y.
    pub y: f64,
    pub value: f64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }

    /// `[x, y]`.
    pub fn position(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Read a sample from a point feature.
    ///
    /// The value comes from the numeric property `z_property`, falling back to
    /// the third coordinate of the point.
    pub fn from_feature(feature: &Feature, z_property: &str) -> GeoResult<Self> {
        let coords = feature.geometry.as_point().ok_or_else(|| {
            GeoError::invalid_input(format!(
                "sample must be a Point geometry, got {}",
                feature.geometry.type_name()
            ))
        })?;

        let value = feature
            .property_f64(z_property)
            .or_else(|| coords.get(2).copied())
            .ok_or_else(|| {
                GeoError::invalid_input(format!(
                    "sample has no numeric '{}' property and no z coordinate",
                    z_property
                ))
            })?;

        Ok(Self::new(coords[0], coords[1], value))
    }

    /// Read every feature of a collection as a sample.
    pub fn from_features(collection: &FeatureCollection, z_property: &str) -> GeoResult<Vec<Self>> {
        collection
            .features
            .iter()
            .map(|feature| Self::from_feature(feature, z_property))
            .collect()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.value.is_finite()
    }
}

/// Reject empty or non-finite sample sets.
pub(crate) fn validate_samples(samples: &[SamplePoint]) -> GeoResult<()> {
    if samples.is_empty() {
        return Err(GeoError::invalid_input("sample set is empty"));
    }
    if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
        return Err(GeoError::invalid_input(format!(
            "sample {} has a non-finite coordinate or value",
            index
        )));
    }
    Ok(())
}

/// Extent of the samples.
pub(crate) fn samples_bbox(samples: &[SamplePoint]) -> Option<BoundingBox> {
    BoundingBox::from_points(samples.iter().map(SamplePoint::position))
}

/// `(min, max)` of the sample values.
pub fn value_range(samples: &[SamplePoint]) -> Option<(f64, f64)> {
    samples.iter().map(|s| s.value).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
