//! Configuration for IDW gridding.

use crate::grid::GridTopology;
use geo_common::{BoundingBox, GeoError, GeoResult, LengthUnit};
use serde::{Deserialize, Serialize};

/// Settings shared by every interpolation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    /// Distance-decay exponent. Higher values favour nearer samples.
    pub weight: f64,

    /// Unit of the cell size.
    pub units: LengthUnit,

    /// Shape of the output cells.
    pub grid_type: GridTopology,

    /// Property holding the sample value, also used for the output value.
    pub z_property: String,

    /// Extent to grid. Defaults to the extent of the samples.
    pub bbox: Option<BoundingBox>,

    /// Estimate rows on the rayon pool.
    pub parallel: bool,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            weight: 1.0,
            units: LengthUnit::Kilometers,
            grid_type: GridTopology::Square,
            z_property: "elevation".to_string(),
            bbox: None,
            parallel: true,
        }
    }
}

impl InterpolationConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("IDW_WEIGHT") {
            if let Ok(weight) = val.parse() {
                config.weight = weight;
            }
        }

        if let Ok(val) = std::env::var("IDW_UNITS") {
            if let Ok(units) = val.parse() {
                config.units = units;
            }
        }

        if let Ok(val) = std::env::var("IDW_GRID_TYPE") {
            if let Ok(grid_type) = val.parse() {
                config.grid_type = grid_type;
            }
        }

        if let Ok(val) = std::env::var("IDW_Z_PROPERTY") {
            if !val.is_empty() {
                config.z_property = val;
            }
        }

        if let Ok(val) = std::env::var("IDW_BBOX") {
            if let Ok(bbox) = BoundingBox::parse(&val) {
                config.bbox = Some(bbox);
            }
        }

        if let Ok(val) = std::env::var("IDW_PARALLEL") {
            config.parallel = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_units(mut self, units: LengthUnit) -> Self {
        self.units = units;
        self
    }

    pub fn with_grid_type(mut self, grid_type: GridTopology) -> Self {
        self.grid_type = grid_type;
        self
    }

    pub fn with_z_property(mut self, z_property: impl Into<String>) -> Self {
        self.z_property = z_property.into();
        self
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> GeoResult<()> {
        if !(self.weight > 0.0) || !self.weight.is_finite() {
            return Err(GeoError::invalid_input(format!(
                "weight must be positive and finite, got {}",
                self.weight
            )));
        }

        if self.z_property.is_empty() {
            return Err(GeoError::invalid_input("z_property must not be empty"));
        }

        if let Some(bbox) = &self.bbox {
            let finite = bbox.to_array().iter().all(|v| v.is_finite());
            if !finite || bbox.min_x > bbox.max_x || bbox.min_y > bbox.max_y {
                return Err(GeoError::invalid_input(format!(
                    "bbox {:?} must be finite with min <= max",
                    bbox.to_array()
                )));
            }
        }

        Ok(())
    }
}
