//! Options shared by isoband and isoline extraction.

use geo_common::Properties;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output metadata and execution settings for contouring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourOptions {
    /// Property that receives the break value(s) of each output feature.
    /// When contouring point features, also the property holding the input values.
    pub z_property: String,

    /// Properties copied onto every output feature.
    pub common_properties: Properties,

    /// Properties for individual outputs, indexed like the output: by break
    /// for isolines and by band for isobands.
    pub breaks_properties: Vec<Properties>,

    /// Contour each break on the rayon pool.
    pub parallel: bool,
}

impl Default for ContourOptions {
    fn default() -> Self {
        Self {
            z_property: "value".to_string(),
            common_properties: Properties::new(),
            breaks_properties: Vec::new(),
            parallel: true,
        }
    }
}

impl ContourOptions {
    /// Load options from environment variables.
    ///
    /// Reads `CONTOUR_Z_PROPERTY` and `CONTOUR_PARALLEL`; anything unset keeps
    /// its default.
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Ok(val) = std::env::var("CONTOUR_Z_PROPERTY") {
            if !val.is_empty() {
                options.z_property = val;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_PARALLEL") {
            options.parallel = val.to_lowercase() == "true" || val == "1";
        }

        options
    }

    pub fn with_z_property(mut self, z_property: impl Into<String>) -> Self {
        self.z_property = z_property.into();
        self
    }

    pub fn with_common_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.common_properties.insert(key.into(), value.into());
        self
    }

    pub fn with_common_properties(mut self, properties: Properties) -> Self {
        self.common_properties = properties;
        self
    }

    pub fn with_breaks_properties(mut self, properties: Vec<Properties>) -> Self {
        self.breaks_properties = properties;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Properties for output number `index`.
    ///
    /// Common properties first, then the indexed ones over them, then the
    /// break metadata under `z_property` over both.
    pub(crate) fn properties_for(&self, index: usize, z_value: Value) -> Properties {
        let mut properties = self.common_properties.clone();
        if let Some(specific) = self.breaks_properties.get(index) {
            for (key, value) in specific {
                properties.insert(key.clone(), value.clone());
            }
        }
        properties.insert(self.z_property.clone(), z_value);
        properties
    }
}
