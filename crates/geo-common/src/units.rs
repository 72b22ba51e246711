//! Length units and great-circle distance.
//!
//! Distances are measured along the sphere between `[longitude, latitude]`
//! positions given in degrees, then expressed in the requested unit. Angular
//! units (`Degrees`, `Radians`) give the central angle.

use crate::error::GeoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Unit used for cell sizes and distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Meters,
    #[default]
    Kilometers,
    Miles,
    NauticalMiles,
    Degrees,
    Radians,
}

impl LengthUnit {
    /// Units per radian of arc on the Earth's surface.
    pub fn factor(&self) -> f64 {
        match self {
            Self::Meters => EARTH_RADIUS_M,
            Self::Kilometers => EARTH_RADIUS_M / 1000.0,
            Self::Miles => EARTH_RADIUS_M / 1609.344,
            Self::NauticalMiles => EARTH_RADIUS_M / 1852.0,
            Self::Degrees => 360.0 / (2.0 * std::f64::consts::PI),
            Self::Radians => 1.0,
        }
    }

    /// Convert a length in this unit to radians of arc.
    pub fn to_radians(&self, length: f64) -> f64 {
        length / self.factor()
    }

    /// Convert radians of arc to a length in this unit.
    pub fn from_radians(&self, radians: f64) -> f64 {
        radians * self.factor()
    }

    /// Convert a length from this unit into `target`.
    pub fn convert(&self, length: f64, target: LengthUnit) -> f64 {
        target.from_radians(self.to_radians(length))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meters => "meters",
            Self::Kilometers => "kilometers",
            Self::Miles => "miles",
            Self::NauticalMiles => "nauticalmiles",
            Self::Degrees => "degrees",
            Self::Radians => "radians",
        }
    }
}

impl FromStr for LengthUnit {
    type Err = GeoError;

    /// Parse from string (case-insensitive, common abbreviations accepted).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(Self::Meters),
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Ok(Self::Kilometers),
            "mi" | "mile" | "miles" => Ok(Self::Miles),
            "nmi" | "nauticalmiles" | "nautical_miles" => Ok(Self::NauticalMiles),
            "deg" | "degree" | "degrees" => Ok(Self::Degrees),
            "rad" | "radian" | "radians" => Ok(Self::Radians),
            other => Err(GeoError::invalid_input(format!("unknown length unit '{}'", other))),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Great-circle (haversine) distance between two `[lon, lat]` positions.
pub fn distance(from: [f64; 2], to: [f64; 2], units: LengthUnit) -> f64 {
    let d_lat = (to[1] - from[1]).to_radians();
    let d_lon = (to[0] - from[0]).to_radians();
    let lat1 = from[1].to_radians();
    let lat2 = to[1].to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    let radians = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    units.from_radians(radians)
}
