//! Contour thresholds.

use geo_common::{GeoError, GeoResult};

/// Strictly increasing, finite contour thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakSet {
    values: Vec<f64>,
}

impl BreakSet {
    /// Validate `values` as a break list.
    pub fn new(values: impl Into<Vec<f64>>) -> GeoResult<Self> {
        let values = values.into();
        if values.is_empty() {
            return Err(GeoError::invalid_input("breaks must not be empty"));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(GeoError::invalid_input(format!(
                "breaks must be finite, got {}",
                bad
            )));
        }
        if let Some(w) = values.windows(2).find(|w| w[0] >= w[1]) {
            return Err(GeoError::invalid_input(format!(
                "breaks must be strictly increasing, found {} followed by {}",
                w[0], w[1]
            )));
        }
        Ok(Self { values })
    }

    /// Validate and require at least `min` breaks.
    pub(crate) fn with_min_len(values: &[f64], min: usize, what: &str) -> GeoResult<Self> {
        if values.len() < min {
            return Err(GeoError::invalid_input(format!(
                "{} need at least {} break(s), got {}",
                what,
                min,
                values.len()
            )));
        }
        Self::new(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consecutive `(lower, upper)` pairs, one per band.
    pub fn bands(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Generate evenly spaced breaks between `min_value` and `max_value`.
///
/// Starts from the first multiple of `interval` at or above `min_value`.
/// Returns an empty list for a non-positive interval or an empty range.
pub fn generate_breaks(min_value: f64, max_value: f64, interval: f64) -> Vec<f64> {
    let finite = min_value.is_finite() && max_value.is_finite() && interval.is_finite();
    if !finite || interval <= 0.0 || max_value <= min_value {
        return vec![];
    }

    let first = (min_value / interval).ceil() as i64;
    let last = (max_value / interval).floor() as i64;

    (first..=last).map(|k| k as f64 * interval).collect()
}
