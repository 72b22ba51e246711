//! Inverse Distance Weighting (IDW) estimation.
//!
//! Every cell receives a weighted average of all samples:
//!
//! ```text
//! z(c) = Σ(wᵢ · zᵢ) / Σ(wᵢ)     wᵢ = 1 / d(c, sᵢ)^weight
//! ```
//!
//! Distances are great-circle distances in the configured unit. A sample that
//! sits exactly on a cell center supplies that cell's value directly.

use rayon::prelude::*;

use crate::config::InterpolationConfig;
use crate::grid::{build_cells, Grid, GridTopology};
use crate::sample::{samples_bbox, validate_samples, SamplePoint};
use geo_common::{FeatureCollection, GeoError, GeoResult, LengthUnit};

/// Estimate a grid over the extent of `samples`.
pub fn estimate(
    samples: &[SamplePoint],
    cell_size: f64,
    units: LengthUnit,
    grid_type: GridTopology,
    weight: f64,
) -> GeoResult<Grid> {
    let config = InterpolationConfig::default()
        .with_units(units)
        .with_grid_type(grid_type)
        .with_weight(weight);
    interpolate(samples, cell_size, &config)
}

/// Estimate a grid using the full set of options.
pub fn interpolate(
    samples: &[SamplePoint],
    cell_size: f64,
    config: &InterpolationConfig,
) -> GeoResult<Grid> {
    config.validate()?;
    validate_samples(samples)?;

    let bbox = match config.bbox {
        Some(bbox) => bbox,
        None => samples_bbox(samples)
            .ok_or_else(|| GeoError::invalid_input("sample set is empty"))?,
    };

    let layout = build_cells(bbox, cell_size, config.units, config.grid_type)?;

    tracing::debug!(
        samples = samples.len(),
        cells = layout.cells.len(),
        grid_type = %config.grid_type,
        cell_size,
        units = %config.units,
        weight = config.weight,
        "idw input"
    );

    let units = config.units;
    let weight = config.weight;
    let values: Vec<f64> = if config.parallel {
        layout
            .cells
            .par_iter()
            .map(|cell| weighted_value(cell.center(), samples, units, weight))
            .collect::<GeoResult<Vec<f64>>>()?
    } else {
        layout
            .cells
            .iter()
            .map(|cell| weighted_value(cell.center(), samples, units, weight))
            .collect::<GeoResult<Vec<f64>>>()?
    };

    let grid = Grid::from_layout(layout, values);

    tracing::debug!(
        cells = grid.len(),
        lattice = ?grid.lattice(),
        "idw grid estimated"
    );

    Ok(grid)
}

/// Grid a point FeatureCollection and return the cells as GeoJSON.
///
/// Sample values are read from `config.z_property` (or the third coordinate)
/// and written back under the same property name.
pub fn interpolate_features(
    points: &FeatureCollection,
    cell_size: f64,
    config: &InterpolationConfig,
) -> GeoResult<FeatureCollection> {
    let samples = SamplePoint::from_features(points, &config.z_property)?;
    let grid = interpolate(&samples, cell_size, config)?;
    Ok(grid.to_feature_collection(&config.z_property))
}

/// Weighted average of all samples as seen from `center`.
///
/// Summation follows sample order so results are reproducible.
fn weighted_value(
    center: [f64; 2],
    samples: &[SamplePoint],
    units: LengthUnit,
    weight: f64,
) -> GeoResult<f64> {
    let mut sum_w = 0.0;
    let mut sum_wz = 0.0;

    for sample in samples {
        let d = geo_common::distance(center, sample.position(), units);
        if d == 0.0 {
            return Ok(sample.value);
        }
        let w = 1.0 / d.powf(weight);
        sum_w += w;
        sum_wz += w * sample.value;
    }

    let value = sum_wz / sum_w;
    if !(sum_w > 0.0) || !sum_w.is_finite() || !value.is_finite() {
        return Err(GeoError::numeric_degeneracy(format!(
            "weights at {:?} sum to {} with weight exponent {}",
            center, sum_w, weight
        )));
    }
    Ok(value)
}
