//! Test data generators for scattered samples and point lattices.
//!
//! Lattice generators return row-major `Vec<f64>` values with row 0 at the
//! southern edge, matching the layout of point grids.

use geo_common::{Feature, FeatureCollection};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates `count` random point features inside `bbox`.
///
/// Each feature carries a uniformly random value in `range` under `property`.
/// The same seed always produces the same collection.
///
/// # Example
///
/// ```
/// use test_utils::random_point_features;
///
/// let fc = random_point_features(30, [50.0, 30.0, 70.0, 50.0], "solRad", (0.0, 50.0), 7);
/// assert_eq!(fc.features.len(), 30);
/// ```
pub fn random_point_features(
    count: usize,
    bbox: [f64; 4],
    property: &str,
    range: (f64, f64),
    seed: u64,
) -> FeatureCollection {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = rng.gen_range(bbox[0]..bbox[2]);
            let y = rng.gen_range(bbox[1]..bbox[3]);
            let value = rng.gen_range(range.0..range.1);
            Feature::point(x, y).with_property(property, value)
        })
        .collect()
}

/// Evenly spaced axis coordinates: `start, start + step, ...` (`n` values).
pub fn lattice_axis(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Creates a lattice filled with a constant value.
pub fn constant_lattice(columns: usize, rows: usize, value: f64) -> Vec<f64> {
    vec![value; columns * rows]
}

/// Creates a lattice at `background` with a single point set to `peak`.
pub fn peak_lattice(
    columns: usize,
    rows: usize,
    peak_at: (usize, usize),
    peak: f64,
    background: f64,
) -> Vec<f64> {
    let mut data = constant_lattice(columns, rows, background);
    let (col, row) = peak_at;
    if col < columns && row < rows {
        data[row * columns + col] = peak;
    }
    data
}

/// Value equals the column index times `step`: a west-to-east ramp.
pub fn ramp_lattice(columns: usize, rows: usize, step: f64) -> Vec<f64> {
    let mut data = Vec::with_capacity(columns * rows);
    for _row in 0..rows {
        for col in 0..columns {
            data.push(col as f64 * step);
        }
    }
    data
}

/// Euclidean distance (in lattice steps) from the lattice center.
///
/// Contours of this field are concentric rings, which makes it useful for
/// band polygons with holes.
pub fn radial_lattice(columns: usize, rows: usize) -> Vec<f64> {
    let cx = (columns as f64 - 1.0) / 2.0;
    let cy = (rows as f64 - 1.0) / 2.0;
    let mut data = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for col in 0..columns {
            let dx = col as f64 - cx;
            let dy = row as f64 - cy;
            data.push((dx * dx + dy * dy).sqrt());
        }
    }
    data
}

/// A smooth field of overlapping hills and valleys in roughly [0, 100].
pub fn smooth_lattice(columns: usize, rows: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for col in 0..columns {
            let fx = col as f64 / columns as f64;
            let fy = row as f64 / rows as f64;

            let v1 = (fx * std::f64::consts::PI * 4.0).sin() * 20.0;
            let v2 = (fy * std::f64::consts::PI * 4.0).sin() * 20.0;
            let v3 = ((fx + fy) * std::f64::consts::PI * 2.0).sin() * 10.0;

            data.push(50.0 + v1 + v2 + v3);
        }
    }
    data
}

/// Creates a zero lattice with NaN at the listed `(col, row)` positions.
pub fn lattice_with_nans(columns: usize, rows: usize, nan_positions: &[(usize, usize)]) -> Vec<f64> {
    let mut data = constant_lattice(columns, rows, 0.0);
    for &(col, row) in nan_positions {
        if col < columns && row < rows {
            data[row * columns + col] = f64::NAN;
        }
    }
    data
}
