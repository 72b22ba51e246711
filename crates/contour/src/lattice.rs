//! Rectangular point lattices and the keys that name contour vertices on them.
//!
//! Contour vertices are identified by where they sit on the lattice rather
//! than by their coordinates: either a lattice corner or a threshold crossing
//! on a lattice edge. Adjacent cells that share an edge compute the same key
//! for the same crossing, so stitching never compares floats.

use std::collections::HashMap;

use geo_common::{FeatureCollection, GeoError, GeoResult};
use interpolation::{Grid, GridTopology, SamplePoint};

/// Valued points on a rectangular lattice.
///
/// Values are row-major with row 0 at `ys[0]` (the southern edge when the
/// axes are longitude and latitude).
#[derive(Debug, Clone, PartialEq)]
pub struct PointLattice {
    xs: Vec<f64>,
    ys: Vec<f64>,
    values: Vec<f64>,
}

impl PointLattice {
    /// Build a lattice from its axes and row-major values.
    ///
    /// Both axes need at least two finite, strictly increasing coordinates.
    /// Values may be NaN; cells touching a NaN are left out of contours.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, values: Vec<f64>) -> GeoResult<Self> {
        if xs.len() < 2 || ys.len() < 2 {
            return Err(GeoError::invalid_input(format!(
                "contouring needs at least a 2x2 lattice, got {}x{}",
                xs.len(),
                ys.len()
            )));
        }
        for (name, axis) in [("x", &xs), ("y", &ys)] {
            let ok = axis.iter().all(|v| v.is_finite()) && axis.windows(2).all(|w| w[0] < w[1]);
            if !ok {
                return Err(GeoError::invalid_input(format!(
                    "lattice {} axis must be finite and strictly increasing",
                    name
                )));
            }
        }
        if values.len() != xs.len() * ys.len() {
            return Err(GeoError::invalid_input(format!(
                "expected {} lattice values ({}x{}), got {}",
                xs.len() * ys.len(),
                xs.len(),
                ys.len(),
                values.len()
            )));
        }

        Ok(Self { xs, ys, values })
    }

    /// Take the lattice of a point grid.
    pub fn from_grid(grid: &Grid) -> GeoResult<Self> {
        if grid.topology() != GridTopology::Point {
            return Err(GeoError::invalid_input(format!(
                "contouring needs a point grid, got {}",
                grid.topology()
            )));
        }
        let shape = grid
            .lattice()
            .ok_or_else(|| GeoError::invalid_input("point grid has no lattice shape"))?;

        let cells = grid.cells();
        let xs = (0..shape.columns)
            .map(|col| cells[shape.index(col, 0)].center()[0])
            .collect();
        let ys = (0..shape.rows)
            .map(|row| cells[shape.index(0, row)].center()[1])
            .collect();

        Self::new(xs, ys, grid.values().collect())
    }

    /// Rebuild a lattice from loose point features.
    ///
    /// Points are grouped by their distinct x and y coordinates. Every
    /// combination must be present exactly once, otherwise the collection
    /// does not describe a complete lattice.
    pub fn from_feature_collection(points: &FeatureCollection, z_property: &str) -> GeoResult<Self> {
        let samples = SamplePoint::from_features(points, z_property)?;

        let xs = distinct_sorted(samples.iter().map(|s| s.x))?;
        let ys = distinct_sorted(samples.iter().map(|s| s.y))?;
        let expected = xs.len() * ys.len();
        if samples.len() != expected {
            return Err(GeoError::invalid_input(format!(
                "{} points do not form a complete {}x{} lattice",
                samples.len(),
                xs.len(),
                ys.len()
            )));
        }

        let column_of: HashMap<u64, usize> =
            xs.iter().enumerate().map(|(i, &x)| (axis_key(x), i)).collect();
        let row_of: HashMap<u64, usize> =
            ys.iter().enumerate().map(|(i, &y)| (axis_key(y), i)).collect();

        let mut values = vec![f64::NAN; expected];
        let mut filled = vec![false; expected];
        for sample in &samples {
            let col = column_of[&axis_key(sample.x)];
            let row = row_of[&axis_key(sample.y)];
            let index = row * xs.len() + col;
            if filled[index] {
                return Err(GeoError::invalid_input(format!(
                    "duplicate lattice point at ({}, {})",
                    sample.x, sample.y
                )));
            }
            filled[index] = true;
            values[index] = sample.value;
        }

        Self::new(xs, ys, values)
    }

    pub fn columns(&self) -> usize {
        self.xs.len()
    }

    pub fn rows(&self) -> usize {
        self.ys.len()
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value(&self, col: usize, row: usize) -> f64 {
        self.values[row * self.xs.len() + col]
    }

    pub fn position(&self, col: usize, row: usize) -> [f64; 2] {
        [self.xs[col], self.ys[row]]
    }

    /// Finite minimum and maximum of the lattice values.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Corner values of cell `(col, row)` counter-clockwise from the
    /// south-west corner, or `None` when any of them is NaN.
    pub(crate) fn cell_corners(&self, col: usize, row: usize) -> Option<[f64; 4]> {
        let corners = [
            self.value(col, row),
            self.value(col + 1, row),
            self.value(col + 1, row + 1),
            self.value(col, row + 1),
        ];
        if corners.iter().any(|v| v.is_nan()) {
            None
        } else {
            Some(corners)
        }
    }

    /// Number of cells skipped because a corner is NaN.
    pub(crate) fn nan_cell_count(&self) -> usize {
        let mut count = 0;
        for row in 0..self.rows() - 1 {
            for col in 0..self.columns() - 1 {
                if self.cell_corners(col, row).is_none() {
                    count += 1;
                }
            }
        }
        count
    }

    /// Key of the point where `threshold` crosses `edge`.
    ///
    /// A crossing that falls on an end of the edge is keyed as that corner so
    /// both neighbouring cells agree with the corner's own key.
    pub(crate) fn crossing(&self, edge: EdgeKey, threshold: f64, slot: u8) -> VertexKey {
        let ((c0, r0), (c1, r1)) = edge.ends();
        let t = crossing_fraction(self.value(c0, r0), self.value(c1, r1), threshold);
        if t <= 0.0 {
            VertexKey::Corner { col: c0, row: r0 }
        } else if t >= 1.0 {
            VertexKey::Corner { col: c1, row: r1 }
        } else {
            VertexKey::Crossing { edge, slot }
        }
    }

    /// Coordinates of a vertex. `thresholds[slot]` gives the value of each
    /// crossing slot.
    pub(crate) fn vertex_position(&self, key: VertexKey, thresholds: &[f64]) -> [f64; 2] {
        match key {
            VertexKey::Corner { col, row } => self.position(col, row),
            VertexKey::Crossing { edge, slot } => {
                let ((c0, r0), (c1, r1)) = edge.ends();
                let t = crossing_fraction(
                    self.value(c0, r0),
                    self.value(c1, r1),
                    thresholds[slot as usize],
                );
                let [x0, y0] = self.position(c0, r0);
                let [x1, y1] = self.position(c1, r1);
                [x0 + t * (x1 - x0), y0 + t * (y1 - y0)]
            }
        }
    }
}

/// Fraction along `a -> b` where the linear ramp reaches `threshold`.
fn crossing_fraction(a: f64, b: f64, threshold: f64) -> f64 {
    if a == b {
        return 0.5;
    }
    ((threshold - a) / (b - a)).clamp(0.0, 1.0)
}

/// Hashable coordinate; `-0.0` and `0.0` share a key.
fn axis_key(v: f64) -> u64 {
    (v + 0.0).to_bits()
}

fn distinct_sorted(values: impl Iterator<Item = f64>) -> GeoResult<Vec<f64>> {
    let mut axis: Vec<f64> = values.map(|v| v + 0.0).collect();
    if axis.iter().any(|v| !v.is_finite()) {
        return Err(GeoError::invalid_input("lattice coordinates must be finite"));
    }
    axis.sort_by(f64::total_cmp);
    axis.dedup();
    Ok(axis)
}

/// A lattice edge, named by its lower-left end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum EdgeKey {
    /// `(col, row) -> (col + 1, row)`
    Horizontal { col: usize, row: usize },
    /// `(col, row) -> (col, row + 1)`
    Vertical { col: usize, row: usize },
}

impl EdgeKey {
    pub(crate) fn ends(self) -> ((usize, usize), (usize, usize)) {
        match self {
            EdgeKey::Horizontal { col, row } => ((col, row), (col + 1, row)),
            EdgeKey::Vertical { col, row } => ((col, row), (col, row + 1)),
        }
    }
}

/// A contour vertex on the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum VertexKey {
    Corner { col: usize, row: usize },
    /// Crossing of threshold number `slot` on `edge`.
    Crossing { edge: EdgeKey, slot: u8 },
}
