//! Filled contour bands (isobands).
//!
//! Every lattice cell contributes the part of its square that lies inside the
//! band, found by walking the cell perimeter counter-clockwise and collecting
//! in-band corners and threshold crossings. The polygon edges are recorded as
//! directed half-edges keyed by lattice position. An edge shared by two cells
//! is seen once in each direction and cancels, so only the band boundary is
//! left to be chained into rings.
//!
//! Saddle cells are resolved with the cell-centre average: when the centre is
//! outside the band on the same side as some cut-off corners, the polygon is
//! split across those corners instead of joined through the middle. A corner
//! whose value equals the upper break belongs to the next band, so it cuts
//! the perimeter like any other corner beyond the band.

use std::collections::HashMap;

use geo_common::{Feature, FeatureCollection, GeoResult, Geometry, Properties};
use interpolation::Grid;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::breaks::BreakSet;
use crate::lattice::{EdgeKey, PointLattice, VertexKey};
use crate::options::ContourOptions;
use crate::rings::{self, Ring};

/// The filled region between two consecutive breaks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Isoband {
    /// Inclusive lower bound.
    pub lower: f64,
    /// Exclusive upper bound.
    pub upper: f64,
    /// Polygons as closed rings: exterior counter-clockwise, then holes
    /// clockwise.
    pub polygons: Vec<Vec<Vec<[f64; 2]>>>,
    pub properties: Properties,
}

impl Isoband {
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Planar area in coordinate units, holes subtracted.
    pub fn area(&self) -> f64 {
        self.polygons
            .iter()
            .flat_map(|polygon| polygon.iter().enumerate())
            .map(|(i, ring)| {
                let a = rings::signed_area(ring).abs();
                if i == 0 {
                    a
                } else {
                    -a
                }
            })
            .sum()
    }

    /// Label stored under the z property, e.g. `"0-5"`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.lower, self.upper)
    }

    /// GeoJSON MultiPolygon feature.
    pub fn to_feature(&self) -> Feature {
        let coordinates = self
            .polygons
            .iter()
            .map(|polygon| {
                polygon
                    .iter()
                    .map(|ring| ring.iter().map(|p| p.to_vec()).collect())
                    .collect()
            })
            .collect();
        Feature::new(Geometry::MultiPolygon { coordinates }).with_properties(self.properties.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Below,
    Inside,
    Above,
}

fn classify(value: f64, lower: f64, upper: f64) -> Class {
    if value < lower {
        Class::Below
    } else if value < upper {
        Class::Inside
    } else {
        Class::Above
    }
}

/// Corner offsets counter-clockwise from the south-west corner.
const CELL_CORNERS: [(usize, usize); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];

/// A vertex on the cell perimeter. `s` runs from 0 to 4 around the
/// perimeter; integer values are the corners.
#[derive(Debug, Clone, Copy)]
struct PerimeterPoint {
    key: VertexKey,
    s: f64,
}

/// In-band polygons of one cell, as counter-clockwise vertex keys.
fn cell_pieces(
    lattice: &PointLattice,
    col: usize,
    row: usize,
    corners: [f64; 4],
    lower: f64,
    upper: f64,
) -> Vec<Vec<VertexKey>> {
    let classes = corners.map(|v| classify(v, lower, upper));
    if classes.iter().all(|&c| c == Class::Below) || classes.iter().all(|&c| c == Class::Above) {
        return Vec::new();
    }

    let corner_key = |k: usize| {
        let (dc, dr) = CELL_CORNERS[k % 4];
        VertexKey::Corner {
            col: col + dc,
            row: row + dr,
        }
    };
    let sides = [
        EdgeKey::Horizontal { col, row },
        EdgeKey::Vertical { col: col + 1, row },
        EdgeKey::Horizontal { col, row: row + 1 },
        EdgeKey::Vertical { col, row },
    ];

    let mut points: Vec<PerimeterPoint> = Vec::with_capacity(8);
    let mut push = |key: VertexKey, s: f64| {
        if points.last().map_or(true, |p| p.key != key) {
            points.push(PerimeterPoint { key, s });
        }
    };

    for side in 0..4 {
        let (p, q) = (corners[side], corners[(side + 1) % 4]);
        if classes[side] == Class::Inside {
            push(corner_key(side), side as f64);
        }

        let mut crossings: Vec<(f64, u8, f64)> = Vec::with_capacity(2);
        for (slot, threshold) in [(0u8, lower), (1u8, upper)] {
            if (p < threshold) != (q < threshold) {
                crossings.push(((threshold - p) / (q - p), slot, threshold));
            }
        }
        if crossings.len() == 2 && crossings[0].0 > crossings[1].0 {
            crossings.swap(0, 1);
        }

        for (t, slot, threshold) in crossings {
            let key = lattice.crossing(sides[side], threshold, slot);
            let s = if key == corner_key(side) {
                side as f64
            } else if key == corner_key(side + 1) {
                (side + 1) as f64
            } else {
                side as f64 + t
            };
            push(key, s);
        }
    }

    if points.len() > 1 && points[0].key == points[points.len() - 1].key {
        points.pop();
    }
    if points.len() < 3 {
        return Vec::new();
    }

    let keys = |range: &mut dyn Iterator<Item = usize>| -> Vec<VertexKey> {
        range.map(|i| points[i].key).collect()
    };

    let centre = classify(corners.iter().sum::<f64>() / 4.0, lower, upper);
    if centre == Class::Inside {
        return vec![keys(&mut (0..points.len()))];
    }

    // Cuts are (end, start) index pairs: a piece ends at `end` and the next
    // one begins at `start`. The perimeter is cut between two points when it
    // passes a corner on the same side of the band as the centre, and at a
    // point that is itself such a corner sitting exactly on a threshold.
    let n = points.len();
    let mut cuts: Vec<(usize, usize)> = Vec::new();
    for i in 0..n {
        let on_corner = (0..4).find(|&k| points[i].key == corner_key(k));
        if on_corner.map_or(false, |k| classes[k] == centre) {
            cuts.push((i, i));
            continue;
        }

        let a = points[i].s;
        let mut b = points[(i + 1) % n].s;
        if b <= a {
            b += 4.0;
        }
        let corner = a.floor() + 1.0;
        if corner < b && classes[corner as usize % 4] == centre {
            cuts.push((i, (i + 1) % n));
        }
    }

    if cuts.len() < 2 {
        return vec![keys(&mut (0..n))];
    }

    let mut pieces = Vec::with_capacity(cuts.len());
    for (idx, &(_, start)) in cuts.iter().enumerate() {
        let (end, _) = cuts[(idx + 1) % cuts.len()];
        let len = (end + n - start) % n;
        let piece = keys(&mut (0..=len).map(|k| (start + k) % n));
        if piece.len() >= 3 {
            pieces.push(piece);
        }
    }
    pieces
}

/// Directed half-edges with opposite pairs cancelled on insertion.
#[derive(Default)]
struct HalfEdges {
    edges: Vec<(VertexKey, VertexKey)>,
    alive: Vec<bool>,
    index: HashMap<(VertexKey, VertexKey), usize>,
}

impl HalfEdges {
    fn add_ring(&mut self, ring: &[VertexKey]) {
        for i in 0..ring.len() {
            self.add(ring[i], ring[(i + 1) % ring.len()]);
        }
    }

    fn add(&mut self, from: VertexKey, to: VertexKey) {
        if let Some(twin) = self.index.remove(&(to, from)) {
            self.alive[twin] = false;
            return;
        }
        self.index.insert((from, to), self.edges.len());
        self.edges.push((from, to));
        self.alive.push(true);
    }

    /// Chain the surviving edges into closed rings.
    ///
    /// Where several edges leave a vertex, the sharpest left turn is taken so
    /// rings that only touch at a point come out separate.
    fn into_rings(self, position: impl Fn(VertexKey) -> [f64; 2]) -> Vec<Vec<VertexKey>> {
        let live: Vec<(VertexKey, VertexKey)> = self
            .edges
            .into_iter()
            .zip(self.alive)
            .filter_map(|(edge, alive)| alive.then_some(edge))
            .collect();

        let mut outgoing: HashMap<VertexKey, Vec<usize>> = HashMap::new();
        for (i, &(from, _)) in live.iter().enumerate() {
            outgoing.entry(from).or_default().push(i);
        }

        let mut used = vec![false; live.len()];
        let mut rings = Vec::new();
        let mut broken = 0usize;

        for start in 0..live.len() {
            if used[start] {
                continue;
            }
            let mut ring = Vec::new();
            let mut current = start;
            loop {
                used[current] = true;
                let (from, to) = live[current];
                ring.push(from);

                let candidates: Vec<usize> = outgoing
                    .get(&to)
                    .map(|out| {
                        out.iter()
                            .copied()
                            .filter(|&e| e == start || !used[e])
                            .collect()
                    })
                    .unwrap_or_default();

                let next = match candidates.as_slice() {
                    [] => None,
                    [only] => Some(*only),
                    many => {
                        let [fx, fy] = position(from);
                        let [tx, ty] = position(to);
                        let incoming = [tx - fx, ty - fy];
                        many.iter().copied().fold(None, |best: Option<(usize, f64)>, e| {
                            let [nx, ny] = position(live[e].1);
                            let out = [nx - tx, ny - ty];
                            let turn = (incoming[0] * out[1] - incoming[1] * out[0])
                                .atan2(incoming[0] * out[0] + incoming[1] * out[1]);
                            match best {
                                Some((_, best_turn)) if best_turn >= turn => best,
                                _ => Some((e, turn)),
                            }
                        })
                        .map(|(e, _)| e)
                    }
                };

                match next {
                    Some(e) if e == start => break,
                    Some(e) => current = e,
                    None => {
                        broken += 1;
                        break;
                    }
                }
            }
            rings.push(ring);
        }

        if broken > 0 {
            warn!(broken, "Band boundary did not close");
        }
        rings
    }
}

/// Polygons of one band, rings closed and nested.
fn trace_band(lattice: &PointLattice, lower: f64, upper: f64) -> Vec<Vec<Ring>> {
    let mut half_edges = HalfEdges::default();
    for row in 0..lattice.rows() - 1 {
        for col in 0..lattice.columns() - 1 {
            let Some(corners) = lattice.cell_corners(col, row) else {
                continue;
            };
            for piece in cell_pieces(lattice, col, row, corners, lower, upper) {
                half_edges.add_ring(&piece);
            }
        }
    }

    let thresholds = [lower, upper];
    let position = |key: VertexKey| lattice.vertex_position(key, &thresholds);
    let boundary = half_edges
        .into_rings(&position)
        .into_iter()
        .map(|keys| rings::remove_collinear(keys.into_iter().map(position).collect()))
        .filter(|ring| ring.len() >= 3)
        .collect();

    rings::nest(boundary)
}

/// Extract isobands from a point grid.
///
/// See [`isobands_from_lattice`].
pub fn isobands(grid: &Grid, breaks: &[f64], options: &ContourOptions) -> GeoResult<Vec<Isoband>> {
    let lattice = PointLattice::from_grid(grid)?;
    isobands_from_lattice(&lattice, breaks, options)
}

/// Extract one isoband per pair of consecutive breaks.
///
/// Band `i` covers `[breaks[i], breaks[i + 1])`; values at or above the last
/// break fall in no band. Bands without any area are left out. Each result
/// carries `"<lower>-<upper>"` under `options.z_property`.
pub fn isobands_from_lattice(
    lattice: &PointLattice,
    breaks: &[f64],
    options: &ContourOptions,
) -> GeoResult<Vec<Isoband>> {
    let breaks = BreakSet::with_min_len(breaks, 2, "isobands")?;

    debug!(
        columns = lattice.columns(),
        rows = lattice.rows(),
        num_breaks = breaks.len(),
        parallel = options.parallel,
        "isobands input"
    );

    let skipped = lattice.nan_cell_count();
    if skipped > 0 {
        warn!(skipped, "Skipping lattice cells with NaN corners");
    }

    let build = |(index, (lower, upper)): (usize, (f64, f64))| {
        let label = format!("{}-{}", lower, upper);
        Isoband {
            lower,
            upper,
            polygons: trace_band(lattice, lower, upper),
            properties: options.properties_for(index, json!(label)),
        }
    };

    let bands: Vec<(f64, f64)> = breaks.bands().collect();
    let all: Vec<Isoband> = if options.parallel {
        bands.into_par_iter().enumerate().map(build).collect()
    } else {
        bands.into_iter().enumerate().map(build).collect()
    };

    let isobands: Vec<Isoband> = all.into_iter().filter(|band| !band.is_empty()).collect();

    debug!(
        num_isobands = isobands.len(),
        num_polygons = isobands.iter().map(|b| b.polygons.len()).sum::<usize>(),
        "Generated isobands"
    );

    Ok(isobands)
}

/// Isobands of a lattice given as point features, as a FeatureCollection.
///
/// Input values are read from `options.z_property`.
pub fn isobands_features(
    points: &FeatureCollection,
    breaks: &[f64],
    options: &ContourOptions,
) -> GeoResult<FeatureCollection> {
    let lattice = PointLattice::from_feature_collection(points, &options.z_property)?;
    let isobands = isobands_from_lattice(&lattice, breaks, options)?;
    Ok(isobands.iter().map(Isoband::to_feature).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice(columns: usize, rows: usize, values: Vec<f64>) -> PointLattice {
        let xs = (0..columns).map(|i| i as f64).collect();
        let ys = (0..rows).map(|i| i as f64).collect();
        PointLattice::new(xs, ys, values).unwrap()
    }

    #[test]
    fn test_classify_half_open() {
        assert_eq!(classify(4.9, 5.0, 10.0), Class::Below);
        assert_eq!(classify(5.0, 5.0, 10.0), Class::Inside);
        assert_eq!(classify(10.0, 5.0, 10.0), Class::Above);
    }

    #[test]
    fn test_cell_fully_inside() {
        let flat = lattice(2, 2, vec![7.0; 4]);
        let pieces = cell_pieces(&flat, 0, 0, [7.0; 4], 5.0, 10.0);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].len(), 4);
        assert!(cell_pieces(&flat, 0, 0, [7.0; 4], 0.0, 5.0).is_empty());
    }

    #[test]
    fn test_cell_with_one_corner_inside() {
        let grid = lattice(2, 2, vec![6.0, 0.0, 0.0, 0.0]);
        let pieces = cell_pieces(&grid, 0, 0, [6.0, 0.0, 0.0, 0.0], 3.0, 10.0);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0][0], VertexKey::Corner { col: 0, row: 0 });
        assert_eq!(pieces[0].len(), 3);
    }

    #[test]
    fn test_saddle_split_by_centre() {
        // tl and br inside, tr and bl below; centre 5.
        let values = vec![0.0, 10.0, 10.0, 0.0];
        let grid = lattice(2, 2, values);
        let corners = [0.0, 10.0, 0.0, 10.0];

        let joined = cell_pieces(&grid, 0, 0, corners, 5.0, 20.0);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].len(), 6);

        let split = cell_pieces(&grid, 0, 0, corners, 6.0, 20.0);
        assert_eq!(split.len(), 2);
        assert!(split.iter().all(|piece| piece.len() == 3));
    }

    #[test]
    fn test_corner_on_upper_break_cuts_saddle() {
        // bl 0, br 3, tr 0, tl 1; the centre average is 1, level with tl.
        let grid = lattice(2, 2, vec![0.0, 3.0, 1.0, 0.0]);
        let corners = [0.0, 3.0, 0.0, 1.0];
        let tl = VertexKey::Corner { col: 0, row: 1 };

        let lower = cell_pieces(&grid, 0, 0, corners, 0.0, 1.0);
        assert_eq!(lower.len(), 2);
        for piece in &lower {
            assert_eq!(piece.len(), 3);
            assert!(piece.contains(&tl));
        }

        let upper = cell_pieces(&grid, 0, 0, corners, 1.0, 2.0);
        assert_eq!(upper.len(), 1);
        assert_eq!(upper[0].len(), 5);
    }

    #[test]
    fn test_half_edges_cancel() {
        let a = VertexKey::Corner { col: 0, row: 0 };
        let b = VertexKey::Corner { col: 1, row: 0 };
        let c = VertexKey::Corner { col: 1, row: 1 };
        let d = VertexKey::Corner { col: 0, row: 1 };
        let e = VertexKey::Corner { col: 2, row: 0 };
        let f = VertexKey::Corner { col: 2, row: 1 };

        let mut half_edges = HalfEdges::default();
        half_edges.add_ring(&[a, b, c, d]);
        half_edges.add_ring(&[b, e, f, c]);
        let live = half_edges.alive.iter().filter(|&&alive| alive).count();
        assert_eq!(live, 6);

        let grid = lattice(3, 2, vec![0.0; 6]);
        let rings = half_edges.into_rings(|k| grid.vertex_position(k, &[]));
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 6);
    }

    #[test]
    fn test_saddle_keeps_diagonal_blocks_apart() {
        let values = vec![
            1.0, 1.0, 9.0, //
            1.0, 1.0, 9.0, //
            9.0, 9.0, 9.0,
        ];
        let grid = lattice(3, 3, values);
        let polygons = trace_band(&grid, 0.0, 5.0);
        assert_eq!(polygons.len(), 1);

        // Low blocks meet diagonally at a saddle whose centre is high.
        let values = vec![
            1.0, 1.0, 9.0, 9.0, //
            1.0, 1.0, 9.0, 9.0, //
            9.0, 9.0, 1.0, 1.0, //
            9.0, 9.0, 1.0, 1.0,
        ];
        let grid = lattice(4, 4, values);
        let polygons = trace_band(&grid, 0.0, 5.0);
        assert_eq!(polygons.len(), 2);
        for polygon in &polygons {
            assert_eq!(polygon.len(), 1);
            assert!(rings::signed_area(&polygon[0]) > 0.0);
        }
    }

    #[test]
    fn test_label() {
        let band = Isoband {
            lower: 0.0,
            upper: 5.5,
            polygons: vec![],
            properties: Properties::new(),
        };
        assert_eq!(band.label(), "0-5.5");
    }
}
