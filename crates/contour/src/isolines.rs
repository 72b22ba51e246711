//! Contour lines (isolines) using the marching squares algorithm.
//!
//! Each 2x2 lattice cell is classified by which corners are at or above the
//! level, giving a 4-bit mask that indexes [`CASES`]. Segments are keyed by
//! lattice position and stitched into polylines through an adjacency graph.

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

/// All lines at one break value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Isoline {
    pub level: f64,
    /// Polylines; a closed line repeats its first position at the end.
    pub lines: Vec<Vec<[f64; 2]>>,
    pub properties: Properties,
}

impl Isoline {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines that end where they start.
    pub fn closed_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| line.len() > 2 && line.first() == line.last())
            .count()
    }

    /// GeoJSON MultiLineString feature.
    pub fn to_feature(&self) -> Feature {
        let coordinates = self
            .lines
            .iter()
            .map(|line| line.iter().map(|p| p.to_vec()).collect())
            .collect();
        Feature::new(Geometry::MultiLineString { coordinates }).with_properties(self.properties.clone())
    }
}

/// Cell side a segment end lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

use Side::*;

/// Segments per corner mask. Bits: top-left 1, top-right 2, bottom-right 4,
/// bottom-left 8. Saddles 5 and 10 list the split form where the two
/// above-level corners stay separate.
const CASES: [&[(Side, Side)]; 16] = [
    &[],                               // 0
    &[(Left, Top)],                    // 1
    &[(Top, Right)],                   // 2
    &[(Left, Right)],                  // 3
    &[(Right, Bottom)],                // 4
    &[(Left, Top), (Right, Bottom)],   // 5 saddle
    &[(Top, Bottom)],                  // 6
    &[(Left, Bottom)],                 // 7
    &[(Left, Bottom)],                 // 8
    &[(Top, Bottom)],                  // 9
    &[(Top, Right), (Left, Bottom)],   // 10 saddle
    &[(Right, Bottom)],                // 11
    &[(Left, Right)],                  // 12
    &[(Top, Right)],                   // 13
    &[(Left, Top)],                    // 14
    &[],                               // 15
];

/// Saddle segments when the cell centre is also at or above the level,
/// joining the two above-level corners.
const SADDLE_5_JOINED: &[(Side, Side)] = &[(Top, Right), (Left, Bottom)];
const SADDLE_10_JOINED: &[(Side, Side)] = &[(Left, Top), (Right, Bottom)];

fn side_edge(side: Side, col: usize, row: usize) -> EdgeKey {
    match side {
        Top => EdgeKey::Horizontal { col, row: row + 1 },
        Right => EdgeKey::Vertical { col: col + 1, row },
        Bottom => EdgeKey::Horizontal { col, row },
        Left => EdgeKey::Vertical { col, row },
    }
}

type Segment = (VertexKey, VertexKey);

/// Marching squares over the whole lattice for one level.
///
/// Returns unique, non-degenerate segments in cell order. A run of lattice
/// points exactly at the level with nothing above it on either side is a
/// ridge of zero width; the region at or above the level has no area there,
/// so those segments are dropped.
fn march_squares(lattice: &PointLattice, level: f64) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut seen: HashMap<Segment, usize> = HashMap::new();

    for row in 0..lattice.rows() - 1 {
        for col in 0..lattice.columns() - 1 {
            let Some([bl, br, tr, tl]) = lattice.cell_corners(col, row) else {
                continue;
            };

            let mut mask = 0usize;
            if tl >= level {
                mask |= 1;
            }
            if tr >= level {
                mask |= 2;
            }
            if br >= level {
                mask |= 4;
            }
            if bl >= level {
                mask |= 8;
            }

            let centre_above = (tl + tr + br + bl) / 4.0 >= level;
            let sides = match mask {
                5 if centre_above => SADDLE_5_JOINED,
                10 if centre_above => SADDLE_10_JOINED,
                _ => CASES[mask],
            };

            for &(a, b) in sides {
                let from = lattice.crossing(side_edge(a, col, row), level, 0);
                let to = lattice.crossing(side_edge(b, col, row), level, 0);
                if from == to {
                    continue;
                }
                let normalized = if from < to { (from, to) } else { (to, from) };
                let count = seen.entry(normalized).or_insert(0);
                if *count == 0 {
                    segments.push((from, to));
                }
                *count += 1;
            }
        }
    }

    segments.retain(|&(from, to)| {
        let normalized = if from < to { (from, to) } else { (to, from) };
        match lattice_edge(normalized) {
            Some(edge) => seen[&normalized] < adjacent_cells(lattice, edge),
            None => true,
        }
    });
    segments
}

/// The lattice edge a segment runs along, when both ends are lattice points
/// one step apart. `segment` must be in ascending order.
fn lattice_edge(segment: Segment) -> Option<EdgeKey> {
    match segment {
        (VertexKey::Corner { col: c0, row: r0 }, VertexKey::Corner { col: c1, row: r1 }) => {
            if r0 == r1 && c1 == c0 + 1 {
                Some(EdgeKey::Horizontal { col: c0, row: r0 })
            } else if c0 == c1 && r1 == r0 + 1 {
                Some(EdgeKey::Vertical { col: c0, row: r0 })
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Number of lattice cells sharing `edge` (1 on the border, else 2).
fn adjacent_cells(lattice: &PointLattice, edge: EdgeKey) -> usize {
    let (index, len) = match edge {
        EdgeKey::Horizontal { row, .. } => (row, lattice.rows()),
        EdgeKey::Vertical { col, .. } => (col, lattice.columns()),
    };
    usize::from(index > 0) + usize::from(index + 1 < len)
}

/// Join segments into polylines.
///
/// Chains that start at an odd-degree vertex (open lines) are walked first,
/// then whatever remains forms closed loops.
fn connect_segments(segments: &[Segment]) -> Vec<Vec<VertexKey>> {
    let mut adjacency: HashMap<VertexKey, Vec<usize>> = HashMap::new();
    for (i, &(a, b)) in segments.iter().enumerate() {
        adjacency.entry(a).or_default().push(i);
        adjacency.entry(b).or_default().push(i);
    }
    let is_end = |v: &VertexKey| adjacency.get(v).map_or(false, |s| s.len() % 2 == 1);

    let mut used = vec![false; segments.len()];
    let mut chains = Vec::new();

    let walk = |start: VertexKey, used: &mut Vec<bool>| {
        let mut chain = vec![start];
        let mut current = start;
        while let Some(&next) = adjacency
            .get(&current)
            .and_then(|incident| incident.iter().find(|&&i| !used[i]))
        {
            used[next] = true;
            let (a, b) = segments[next];
            current = if a == current { b } else { a };
            chain.push(current);
        }
        chain
    };

    for i in 0..segments.len() {
        if used[i] {
            continue;
        }
        let (a, b) = segments[i];
        let start = if is_end(&a) {
            a
        } else if is_end(&b) {
            b
        } else {
            continue;
        };
        chains.push(walk(start, &mut used));
    }

    for i in 0..segments.len() {
        if !used[i] {
            chains.push(walk(segments[i].0, &mut used));
        }
    }

    chains
}

/// Lines for a single level, in lattice coordinates.
fn trace_level(lattice: &PointLattice, level: f64) -> Vec<Vec<[f64; 2]>> {
    let segments = march_squares(lattice, level);
    connect_segments(&segments)
        .into_iter()
        .filter(|chain| chain.len() >= 2)
        .map(|chain| {
            chain
                .into_iter()
                .map(|key| lattice.vertex_position(key, &[level]))
                .collect()
        })
        .collect()
}

/// Extract isolines from a point grid.
///
/// See [`isolines_from_lattice`].
pub fn isolines(grid: &Grid, breaks: &[f64], options: &ContourOptions) -> GeoResult<Vec<Isoline>> {
    let lattice = PointLattice::from_grid(grid)?;
    isolines_from_lattice(&lattice, breaks, options)
}

/// Extract one isoline per break.
///
/// A lattice value equal to a break counts as above it. Breaks that produce
/// no line (including a flat field exactly at the break) are left out.
/// Each result carries the break under `options.z_property`.
pub fn isolines_from_lattice(
    lattice: &PointLattice,
    breaks: &[f64],
    options: &ContourOptions,
) -> GeoResult<Vec<Isoline>> {
    let breaks = BreakSet::with_min_len(breaks, 1, "isolines")?;

    debug!(
        columns = lattice.columns(),
        rows = lattice.rows(),
        num_breaks = breaks.len(),
        parallel = options.parallel,
        "isolines input"
    );

    let skipped = lattice.nan_cell_count();
    if skipped > 0 {
        warn!(skipped, "Skipping lattice cells with NaN corners");
    }

    let build = |(index, &level): (usize, &f64)| Isoline {
        level,
        lines: trace_level(lattice, level),
        properties: options.properties_for(index, json!(level)),
    };

    let all: Vec<Isoline> = if options.parallel {
        breaks.values().par_iter().enumerate().map(build).collect()
    } else {
        breaks.values().iter().enumerate().map(build).collect()
    };

    let isolines: Vec<Isoline> = all.into_iter().filter(|line| !line.is_empty()).collect();

    debug!(
        num_isolines = isolines.len(),
        total_points = isolines
            .iter()
            .flat_map(|l| &l.lines)
            .map(|line| line.len())
            .sum::<usize>(),
        "Generated isolines"
    );

    Ok(isolines)
}

/// Isolines of a lattice given as point features, as a FeatureCollection.
///
/// Input values are read from `options.z_property`.
pub fn isolines_features(
    points: &FeatureCollection,
    breaks: &[f64],
    options: &ContourOptions,
) -> GeoResult<FeatureCollection> {
    let lattice = PointLattice::from_feature_collection(points, &options.z_property)?;
    let isolines = isolines_from_lattice(&lattice, breaks, options)?;
    Ok(isolines.iter().map(Isoline::to_feature).collect())
}
