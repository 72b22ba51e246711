//! Regular grid geometry.
//!
//! A grid is laid out inside a bounding box from a cell size measured along
//! the Earth's surface. The cell size is converted to degrees using the
//! great-circle width and height of the box, so cells are square in ground
//! distance at the box's southern edge.

use geo_common::geojson::close_ring;
use geo_common::{
    distance, BoundingBox, Feature, FeatureCollection, GeoError, GeoResult, Geometry, LengthUnit,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape of the cells making up a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GridTopology {
    /// Axis-aligned square polygons.
    #[default]
    Square,
    /// Bare lattice points.
    Point,
    /// Flat-topped hexagons.
    Hex,
    /// Square cells bisected along alternating diagonals.
    Triangle,
}

impl GridTopology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Point => "point",
            Self::Hex => "hex",
            Self::Triangle => "triangle",
        }
    }
}

impl FromStr for GridTopology {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "point" | "points" => Ok(Self::Point),
            "hex" | "hexagon" => Ok(Self::Hex),
            "triangle" | "tri" => Ok(Self::Triangle),
            other => Err(GeoError::invalid_input(format!("unknown grid type '{}'", other))),
        }
    }
}

impl fmt::Display for GridTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Geometry of a single grid cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellGeometry {
    Point([f64; 2]),
    /// Closed counter-clockwise ring (first vertex repeated at the end).
    Polygon(Vec<[f64; 2]>),
}

impl CellGeometry {
    /// Location used for estimation: the point itself, or the vertex centroid.
    pub fn center(&self) -> [f64; 2] {
        match self {
            CellGeometry::Point(p) => *p,
            CellGeometry::Polygon(ring) => {
                // The closing vertex would bias the mean.
                let open = &ring[..ring.len().saturating_sub(1).max(1)];
                let n = open.len() as f64;
                let (sx, sy) = open
                    .iter()
                    .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
                [sx / n, sy / n]
            }
        }
    }

    fn to_geometry(&self) -> Geometry {
        match self {
            CellGeometry::Point(p) => Geometry::point(p[0], p[1]),
            CellGeometry::Polygon(ring) => Geometry::Polygon {
                coordinates: vec![close_ring(ring)],
            },
        }
    }
}

/// A cell with its estimated value.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub geometry: CellGeometry,
    pub value: f64,
}

impl GridCell {
    pub fn center(&self) -> [f64; 2] {
        self.geometry.center()
    }
}

/// Dimensions of a point lattice. Cells are stored row-major, rows running
/// south to north and columns west to east.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeShape {
    pub columns: usize,
    pub rows: usize,
}

impl LatticeShape {
    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }

    /// Flat index of `(column, row)`.
    pub fn index(&self, column: usize, row: usize) -> usize {
        row * self.columns + column
    }
}

/// Cell size a grid was generated with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub cell_size: f64,
    pub units: LengthUnit,
}

/// An immutable grid of valued cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    topology: GridTopology,
    bbox: BoundingBox,
    resolution: Option<Resolution>,
    lattice: Option<LatticeShape>,
    cells: Vec<GridCell>,
}

impl Grid {
    pub(crate) fn from_layout(layout: GridLayout, values: Vec<f64>) -> Self {
        debug_assert_eq!(layout.cells.len(), values.len());
        let cells = layout
            .cells
            .into_iter()
            .zip(values)
            .map(|(geometry, value)| GridCell { geometry, value })
            .collect();

        Self {
            topology: layout.topology,
            bbox: layout.bbox,
            resolution: Some(layout.resolution),
            lattice: layout.lattice,
            cells,
        }
    }

    /// Build a point grid from known lattice coordinates and values.
    ///
    /// `xs` and `ys` must be strictly increasing; `values` is row-major with
    /// `xs.len()` columns and `ys.len()` rows, the first row at `ys[0]`.
    pub fn point_lattice(xs: &[f64], ys: &[f64], values: Vec<f64>) -> GeoResult<Self> {
        let strictly_increasing = |axis: &[f64]| {
            axis.iter().all(|v| v.is_finite()) && axis.windows(2).all(|w| w[0] < w[1])
        };
        if xs.is_empty() || ys.is_empty() {
            return Err(GeoError::invalid_input("lattice axes must not be empty"));
        }
        if !strictly_increasing(xs) || !strictly_increasing(ys) {
            return Err(GeoError::invalid_input(
                "lattice axes must be finite and strictly increasing",
            ));
        }
        let shape = LatticeShape {
            columns: xs.len(),
            rows: ys.len(),
        };
        if values.len() != shape.len() {
            return Err(GeoError::invalid_input(format!(
                "expected {} lattice values ({}x{}), got {}",
                shape.len(),
                shape.columns,
                shape.rows,
                values.len()
            )));
        }

        let mut cells = Vec::with_capacity(shape.len());
        for &y in ys {
            for &x in xs {
                cells.push(CellGeometry::Point([x, y]));
            }
        }
        let cells = cells
            .into_iter()
            .zip(values)
            .map(|(geometry, value)| GridCell { geometry, value })
            .collect();

        Ok(Self {
            topology: GridTopology::Point,
            bbox: BoundingBox::new(xs[0], ys[0], xs[xs.len() - 1], ys[ys.len() - 1]),
            resolution: None,
            lattice: Some(shape),
            cells,
        })
    }

    pub fn topology(&self) -> GridTopology {
        self.topology
    }

    /// Extent the grid was laid out in.
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Cell size, when the grid was generated rather than supplied.
    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    /// Lattice dimensions; only point grids have one.
    pub fn lattice(&self) -> Option<LatticeShape> {
        self.lattice
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().map(|c| c.value)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Export as GeoJSON with each value stored under `z_property`.
    pub fn to_feature_collection(&self, z_property: &str) -> FeatureCollection {
        self.cells
            .iter()
            .map(|cell| {
                Feature::new(cell.geometry.to_geometry()).with_property(z_property, cell.value)
            })
            .collect()
    }
}

/// Cell geometry before values are attached.
#[derive(Debug, Clone)]
pub(crate) struct GridLayout {
    pub topology: GridTopology,
    pub bbox: BoundingBox,
    pub resolution: Resolution,
    pub lattice: Option<LatticeShape>,
    pub cells: Vec<CellGeometry>,
}

/// Lay out the cells of a grid inside `bbox`.
///
/// A box with no width or height (a single sample, or samples on one
/// meridian or parallel) is widened along the flat axis first. A cell size
/// too large for the box gives a layout with no cells.
pub(crate) fn build_cells(
    bbox: BoundingBox,
    cell_size: f64,
    units: LengthUnit,
    topology: GridTopology,
) -> GeoResult<GridLayout> {
    if !(cell_size > 0.0) || !cell_size.is_finite() {
        return Err(GeoError::invalid_input(format!(
            "cell size must be positive and finite, got {}",
            cell_size
        )));
    }
    let bbox = if bbox.has_area() {
        bbox
    } else {
        pad_flat_axes(bbox, cell_size, units)
    };

    let (cells, lattice) = match topology {
        GridTopology::Point => {
            let (cells, shape) = point_cells(&bbox, cell_size, units);
            (cells, Some(shape))
        }
        GridTopology::Square => (square_cells(&bbox, cell_size, units, false), None),
        GridTopology::Triangle => (square_cells(&bbox, cell_size, units, true), None),
        GridTopology::Hex => (hex_cells(&bbox, cell_size, units), None),
    };

    if cells.is_empty() {
        tracing::warn!(
            cell_size,
            units = %units,
            grid_type = %topology,
            bbox = ?bbox.to_array(),
            "No cells fit in the bounding box"
        );
    }

    Ok(GridLayout {
        topology,
        bbox,
        resolution: Resolution { cell_size, units },
        lattice,
        cells,
    })
}

/// Widen each zero-length axis of `bbox` by two cells on either side, room
/// for a hexagon whose radius is the cell size.
fn pad_flat_axes(bbox: BoundingBox, cell_size: f64, units: LengthUnit) -> BoundingBox {
    let pad = 2.0 * units.to_radians(cell_size).to_degrees();
    let mut padded = bbox;
    if !(bbox.width() > 0.0) {
        // Degrees of longitude shrink towards the poles.
        let cos_lat = bbox.center()[1].to_radians().cos().abs();
        let pad_x = if cos_lat > 0.0 {
            (pad / cos_lat).min(180.0)
        } else {
            180.0
        };
        padded.min_x -= pad_x;
        padded.max_x += pad_x;
    }
    if !(bbox.height() > 0.0) {
        padded.min_y -= pad;
        padded.max_y += pad;
    }
    padded
}

/// Cell width and height in coordinate degrees.
fn cell_extent(bbox: &BoundingBox, cell_side: f64, units: LengthUnit) -> (f64, f64) {
    let (west, south, east, north) = (bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y);
    let x_fraction = cell_side / distance([west, south], [east, south], units);
    let y_fraction = cell_side / distance([west, south], [west, north], units);
    (x_fraction * bbox.width(), y_fraction * bbox.height())
}

/// Number of whole cells along an axis; non-finite ratios give zero.
///
/// The ratio is nudged up slightly so a span that is an exact multiple of the
/// cell is not lost to rounding in the degree conversion.
fn whole_cells(span: f64, cell: f64) -> usize {
    let count = (span / cell * (1.0 + 1e-9)).floor();
    if count.is_finite() && count > 0.0 {
        count as usize
    } else {
        0
    }
}

fn point_cells(
    bbox: &BoundingBox,
    cell_size: f64,
    units: LengthUnit,
) -> (Vec<CellGeometry>, LatticeShape) {
    let (cell_width, cell_height) = cell_extent(bbox, cell_size, units);
    let columns = whole_cells(bbox.width(), cell_width);
    let rows = whole_cells(bbox.height(), cell_height);

    // Centre the lattice: split the leftover margin on both sides.
    let delta_x = (bbox.width() - columns as f64 * cell_width) / 2.0;
    let delta_y = (bbox.height() - rows as f64 * cell_height) / 2.0;

    let shape = LatticeShape {
        columns: columns + 1,
        rows: rows + 1,
    };
    let mut cells = Vec::with_capacity(shape.len());
    for row in 0..shape.rows {
        let y = bbox.min_y + delta_y + row as f64 * cell_height;
        for column in 0..shape.columns {
            let x = bbox.min_x + delta_x + column as f64 * cell_width;
            cells.push(CellGeometry::Point([x, y]));
        }
    }
    (cells, shape)
}

fn square_cells(
    bbox: &BoundingBox,
    cell_size: f64,
    units: LengthUnit,
    bisect: bool,
) -> Vec<CellGeometry> {
    let (w, h) = cell_extent(bbox, cell_size, units);
    let columns = whole_cells(bbox.width(), w);
    let rows = whole_cells(bbox.height(), h);
    let delta_x = (bbox.width() - columns as f64 * w) / 2.0;
    let delta_y = (bbox.height() - rows as f64 * h) / 2.0;

    let per_cell = if bisect { 2 } else { 1 };
    let mut cells = Vec::with_capacity(columns * rows * per_cell);
    for row in 0..rows {
        let y = bbox.min_y + delta_y + row as f64 * h;
        for column in 0..columns {
            let x = bbox.min_x + delta_x + column as f64 * w;
            let sw = [x, y];
            let se = [x + w, y];
            let ne = [x + w, y + h];
            let nw = [x, y + h];

            if !bisect {
                cells.push(CellGeometry::Polygon(vec![sw, se, ne, nw, sw]));
            } else if (column + row) % 2 == 0 {
                // Diagonal from north-west to south-east.
                cells.push(CellGeometry::Polygon(vec![sw, se, nw, sw]));
                cells.push(CellGeometry::Polygon(vec![se, ne, nw, se]));
            } else {
                // Diagonal from south-west to north-east.
                cells.push(CellGeometry::Polygon(vec![sw, se, ne, sw]));
                cells.push(CellGeometry::Polygon(vec![sw, ne, nw, sw]));
            }
        }
    }
    cells
}

fn hex_cells(bbox: &BoundingBox, cell_size: f64, units: LengthUnit) -> Vec<CellGeometry> {
    let (west, south, east, north) = (bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y);
    let [center_x, center_y] = bbox.center();

    // The cell size is the hexagon radius, measured across the middle of the box.
    let x_fraction = cell_size * 2.0 / distance([west, center_y], [east, center_y], units);
    let cell_width = x_fraction * (east - west);
    let y_fraction = cell_size * 2.0 / distance([center_x, south], [center_x, north], units);
    let cell_height = y_fraction * (north - south);

    let radius = cell_width / 2.0;
    let hex_width = radius * 2.0;
    let hex_height = 3f64.sqrt() / 2.0 * cell_height;
    let box_width = east - west;
    let box_height = north - south;

    let x_interval = 0.75 * hex_width;
    let y_interval = hex_height;

    let x_span = (box_width - hex_width) / (hex_width - radius / 2.0);
    let y_span = (box_height - hex_height) / hex_height;
    if !(x_span >= 0.0) || !(y_span >= 0.0) {
        return Vec::new();
    }
    let x_count = x_span.floor() as usize;
    let y_count = y_span.floor() as usize;

    let x_adjust = (x_count as f64 * x_interval - radius / 2.0 - box_width) / 2.0 - radius / 2.0
        + x_interval / 2.0;
    let y_adjust = (box_height - y_count as f64 * hex_height) / 2.0;

    let (rx, ry) = (cell_width / 2.0, cell_height / 2.0);
    let unit_circle: Vec<(f64, f64)> = (0..6)
        .map(|i| {
            let angle = std::f64::consts::PI / 3.0 * i as f64;
            (angle.cos(), angle.sin())
        })
        .collect();

    let mut cells = Vec::new();
    for x in 0..=x_count {
        let odd = x % 2 == 1;
        for y in 0..=y_count {
            // Odd columns are shifted down half a hexagon; their first row
            // would fall outside the box.
            if y == 0 && odd {
                continue;
            }
            let cx = x as f64 * x_interval + west - x_adjust;
            let mut cy = y as f64 * y_interval + south + y_adjust;
            if odd {
                cy -= hex_height / 2.0;
            }

            let mut ring: Vec<[f64; 2]> = unit_circle
                .iter()
                .map(|(cos, sin)| [cx + rx * cos, cy + ry * sin])
                .collect();
            ring.push(ring[0]);
            cells.push(CellGeometry::Polygon(ring));
        }
    }
    cells
}
