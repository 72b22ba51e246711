//! Spatial interpolation and contouring of scattered geographic samples.
//!
//! This crate re-exports the workspace components under one name:
//!
//! - [`interpolation`]: IDW estimation onto point, square, hex or triangle
//!   grids, plus planar point lookup inside a triangle.
//! - [`contour`]: isobands and isolines from point lattices.
//! - [`geo_common`]: GeoJSON types, bounding boxes, units and errors.
//!
//! # Example
//!
//! ```
//! use geogrid::{
//!     interpolate, isobands, BoundingBox, ContourOptions, GridTopology, InterpolationConfig,
//!     SamplePoint,
//! };
//!
//! let samples = vec![
//!     SamplePoint::new(10.0, 10.0, 0.0),
//!     SamplePoint::new(11.0, 11.0, 30.0),
//!     SamplePoint::new(10.1, 10.9, 12.0),
//! ];
//! let config = InterpolationConfig::default()
//!     .with_grid_type(GridTopology::Point)
//!     .with_bbox(BoundingBox::new(10.0, 10.0, 11.0, 11.0));
//!
//! let grid = interpolate(&samples, 10.0, &config).unwrap();
//! let bands = isobands(&grid, &[0.0, 10.0, 20.0, 30.0], &ContourOptions::default()).unwrap();
//! assert!(!bands.is_empty());
//! ```

pub use contour;
pub use geo_common;
pub use interpolation;

pub use contour::{
    generate_breaks, isobands, isobands_features, isobands_from_lattice, isolines,
    isolines_features, isolines_from_lattice, BreakSet, ContourOptions, Isoband, Isoline,
    PointLattice,
};
pub use geo_common::{
    distance, BoundingBox, Feature, FeatureCollection, GeoError, GeoResult, Geometry, LengthUnit,
    Position, Properties,
};
pub use interpolation::{
    estimate, interpolate, interpolate_features, planepoint, planepoint_feature, CellGeometry,
    Grid, GridCell, GridTopology, InterpolationConfig, LatticeShape, Resolution, SamplePoint,
    Triangle,
};

/// IDW grid of point features with the cell size given in metres.
///
/// The cell size is converted to kilometres and used in place of the
/// configured units; every other setting comes from `config`.
pub fn interpolate_meters(
    points: &FeatureCollection,
    cell_size_m: f64,
    config: &InterpolationConfig,
) -> GeoResult<FeatureCollection> {
    let cell_size_km = cell_size_m / 1000.0;
    tracing::debug!(cell_size_m, cell_size_km, "interpolate_meters");

    let config = config.clone().with_units(LengthUnit::Kilometers);
    interpolate_features(points, cell_size_km, &config)
}
