//! Inverse Distance Weighting over regular grids.
//!
//! Scattered samples are turned into a regular grid of estimated values.
//! The grid can be a point lattice, square cells, hexagons or triangles; the
//! topology only changes the output geometry, never the estimate.
//!
//! # Architecture
//!
//! ```text
//! FeatureCollection of points
//!      │
//!      ▼
//! SamplePoint::from_features(z_property)
//!      │
//!      ▼
//! grid::build_cells(bbox, cell_size, units, topology)
//!      │
//!      ▼
//! idw::estimate  ── per cell: Σ wᵢ·vᵢ / Σ wᵢ,  wᵢ = 1 / dᵢ^weight
//!      │
//!      ▼
//!   Grid (immutable) ──► contour extraction / GeoJSON output
//! ```
//!
//! # Example
//!
//! ```
//! use interpolation::{estimate, GridTopology, SamplePoint};
//! use geo_common::LengthUnit;
//!
//! let samples = vec![
//!     SamplePoint::new(0.0, 0.0, 10.0),
//!     SamplePoint::new(1.0, 1.0, 20.0),
//! ];
//! let grid = estimate(&samples, 25.0, LengthUnit::Kilometers, GridTopology::Point, 2.0).unwrap();
//! assert!(grid.values().all(|v| (10.0..=20.0).contains(&v)));
//! ```

pub mod config;
pub mod grid;
pub mod idw;
pub mod planepoint;
pub mod sample;

pub use config::InterpolationConfig;
pub use geo_common::{GeoError, GeoResult};
pub use grid::{CellGeometry, Grid, GridCell, GridTopology, LatticeShape, Resolution};
pub use idw::{estimate, interpolate, interpolate_features};
pub use planepoint::{planepoint, planepoint_feature, Triangle};
pub use sample::SamplePoint;
