//! Isoband and isoline extraction from regular point lattices.
//!
//! Input is a point grid from the interpolation crate, a [`PointLattice`]
//! built directly, or point features that form a complete lattice. Output is
//! typed [`Isoband`] / [`Isoline`] values that convert to GeoJSON
//! MultiPolygon / MultiLineString features.
//!
//! # Classification
//!
//! A value equal to a break counts as at or above it. Band `i` therefore
//! covers `[breaks[i], breaks[i + 1])`, and an isoline at `v` separates
//! values `< v` from values `>= v`. A field that is constant at a break has
//! no isoline there but lies inside the band starting at that break.
//!
//! # Example
//!
//! ```
//! use contour::{isobands_from_lattice, isolines_from_lattice, ContourOptions, PointLattice};
//!
//! let lattice = PointLattice::new(
//!     vec![0.0, 1.0, 2.0],
//!     vec![0.0, 1.0, 2.0],
//!     vec![0.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 0.0],
//! )
//! .unwrap();
//! let options = ContourOptions::default();
//!
//! let lines = isolines_from_lattice(&lattice, &[5.0], &options).unwrap();
//! assert_eq!(lines[0].closed_count(), 1);
//!
//! let bands = isobands_from_lattice(&lattice, &[0.0, 5.0, 20.0], &options).unwrap();
//! assert_eq!(bands.len(), 2);
//! ```

pub mod breaks;
pub mod isobands;
pub mod isolines;
pub mod lattice;
pub mod options;
mod rings;

pub use breaks::{generate_breaks, BreakSet};
pub use isobands::{isobands, isobands_features, isobands_from_lattice, Isoband};
pub use isolines::{isolines, isolines_features, isolines_from_lattice, Isoline};
pub use lattice::PointLattice;
pub use options::ContourOptions;

pub use geo_common::{GeoError, GeoResult};
