//! Tests for IDW grid estimation.

use geo_common::{BoundingBox, GeoError, Geometry, LengthUnit};
use interpolation::{
    estimate, interpolate, interpolate_features, GridTopology, InterpolationConfig, SamplePoint,
};
use test_utils::{assert_approx_eq, fixtures, random_point_features};

const ALL_TOPOLOGIES: [GridTopology; 4] = [
    GridTopology::Square,
    GridTopology::Point,
    GridTopology::Hex,
    GridTopology::Triangle,
];

fn scattered_samples() -> Vec<SamplePoint> {
    let fc = random_point_features(25, [10.0, 10.0, 14.0, 13.0], "z", (-20.0, 80.0), 11);
    SamplePoint::from_features(&fc, "z").unwrap()
}

// ============================================================================
// Convexity
// ============================================================================

#[test]
fn test_values_within_sample_range_all_topologies() {
    let samples = scattered_samples();
    let (lo, hi) = interpolation::sample::value_range(&samples).unwrap();

    for topology in ALL_TOPOLOGIES {
        for weight in [0.5, 1.0, 2.0, 3.0] {
            let grid = estimate(&samples, 40.0, LengthUnit::Kilometers, topology, weight).unwrap();
            assert!(!grid.is_empty(), "{} produced no cells", topology);
            for v in grid.values() {
                assert!(
                    v >= lo - 1e-9 && v <= hi + 1e-9,
                    "{} weight {}: value {} outside [{}, {}]",
                    topology,
                    weight,
                    v,
                    lo,
                    hi
                );
            }
        }
    }
}

#[test]
fn test_single_sample_fills_grid() {
    let samples = vec![SamplePoint::new(10.0, 10.0, 3.0)];
    for topology in ALL_TOPOLOGIES {
        let grid = estimate(&samples, 10.0, LengthUnit::Kilometers, topology, 2.0).unwrap();
        assert!(!grid.is_empty(), "{} produced no cells", topology);
        assert!(grid.bbox().contains_point(10.0, 10.0));
        for v in grid.values() {
            assert_approx_eq!(v, 3.0, 1e-9);
        }
    }

    // The padded point lattice is large enough to contour.
    let grid = estimate(&samples, 10.0, LengthUnit::Kilometers, GridTopology::Point, 2.0).unwrap();
    let shape = grid.lattice().unwrap();
    assert!(shape.columns >= 2 && shape.rows >= 2);
}

#[test]
fn test_samples_on_one_line_fill_grid() {
    let on_parallel = vec![
        SamplePoint::new(10.0, 10.0, 1.0),
        SamplePoint::new(11.0, 10.0, 2.0),
    ];
    let on_meridian = vec![
        SamplePoint::new(0.0, 0.0, 1.0),
        SamplePoint::new(0.0, 1.0, 2.0),
    ];
    for samples in [on_parallel, on_meridian] {
        for topology in ALL_TOPOLOGIES {
            let grid = estimate(&samples, 10.0, LengthUnit::Kilometers, topology, 1.0).unwrap();
            assert!(!grid.is_empty(), "{} produced no cells", topology);
            assert!(grid.bbox().has_area());
            for v in grid.values() {
                assert!((1.0..=2.0).contains(&v), "value {} outside sample range", v);
            }
        }
    }
}

#[test]
fn test_cell_larger_than_extent_gives_empty_grid() {
    let samples = vec![
        SamplePoint::new(0.0, 0.0, 1.0),
        SamplePoint::new(0.1, 0.1, 2.0),
    ];
    for topology in [GridTopology::Square, GridTopology::Hex, GridTopology::Triangle] {
        let grid = estimate(&samples, 100.0, LengthUnit::Kilometers, topology, 1.0).unwrap();
        assert!(grid.is_empty(), "{} produced cells", topology);
    }

    let grid = estimate(&samples, 100.0, LengthUnit::Kilometers, GridTopology::Point, 1.0).unwrap();
    assert_eq!(grid.len(), 1);
}

// ============================================================================
// Exact hits
// ============================================================================

#[test]
fn test_sample_on_cell_center_takes_sample_value() {
    let bbox = BoundingBox::from_array(fixtures::bbox::EQUATOR_DEGREE);
    let config = InterpolationConfig::default()
        .with_grid_type(GridTopology::Point)
        .with_units(LengthUnit::Degrees)
        .with_bbox(bbox)
        .with_weight(2.0);

    let base = vec![
        SamplePoint::new(0.1, 0.1, 1.0),
        SamplePoint::new(0.9, 0.9, 9.0),
    ];
    let layout = interpolate(&base, 0.3, &config).unwrap();
    let center = layout.cells()[5].center();

    let mut samples = base.clone();
    samples.push(SamplePoint::new(center[0], center[1], 123.0));
    let grid = interpolate(&samples, 0.3, &config).unwrap();

    assert_eq!(grid.cells()[5].center(), center);
    assert_eq!(grid.cells()[5].value, 123.0);
}

#[test]
fn test_duplicate_coincident_samples() {
    let samples = vec![
        SamplePoint::new(0.0, 0.0, 5.0),
        SamplePoint::new(0.0, 0.0, 5.0),
        SamplePoint::new(1.0, 1.0, 15.0),
        SamplePoint::new(1.0, 1.0, 15.0),
    ];
    let grid = estimate(&samples, 10.0, LengthUnit::Kilometers, GridTopology::Point, 1.0).unwrap();
    for v in grid.values() {
        assert!(v.is_finite());
        assert!((5.0..=15.0).contains(&v));
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_samples_rejected() {
    let err = estimate(&[], 10.0, LengthUnit::Kilometers, GridTopology::Point, 1.0).unwrap_err();
    assert!(matches!(err, GeoError::InvalidInput(_)));
}

#[test]
fn test_non_positive_cell_size_rejected() {
    let samples = scattered_samples();
    for cell_size in [0.0, -5.0] {
        let err = estimate(&samples, cell_size, LengthUnit::Kilometers, GridTopology::Square, 1.0)
            .unwrap_err();
        assert!(err.is_invalid_input());
    }
}

#[test]
fn test_non_positive_weight_rejected() {
    let samples = scattered_samples();
    for weight in [0.0, -1.0] {
        let err = estimate(&samples, 10.0, LengthUnit::Kilometers, GridTopology::Square, weight)
            .unwrap_err();
        assert!(err.is_invalid_input());
    }
}

#[test]
fn test_numeric_degeneracy_reported() {
    // Every distance in metres raised to the 400th power overflows.
    let samples = vec![
        SamplePoint::new(0.0, 0.0, 1.0),
        SamplePoint::new(1.0, 1.0, 2.0),
    ];
    let err = estimate(&samples, 50_000.0, LengthUnit::Meters, GridTopology::Square, 400.0)
        .map(|_| ())
        .unwrap_err();
    assert!(err.is_numeric_degeneracy(), "got {:?}", err);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_repeated_runs_identical() {
    let samples = scattered_samples();
    let a = estimate(&samples, 30.0, LengthUnit::Kilometers, GridTopology::Hex, 2.0).unwrap();
    let b = estimate(&samples, 30.0, LengthUnit::Kilometers, GridTopology::Hex, 2.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_units_do_not_change_estimates() {
    let samples = scattered_samples();
    let km = estimate(&samples, 50.0, LengthUnit::Kilometers, GridTopology::Point, 2.0).unwrap();
    let m = estimate(&samples, 50_000.0, LengthUnit::Meters, GridTopology::Point, 2.0).unwrap();
    assert_eq!(km.len(), m.len());
    for (a, b) in km.values().zip(m.values()) {
        assert_approx_eq!(a, b, 1e-6);
    }
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_solar_radiation_point_grid() {
    let bbox = fixtures::bbox::CENTRAL_ASIA;
    let points = random_point_features(30, bbox, "solRad", (0.0, 50.0), 2024);
    let config = InterpolationConfig::default()
        .with_grid_type(GridTopology::Point)
        .with_units(LengthUnit::Kilometers)
        .with_z_property("solRad")
        .with_bbox(BoundingBox::from_array(bbox));

    let samples = SamplePoint::from_features(&points, "solRad").unwrap();
    let grid = interpolate(&samples, 100.0, &config).unwrap();

    let shape = grid.lattice().expect("point grid has a lattice shape");
    assert_eq!(grid.len(), shape.len());
    assert!(shape.columns >= 2 && shape.rows >= 2);

    let extent = BoundingBox::from_array(bbox);
    for cell in grid.cells() {
        let [x, y] = cell.center();
        assert!(extent.contains_point(x, y), "lattice point {:?} outside bbox", (x, y));
        assert!(cell.value >= -1e-9 && cell.value <= 50.0 + 1e-9);
    }

    // Lattice spans the box to within one cell on each side.
    let first = grid.cells()[0].center();
    let last = grid.cells()[grid.len() - 1].center();
    let cell_w = (last[0] - first[0]) / (shape.columns - 1) as f64;
    let cell_h = (last[1] - first[1]) / (shape.rows - 1) as f64;
    assert!(first[0] - extent.min_x <= cell_w);
    assert!(extent.max_x - last[0] <= cell_w);
    assert!(first[1] - extent.min_y <= cell_h);
    assert!(extent.max_y - last[1] <= cell_h);

    let fc = interpolate_features(&points, 100.0, &config).unwrap();
    assert_eq!(fc.len(), grid.len());
    for feature in &fc.features {
        assert!(matches!(feature.geometry, Geometry::Point { .. }));
        assert!(feature.property_f64("solRad").is_some());
    }
}

#[test]
fn test_polygon_topologies_export_polygons() {
    let samples = scattered_samples();
    for topology in [GridTopology::Square, GridTopology::Hex, GridTopology::Triangle] {
        let grid = estimate(&samples, 40.0, LengthUnit::Kilometers, topology, 1.0).unwrap();
        assert!(grid.lattice().is_none());
        let fc = grid.to_feature_collection("z");
        assert!(fc
            .features
            .iter()
            .all(|f| matches!(f.geometry, Geometry::Polygon { .. })));
    }
}
