//! Z-value lookup on the plane through a triangle.

use geo_common::{Feature, GeoError, GeoResult, Geometry};

/// Relative area below which a triangle is treated as degenerate.
const DEGENERATE_EPSILON: f64 = 1e-12;

/// A triangle with a scalar value at each vertex, as `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [[f64; 3]; 3],
}

impl Triangle {
    pub fn new(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Read a triangle from a polygon feature.
    ///
    /// The first three vertices of the outer ring are used. Vertex values come
    /// from the `a`, `b` and `c` properties when present, otherwise from each
    /// vertex's third coordinate.
    pub fn from_feature(feature: &Feature) -> GeoResult<Self> {
        let ring = match &feature.geometry {
            Geometry::Polygon { coordinates } => coordinates.first(),
            other => {
                return Err(GeoError::invalid_input(format!(
                    "triangle must be a Polygon geometry, got {}",
                    other.type_name()
                )))
            }
        }
        .filter(|ring| ring.len() >= 3)
        .ok_or_else(|| GeoError::invalid_input("triangle ring needs at least three vertices"))?;

        let mut vertices = [[0.0; 3]; 3];
        for (i, key) in ["a", "b", "c"].iter().enumerate() {
            let position = &ring[i];
            if position.len() < 2 {
                return Err(GeoError::invalid_input(format!(
                    "triangle vertex {} has fewer than two ordinates",
                    i
                )));
            }
            let z = feature
                .property_f64(key)
                .or_else(|| position.get(2).copied())
                .ok_or_else(|| {
                    GeoError::invalid_input(format!(
                        "triangle vertex {} has no '{}' property and no z coordinate",
                        i, key
                    ))
                })?;
            vertices[i] = [position[0], position[1], z];
        }
        Ok(Self { vertices })
    }

    /// Twice the signed area of the triangle's planar footprint.
    pub fn signed_area2(&self) -> f64 {
        let [a, b, c] = self.vertices;
        (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])
    }

    fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.vertices;
        let scale = [b[0] - a[0], b[1] - a[1], c[0] - a[0], c[1] - a[1]]
            .iter()
            .fold(0.0_f64, |m, v| m.max(v.abs()));
        let area2 = self.signed_area2();
        !area2.is_finite() || area2.abs() <= DEGENERATE_EPSILON * scale * scale
    }
}

/// Interpolate the value at `point` on the plane through the triangle.
///
/// Points outside the triangle are extrapolated along the same plane.
pub fn planepoint(point: [f64; 2], triangle: &Triangle) -> GeoResult<f64> {
    if triangle.is_degenerate() {
        return Err(GeoError::invalid_input(format!(
            "triangle {:?} has zero area",
            triangle.vertices
        )));
    }

    let [a, b, c] = triangle.vertices;
    let area2 = triangle.signed_area2();
    let [x, y] = point;

    // Barycentric weights of the point relative to each vertex.
    let wa = ((b[0] - x) * (c[1] - y) - (c[0] - x) * (b[1] - y)) / area2;
    let wb = ((c[0] - x) * (a[1] - y) - (a[0] - x) * (c[1] - y)) / area2;
    let wc = 1.0 - wa - wb;

    Ok(wa * a[2] + wb * b[2] + wc * c[2])
}

/// [`planepoint`] for GeoJSON inputs.
pub fn planepoint_feature(point: &Feature, triangle: &Feature) -> GeoResult<f64> {
    let coords = point.geometry.as_point().ok_or_else(|| {
        GeoError::invalid_input(format!(
            "point must be a Point geometry, got {}",
            point.geometry.type_name()
        ))
    })?;
    planepoint([coords[0], coords[1]], &Triangle::from_feature(triangle)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sloped() -> Triangle {
        // z = 2x + 3y + 1
        Triangle::new([0.0, 0.0, 1.0], [1.0, 0.0, 3.0], [0.0, 1.0, 4.0])
    }

    #[test]
    fn test_vertices_return_their_values() {
        let t = sloped();
        for v in t.vertices {
            let z = planepoint([v[0], v[1]], &t).unwrap();
            assert!((z - v[2]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_interior_point_on_plane() {
        let z = planepoint([0.25, 0.25], &sloped()).unwrap();
        assert!((z - (2.0 * 0.25 + 3.0 * 0.25 + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_orientation_does_not_matter() {
        let t = sloped();
        let flipped = Triangle::new(t.vertices[0], t.vertices[2], t.vertices[1]);
        let a = planepoint([0.3, 0.2], &t).unwrap();
        let b = planepoint([0.3, 0.2], &flipped).unwrap();
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_collinear_is_invalid() {
        let t = Triangle::new([0.0, 0.0, 1.0], [1.0, 1.0, 2.0], [2.0, 2.0, 3.0]);
        let err = planepoint([0.5, 0.5], &t).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_coincident_vertices_are_invalid() {
        let t = Triangle::new([1.0, 1.0, 1.0], [1.0, 1.0, 2.0], [1.0, 1.0, 3.0]);
        assert!(planepoint([1.0, 1.0], &t).is_err());
    }

    #[test]
    fn test_from_feature_properties_override_z() {
        let feature = Feature::new(Geometry::Polygon {
            coordinates: vec![vec![
                vec![0.0, 0.0, 100.0],
                vec![1.0, 0.0, 100.0],
                vec![0.0, 1.0, 100.0],
                vec![0.0, 0.0, 100.0],
            ]],
        })
        .with_property("a", 1.0)
        .with_property("b", 3.0)
        .with_property("c", 4.0);

        let t = Triangle::from_feature(&feature).unwrap();
        assert_eq!(t, sloped());
    }

    #[test]
    fn test_from_feature_z_coordinates() {
        let feature = Feature::new(Geometry::Polygon {
            coordinates: vec![vec![
                vec![0.0, 0.0, 1.0],
                vec![1.0, 0.0, 3.0],
                vec![0.0, 1.0, 4.0],
                vec![0.0, 0.0, 1.0],
            ]],
        });
        let point = Feature::point(0.5, 0.25);
        let z = planepoint_feature(&point, &feature).unwrap();
        assert!((z - (2.0 * 0.5 + 3.0 * 0.25 + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_from_feature_missing_values() {
        let feature = Feature::new(Geometry::polygon_from_ring(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]));
        assert!(Triangle::from_feature(&feature).is_err());
    }
}
