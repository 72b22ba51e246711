//! Common test fixtures for geogrid tests.

/// Common bounding box definitions for testing, as `[west, south, east, north]`.
pub mod bbox {
    /// Region used by the end-to-end solar radiation scenario.
    pub const CENTRAL_ASIA: [f64; 4] = [50.0, 30.0, 70.0, 50.0];

    /// One degree square on the equator; cell sizes in degrees map 1:1.
    pub const EQUATOR_DEGREE: [f64; 4] = [0.0, 0.0, 1.0, 1.0];

    /// Continental United States bounding box
    pub const CONUS: [f64; 4] = [-130.0, 20.0, -60.0, 55.0];

    /// Single point (degenerate bbox)
    pub const POINT: [f64; 4] = [0.0, 0.0, 0.0, 0.0];
}

/// Breaks used across the contour tests.
pub mod breaks {
    /// Three breaks, two bands: [0, 5) and [5, 10).
    pub const TWO_BANDS: [f64; 3] = [0.0, 5.0, 10.0];

    /// Unsorted input, rejected by every contour operation.
    pub const UNSORTED: [f64; 3] = [5.0, 0.0, 10.0];

    /// Duplicate break, rejected by every contour operation.
    pub const DUPLICATE: [f64; 3] = [0.0, 5.0, 5.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_boxes_are_ordered() {
        for b in [bbox::CENTRAL_ASIA, bbox::EQUATOR_DEGREE, bbox::CONUS] {
            assert!(b[0] < b[2]);
            assert!(b[1] < b[3]);
        }
    }

    #[test]
    fn test_fixture_breaks_shape() {
        assert!(breaks::TWO_BANDS.windows(2).all(|w| w[0] < w[1]));
        assert!(!breaks::UNSORTED.windows(2).all(|w| w[0] < w[1]));
    }
}
