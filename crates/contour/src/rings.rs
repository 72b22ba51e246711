//! Planar ring helpers for band polygons.
//!
//! Rings here are open (the first vertex is not repeated) until
//! [`close`] is applied for output.

use tracing::warn;

pub(crate) type Ring = Vec<[f64; 2]>;

/// Shoelace area; positive for counter-clockwise rings.
pub(crate) fn signed_area(ring: &[[f64; 2]]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let [x0, y0] = ring[i];
        let [x1, y1] = ring[(i + 1) % n];
        sum += x0 * y1 - x1 * y0;
    }
    sum / 2.0
}

/// Even-odd ray cast.
pub(crate) fn point_in_ring(point: [f64; 2], ring: &[[f64; 2]]) -> bool {
    let [px, py] = point;
    let n = ring.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn ring_bounds(ring: &[[f64; 2]]) -> [f64; 4] {
    ring.iter().fold(
        [f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY],
        |[x0, y0, x1, y1], &[x, y]| [x0.min(x), y0.min(y), x1.max(x), y1.max(y)],
    )
}

fn bounds_contain(outer: [f64; 4], inner: [f64; 4]) -> bool {
    outer[0] <= inner[0] && outer[1] <= inner[1] && outer[2] >= inner[2] && outer[3] >= inner[3]
}

/// True when `b` lies on the straight run from `a` to `c`.
fn is_redundant(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> bool {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let bc = [c[0] - b[0], c[1] - b[1]];
    if ab == [0.0, 0.0] {
        return true;
    }
    let cross = ab[0] * bc[1] - ab[1] * bc[0];
    let dot = ab[0] * bc[0] + ab[1] * bc[1];
    let scale = ab[0].hypot(ab[1]) * bc[0].hypot(bc[1]);
    dot > 0.0 && cross.abs() <= 1e-12 * scale
}

/// Drop vertices that sit on a straight run between their neighbours.
pub(crate) fn remove_collinear(ring: Ring) -> Ring {
    let mut out: Ring = Vec::with_capacity(ring.len());
    for p in ring {
        while out.len() >= 2 && is_redundant(out[out.len() - 2], out[out.len() - 1], p) {
            out.pop();
        }
        out.push(p);
    }

    // The run may continue across the seam.
    loop {
        let n = out.len();
        if n <= 3 {
            break;
        }
        if is_redundant(out[n - 2], out[n - 1], out[0]) {
            out.pop();
        } else if is_redundant(out[n - 1], out[0], out[1]) {
            out.remove(0);
        } else {
            break;
        }
    }
    out
}

/// Repeat the first vertex at the end.
pub(crate) fn close(mut ring: Ring) -> Ring {
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    ring
}

/// Group oriented rings into polygons.
///
/// Counter-clockwise rings are exteriors and clockwise rings are holes. Each
/// hole goes to the smallest exterior that contains most of its vertices.
/// Output rings are closed, exterior first.
pub(crate) fn nest(rings: Vec<Ring>) -> Vec<Vec<Ring>> {
    struct Exterior {
        ring: Ring,
        area: f64,
        bounds: [f64; 4],
        holes: Vec<Ring>,
    }

    let mut exteriors = Vec::new();
    let mut holes = Vec::new();
    for ring in rings {
        let area = signed_area(&ring);
        if area > 0.0 {
            let bounds = ring_bounds(&ring);
            exteriors.push(Exterior {
                ring,
                area,
                bounds,
                holes: Vec::new(),
            });
        } else if area < 0.0 {
            holes.push(ring);
        }
    }

    // Smallest first, so the first container found is the tightest.
    let mut by_area: Vec<usize> = (0..exteriors.len()).collect();
    by_area.sort_by(|&a, &b| exteriors[a].area.total_cmp(&exteriors[b].area));

    let mut orphans = 0usize;
    for hole in holes {
        let bounds = ring_bounds(&hole);
        let candidates = by_area
            .iter()
            .copied()
            .filter(|&i| bounds_contain(exteriors[i].bounds, bounds));

        let mut fallback = None;
        let mut owner = None;
        for i in candidates {
            fallback.get_or_insert(i);
            let inside = hole
                .iter()
                .filter(|&&p| point_in_ring(p, &exteriors[i].ring))
                .count();
            if inside * 2 > hole.len() {
                owner = Some(i);
                break;
            }
        }

        match owner.or(fallback) {
            Some(i) => exteriors[i].holes.push(hole),
            None => orphans += 1,
        }
    }
    if orphans > 0 {
        warn!(orphans, "Dropped band holes with no enclosing ring");
    }

    exteriors
        .into_iter()
        .map(|ext| {
            let mut polygon = Vec::with_capacity(1 + ext.holes.len());
            polygon.push(close(ext.ring));
            polygon.extend(ext.holes.into_iter().map(close));
            polygon
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Ring {
        vec![[x0, y0], [x0 + size, y0], [x0 + size, y0 + size], [x0, y0 + size]]
    }

    #[test]
    fn test_signed_area_orientation() {
        let ccw = square(0.0, 0.0, 2.0);
        assert_eq!(signed_area(&ccw), 4.0);
        let cw: Ring = ccw.iter().rev().copied().collect();
        assert_eq!(signed_area(&cw), -4.0);
    }

    #[test]
    fn test_point_in_ring() {
        let ring = square(0.0, 0.0, 1.0);
        assert!(point_in_ring([0.5, 0.5], &ring));
        assert!(!point_in_ring([1.5, 0.5], &ring));
    }

    #[test]
    fn test_remove_collinear() {
        let ring = vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [2.0, 0.0],
            [2.0, 1.0],
            [2.0, 2.0],
            [1.0, 2.0],
            [0.0, 2.0],
            [0.0, 1.0],
        ];
        let simplified = remove_collinear(ring);
        assert_eq!(simplified, vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]);
    }

    #[test]
    fn test_remove_collinear_across_seam() {
        let ring = vec![[1.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]];
        let simplified = remove_collinear(ring);
        assert_eq!(simplified.len(), 4);
        assert_eq!(signed_area(&simplified), 4.0);
    }

    #[test]
    fn test_nest_assigns_hole_to_smallest_exterior() {
        let outer = square(0.0, 0.0, 10.0);
        let inner = square(2.0, 2.0, 6.0);
        let hole: Ring = square(4.0, 4.0, 2.0).into_iter().rev().collect();

        let polygons = nest(vec![outer, hole, inner]);
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].len(), 1);
        assert_eq!(polygons[1].len(), 2, "hole belongs to the inner square");
        assert_eq!(polygons[1][0].first(), polygons[1][0].last());
    }

    #[test]
    fn test_nest_drops_zero_area() {
        let flat = vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
        assert!(nest(vec![flat]).is_empty());
    }
}
