//! Polygon overlap test used to derive adjacency between scaled hulls.
//!
//! Two polygons overlap iff some pair of boundary segments meets, or one
//! polygon contains a vertex of the other (the fully nested case). Segment
//! tests accept zero-length segments, so one- and two-vertex "polygons"
//! (single buildings, two-building clusters) go through the same path.
//!
//! Touching counts as overlapping: all predicates are closed. Tolerances are
//! `EPS` times the lengths involved, so the answer is the same in metres,
//! pixels or degrees.

use crate::error::EngineError;
use crate::geom::{cross, Bounds2, Point, EPS};

/// True iff the areas of `a` and `b` overlap or their boundaries touch.
///
/// Symmetric in its arguments. Either polygon may have any vertex count ≥ 1.
pub fn intersects(a: &[Point], b: &[Point]) -> Result<bool, EngineError> {
    let (ba, bb) = match (Bounds2::of(a), Bounds2::of(b)) {
        (Some(ba), Some(bb)) => (ba, bb),
        (None, _) => return Err(EngineError::invalid_polygon("first polygon has no vertices")),
        (_, None) => return Err(EngineError::invalid_polygon("second polygon has no vertices")),
    };
    if !ba.overlaps_eps(&bb, EPS * ba.extent().max(bb.extent())) {
        return Ok(false);
    }
    if any_edges_cross(a, b) {
        return Ok(true);
    }
    Ok(a.iter().any(|p| point_in_polygon(*p, b)) || b.iter().any(|p| point_in_polygon(*p, a)))
}

/// Boundary edges as (start, end) pairs; the closing edge is included for
/// three or more vertices, a single vertex yields one zero-length edge.
fn edges(poly: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = poly.len();
    let count = match n {
        0 => 0,
        1 | 2 => 1,
        _ => n,
    };
    (0..count).map(move |k| (poly[k], poly[(k + 1) % n]))
}

fn any_edges_cross(a: &[Point], b: &[Point]) -> bool {
    edges(a).any(|(p1, p2)| edges(b).any(|(q1, q2)| segments_intersect(p1, p2, q1, q2)))
}

/// Orientation of `c` against `a → b`: `1` left, `-1` right, `0` collinear
/// within `EPS * |b - a| * |c - a|`.
#[inline]
fn orientation(a: Point, b: Point, c: Point) -> i8 {
    let v = cross(a, b, c);
    let tol = EPS * (b - a).norm() * (c - a).norm();
    if v > tol {
        1
    } else if v < -tol {
        -1
    } else {
        0
    }
}

/// `q` lies within the closed bounding box of segment `p r` (used once `q`
/// is known to be collinear with it). Slack is relative to the lengths.
#[inline]
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    let slack = EPS * (r - p).norm().max((q - p).norm());
    q.x <= p.x.max(r.x) + slack
        && q.x >= p.x.min(r.x) - slack
        && q.y <= p.y.max(r.y) + slack
        && q.y >= p.y.min(r.y) - slack
}

/// Closed segment intersection `[p1, p2] ∩ [q1, q2] ≠ ∅`.
///
/// A zero-length segment has all orientations zero against itself, so it can
/// only match through the collinear branch, i.e. when it lies on the other one.
pub fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }
    (o1 == 0 && on_segment(p1, q1, p2))
        || (o2 == 0 && on_segment(p1, q2, p2))
        || (o3 == 0 && on_segment(q1, p1, q2))
        || (o4 == 0 && on_segment(q1, p2, q2))
}

/// Even–odd ray cast; boundary points are left to the segment tests.
pub fn point_in_polygon(p: Point, poly: &[Point]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (poly[i], poly[j]);
        if (vi.y > p.y) != (vj.y > p.y) {
            let x_cross = vj.x + (p.y - vj.y) * (vi.x - vj.x) / (vi.y - vj.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn square(x0: f64, y0: f64, side: f64) -> Vec<Point> {
        vec![
            vector![x0, y0],
            vector![x0 + side, y0],
            vector![x0 + side, y0 + side],
            vector![x0, y0 + side],
        ]
    }

    #[test]
    fn overlapping_and_disjoint_squares() {
        let a = square(0.0, 0.0, 2.0);
        assert!(intersects(&a, &square(1.0, 1.0, 2.0)).unwrap());
        assert!(!intersects(&a, &square(3.0, 0.0, 1.0)).unwrap());
        // Bounding boxes overlap, shapes do not.
        let tri = vec![vector![0.0, 0.0], vector![4.0, 0.0], vector![0.0, 4.0]];
        assert!(!intersects(&tri, &square(2.5, 2.5, 1.0)).unwrap());
    }

    #[test]
    fn touching_edges_and_corners_count() {
        let a = square(0.0, 0.0, 1.0);
        assert!(intersects(&a, &square(1.0, 0.0, 1.0)).unwrap());
        assert!(intersects(&a, &square(1.0, 1.0, 1.0)).unwrap());
    }

    #[test]
    fn nested_polygons_overlap_both_ways() {
        let outer = square(0.0, 0.0, 10.0);
        let inner = square(4.0, 4.0, 1.0);
        assert!(intersects(&outer, &inner).unwrap());
        assert!(intersects(&inner, &outer).unwrap());
    }

    #[test]
    fn point_and_segment_polygons() {
        let sq = square(0.0, 0.0, 2.0);
        assert!(intersects(&[vector![1.0, 1.0]], &sq).unwrap());
        assert!(intersects(&sq, &[vector![2.0, 1.0]]).unwrap());
        assert!(!intersects(&[vector![3.0, 1.0]], &sq).unwrap());

        let p = [vector![1.0, 1.0]];
        assert!(intersects(&p, &p).unwrap());
        assert!(!intersects(&p, &[vector![1.0, 2.0]]).unwrap());

        let seg = [vector![-1.0, 1.0], vector![3.0, 1.0]];
        assert!(intersects(&seg, &sq).unwrap());
        let seg_far = [vector![-1.0, 5.0], vector![3.0, 5.0]];
        assert!(!intersects(&seg_far, &sq).unwrap());
        // Point on a segment, and a point on the segment's line but past its end.
        assert!(intersects(&[vector![0.0, 1.0]], &seg).unwrap());
        assert!(!intersects(&[vector![4.0, 1.0]], &seg).unwrap());
        // Collinear, overlapping segments.
        assert!(intersects(&seg, &[vector![2.0, 1.0], vector![6.0, 1.0]]).unwrap());
    }

    #[test]
    fn empty_polygon_is_rejected() {
        let sq = square(0.0, 0.0, 1.0);
        assert!(matches!(
            intersects(&[], &sq),
            Err(EngineError::InvalidPolygon { .. })
        ));
        assert!(matches!(
            intersects(&sq, &[]),
            Err(EngineError::InvalidPolygon { .. })
        ));
    }

    #[test]
    fn verdicts_do_not_depend_on_units() {
        for s in [1e-6, 1.0, 1e6] {
            let tri = vec![vector![0.0, 0.0], vector![s, 0.0], vector![0.0, s]];
            // Bounding boxes overlap, shapes do not.
            assert!(!intersects(&tri, &square(0.6 * s, 0.6 * s, 0.3 * s)).unwrap(), "scale {s}");
            assert!(!intersects(&square(0.6 * s, 0.6 * s, 0.3 * s), &tri).unwrap(), "scale {s}");
            // Corner resting on the hypotenuse, and a shared edge.
            assert!(intersects(&tri, &square(0.5 * s, 0.5 * s, 0.3 * s)).unwrap(), "scale {s}");
            assert!(intersects(&tri, &square(-0.5 * s, 0.0, 0.5 * s)).unwrap(), "scale {s}");
            // Nearly parallel segments a small relative gap apart.
            let seg = [vector![0.0, 0.0], vector![s, 0.0]];
            let above = [vector![0.0, 1e-3 * s], vector![s, 2e-3 * s]];
            assert!(!intersects(&seg, &above).unwrap(), "scale {s}");
        }
    }

    #[test]
    fn segment_cases() {
        let o = vector![0.0, 0.0];
        assert!(segments_intersect(o, vector![2.0, 2.0], vector![0.0, 2.0], vector![2.0, 0.0]));
        assert!(!segments_intersect(o, vector![1.0, 1.0], vector![2.0, 2.0], vector![3.0, 3.0]));
        assert!(segments_intersect(o, vector![2.0, 0.0], vector![1.0, 0.0], vector![1.0, 5.0]));
        assert!(!segments_intersect(o, o, vector![1.0, 0.0], vector![1.0, 5.0]));
    }
}
