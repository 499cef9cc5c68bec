use std::cmp::Ordering;

use super::util::{check_finite, cross};
use super::Point;
use crate::error::EngineError;

/// Graham scan convex hull (returns hull in CCW order).
///
/// Pivot is the point with minimum y (ties: minimum x); the remaining points
/// are sorted by polar angle around it (ties: closer first) and swept with a
/// stack that pops every non-left turn, so collinear interior points never
/// survive. One distinct point yields a one-vertex hull, two yield a segment.
///
/// Turns use the exact sign of `cross`, so the result does not depend on the
/// coordinate scale.
pub fn compute_hull(points: &[Point]) -> Result<Vec<Point>, EngineError> {
    if points.is_empty() {
        return Err(EngineError::degenerate("empty point set"));
    }
    check_finite(points)?;

    let pivot_idx = points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let pivot = points[pivot_idx];

    // Angles lie in [0, π) around the pivot; keying on them keeps the sort a
    // total order even where `cross` rounds inconsistently.
    let mut rest: Vec<(f64, f64, Point)> = points
        .iter()
        .copied()
        .filter(|p| *p != pivot)
        .map(|p| {
            let d = p - pivot;
            (d.y.atan2(d.x), d.norm_squared(), p)
        })
        .collect();
    rest.sort_by(|a, b| by_polar_key(a, b));
    rest.dedup_by(|a, b| a.2 == b.2);

    let mut stack: Vec<Point> = Vec::with_capacity(rest.len() + 1);
    stack.push(pivot);
    for (_, _, p) in rest {
        while stack.len() >= 2 && cross(stack[stack.len() - 2], stack[stack.len() - 1], p) <= 0.0 {
            stack.pop();
        }
        stack.push(p);
    }
    drop_non_left_turns(&mut stack);
    tracing::trace!(input = points.len(), vertices = stack.len(), "hull");
    Ok(stack)
}

fn by_polar_key(a: &(f64, f64, Point), b: &(f64, f64, Point)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1))
}

/// Remove vertices (cyclically, including the closing corner) that do not
/// turn left. Each removal only grows the polygon.
fn drop_non_left_turns(hull: &mut Vec<Point>) {
    'scan: while hull.len() >= 3 {
        let n = hull.len();
        for k in 0..n {
            let prev = hull[(k + n - 1) % n];
            let next = hull[(k + 1) % n];
            if cross(prev, hull[k], next) <= 0.0 {
                hull.remove(k);
                continue 'scan;
            }
        }
        break;
    }
}
