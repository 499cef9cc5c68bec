use super::Point;
use crate::error::EngineError;

/// Orientation of `c` relative to the directed line `a → b`.
///
/// Twice the signed triangle area: positive for a left (CCW) turn, negative
/// for a right turn, zero when collinear.
#[inline]
pub fn cross(a: Point, b: Point, c: Point) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// Signed shoelace area; positive for CCW vertex order.
pub fn polygon_area(poly: &[Point]) -> f64 {
    if poly.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for k in 0..poly.len() {
        let p = poly[k];
        let q = poly[(k + 1) % poly.len()];
        twice += p.x * q.y - q.x * p.y;
    }
    0.5 * twice
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds2 {
    pub min: Point,
    pub max: Point,
}

impl Bounds2 {
    /// Bounds of a point slice; `None` when empty.
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        let mut b = Self {
            min: first,
            max: first,
        };
        for p in &points[1..] {
            b.min = b.min.inf(p);
            b.max = b.max.sup(p);
        }
        Some(b)
    }

    /// Largest side length.
    #[inline]
    pub fn extent(&self) -> f64 {
        (self.max - self.min).amax()
    }

    /// Closed-box overlap with slack `eps` on every side.
    #[inline]
    pub fn overlaps_eps(&self, other: &Bounds2, eps: f64) -> bool {
        self.min.x <= other.max.x + eps
            && other.min.x <= self.max.x + eps
            && self.min.y <= other.max.y + eps
            && other.min.y <= self.max.y + eps
    }
}

pub(crate) fn check_finite(points: &[Point]) -> Result<(), EngineError> {
    match points.iter().position(|p| !p.x.is_finite() || !p.y.is_finite()) {
        Some(i) => Err(EngineError::degenerate(format!(
            "non-finite coordinate at index {i}"
        ))),
        None => Ok(()),
    }
}
