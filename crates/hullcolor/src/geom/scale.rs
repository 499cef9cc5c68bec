use super::util::check_finite;
use super::Point;
use crate::error::EngineError;

/// Arithmetic mean of a non-empty point set.
pub fn compute_centroid(points: &[Point]) -> Result<Point, EngineError> {
    if points.is_empty() {
        return Err(EngineError::degenerate("centroid of an empty point set"));
    }
    check_finite(points)?;
    let sum = points.iter().fold(Point::zeros(), |acc, p| acc + p);
    Ok(sum / points.len() as f64)
}

/// Map every vertex `v` to `centroid + factor * (v - centroid)`.
///
/// Vertex order and convexity are preserved; `factor > 1` grows the polygon,
/// `factor < 1` shrinks it.
pub fn scale_hull(hull: &[Point], centroid: Point, factor: f64) -> Result<Vec<Point>, EngineError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(EngineError::InvalidScaleFactor { factor });
    }
    Ok(hull
        .iter()
        .map(|v| centroid + (v - centroid) * factor)
        .collect())
}
