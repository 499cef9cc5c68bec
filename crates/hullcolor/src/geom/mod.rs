//! Geometry kernel: convex hulls, centroids and hull scaling over 2D point sets.
//!
//! Purpose
//! - Turn a cluster's building coordinates into the polygons the intersection
//!   tester and the renderer consume.
//! - Keep every operation a pure function over slices of `Point`.
//!
//! Conventions
//! - Points are `nalgebra::Vector2<f64>` in the caller's rendering frame (any
//!   y-axis flip already applied).
//! - Hulls are counter-clockwise, start at the lowest (then leftmost) point and
//!   carry no collinear interior vertices.
//! - Hull turns use the exact sign of `cross`; the intersection tester scales
//!   `EPS = 1e-9` by the segment lengths involved. Neither depends on the
//!   coordinate unit.

mod hull;
mod scale;
mod util;

pub use hull::compute_hull;
pub use scale::{compute_centroid, scale_hull};
pub use util::{cross, polygon_area, Bounds2};

/// A point in the rendering frame.
pub type Point = nalgebra::Vector2<f64>;

/// Relative tolerance for orientation and on-segment predicates.
pub const EPS: f64 = 1e-9;
