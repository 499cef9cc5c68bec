//! Cluster footprints and adjacency-aware map coloring.
//!
//! Pipeline (one map at one cluster granularity)
//! - `geom`: convex hull, centroid and scaled hull per cluster.
//! - `intersect`: closed polygon overlap test.
//! - `adjacency`: symmetric relation from pairwise scaled-hull contact.
//! - `coloring`: first-fit greedy coloring in processing order.
//! - `pipeline`: the above in sequence with per-run configuration.
//!
//! Everything here is synchronous and pure; reading tables, clustering and
//! rendering belong to callers (see the `cli` crate).

pub mod adjacency;
pub mod cluster;
pub mod coloring;
pub mod error;
pub mod geom;
pub mod intersect;
pub mod pipeline;
pub mod synth;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use adjacency::{build_adjacency, AdjacencyBuilder, AdjacencyRelation};
pub use cluster::{Building, BuildingId, Cluster, ClusterId, Footprint};
pub use coloring::{greedy_color, greedy_color_ids, ColorAssignment, DEFAULT_SEED_COLOR};
pub use error::EngineError;
pub use geom::{compute_centroid, compute_hull, scale_hull, Point};
pub use intersect::intersects;
pub use pipeline::{color_map, AdjacencySource, MapColoring, RunCfg, DEFAULT_SCALE_FACTOR};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::adjacency::{build_adjacency, AdjacencyRelation};
    pub use crate::cluster::{Building, BuildingId, Cluster, ClusterId};
    pub use crate::coloring::{greedy_color, ColorAssignment};
    pub use crate::geom::{compute_centroid, compute_hull, scale_hull, Point};
    pub use crate::intersect::intersects;
    pub use crate::pipeline::{color_map, RunCfg};
    pub use nalgebra::Vector2 as Vec2;
}
