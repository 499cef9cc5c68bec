//! One (map, granularity) run: footprints, derived adjacency, coloring.
//!
//! All state lives in the returned `MapColoring`; nothing survives between runs.

use crate::adjacency::{AdjacencyBuilder, AdjacencyRelation};
use crate::cluster::{Cluster, ClusterId, Footprint};
use crate::coloring::{greedy_color_ids, ColorAssignment, DEFAULT_SEED_COLOR};
use crate::error::EngineError;

/// Scale factor applied to hulls before the adjacency test.
pub const DEFAULT_SCALE_FACTOR: f64 = 1.5;

/// Which relation drives the coloring.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AdjacencySource {
    /// Scaled-hull intersection computed in this run.
    #[default]
    Derived,
    /// Relation supplied by the clustering step (e.g. proximity matrix).
    Provided(AdjacencyRelation),
}

/// Per-run configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct RunCfg {
    pub scale_factor: f64,
    pub seed_color: usize,
    pub adjacency_source: AdjacencySource,
}

impl Default for RunCfg {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            seed_color: DEFAULT_SEED_COLOR,
            adjacency_source: AdjacencySource::Derived,
        }
    }
}

/// Everything a renderer or exporter needs from one run.
#[derive(Clone, Debug)]
pub struct MapColoring {
    /// Processing order.
    pub order: Vec<ClusterId>,
    /// Footprints in processing order.
    pub footprints: Vec<Footprint>,
    /// Relation from scaled-hull intersection (always computed).
    pub derived: AdjacencyRelation,
    /// Relation the coloring was computed against.
    pub coloring_relation: AdjacencyRelation,
    pub colors: ColorAssignment,
}

impl MapColoring {
    pub fn footprint(&self, id: ClusterId) -> Option<&Footprint> {
        self.order
            .iter()
            .position(|c| *c == id)
            .map(|i| &self.footprints[i])
    }
}

/// Run the core on one set of clusters.
pub fn color_map(clusters: &[Cluster], cfg: &RunCfg) -> Result<MapColoring, EngineError> {
    let mut builder = AdjacencyBuilder::new();
    let mut footprints = Vec::with_capacity(clusters.len());
    for cluster in clusters {
        let fp = cluster.footprint(cfg.scale_factor)?;
        builder.push(cluster.id, fp.scaled_hull.clone())?;
        footprints.push(fp);
    }
    let order = builder.order();
    let derived = builder.finish();

    let coloring_relation = match &cfg.adjacency_source {
        AdjacencySource::Derived => derived.clone(),
        AdjacencySource::Provided(rel) => rel.clone(),
    };
    let colors = greedy_color_ids(&order, &coloring_relation, cfg.seed_color)?;
    tracing::debug!(
        clusters = order.len(),
        derived_edges = derived.edge_count(),
        colors = colors.palette_size(),
        "map colored"
    );
    Ok(MapColoring {
        order,
        footprints,
        derived,
        coloring_relation,
        colors,
    })
}
