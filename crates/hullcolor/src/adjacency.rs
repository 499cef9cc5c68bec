//! Symmetric adjacency relation between clusters and the builder that derives
//! it from scaled-hull intersection.
//!
//! Two sources feed the same `AdjacencyRelation` type:
//! - derived: `build_adjacency` tests every pair of scaled hulls in processing order;
//! - provided: an upstream proximity matrix, read with `AdjacencyRelation::from_matrix`.
//!
//! Invariants
//! - No self-loops.
//! - `b ∈ neighbors(a)` iff `a ∈ neighbors(b)`.
//! - Iteration order is by `ClusterId` (ordered maps), so output is reproducible.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::cluster::{Cluster, ClusterId};
use crate::error::EngineError;
use crate::geom::{Bounds2, Point, EPS};
use crate::intersect::intersects;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdjacencyRelation {
    neighbors: BTreeMap<ClusterId, BTreeSet<ClusterId>>,
}

impl AdjacencyRelation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relation over `ids` with no edges yet.
    pub fn with_nodes<I: IntoIterator<Item = ClusterId>>(ids: I) -> Self {
        let mut rel = Self::new();
        for id in ids {
            rel.insert_node(id);
        }
        rel
    }

    #[inline]
    pub fn insert_node(&mut self, id: ClusterId) {
        self.neighbors.entry(id).or_default();
    }

    /// Record `a ~ b` in both directions. Self-loops are ignored; returns
    /// whether the edge is new.
    pub fn add_edge(&mut self, a: ClusterId, b: ClusterId) -> bool {
        if a == b {
            self.insert_node(a);
            return false;
        }
        let fresh = self.neighbors.entry(a).or_default().insert(b);
        self.neighbors.entry(b).or_default().insert(a);
        fresh
    }

    #[inline]
    pub fn are_adjacent(&self, a: ClusterId, b: ClusterId) -> bool {
        self.neighbors.get(&a).is_some_and(|s| s.contains(&b))
    }

    /// Neighbors of `id` in increasing id order (empty for unknown ids).
    pub fn neighbors(&self, id: ClusterId) -> impl Iterator<Item = ClusterId> + '_ {
        self.neighbors.get(&id).into_iter().flatten().copied()
    }

    #[inline]
    pub fn degree(&self, id: ClusterId) -> usize {
        self.neighbors.get(&id).map_or(0, BTreeSet::len)
    }

    pub fn nodes(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.neighbors.keys().copied()
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.neighbors.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Each undirected edge once, as `(smaller, larger)`.
    pub fn edges(&self) -> impl Iterator<Item = (ClusterId, ClusterId)> + '_ {
        self.neighbors
            .iter()
            .flat_map(|(a, set)| set.iter().filter(move |b| *b > a).map(move |b| (*a, *b)))
    }

    pub fn is_symmetric(&self) -> bool {
        self.neighbors.iter().all(|(a, set)| {
            !set.contains(a) && set.iter().all(|b| self.are_adjacent(*b, *a))
        })
    }

    /// Read an upstream 0/1 proximity matrix indexed by `ids` (processing order).
    ///
    /// Entry `(i, j)` or `(j, i)` being non-zero marks `ids[i] ~ ids[j]`; the
    /// diagonal is ignored and rows or columns past `ids.len()` are dropped.
    pub fn from_matrix<R: AsRef<[u8]>>(ids: &[ClusterId], rows: &[R]) -> Self {
        let mut rel = Self::with_nodes(ids.iter().copied());
        for (i, row) in rows.iter().enumerate().take(ids.len()) {
            for (j, &cell) in row.as_ref().iter().enumerate().take(ids.len()) {
                if cell != 0 {
                    rel.add_edge(ids[i], ids[j]);
                }
            }
        }
        rel
    }

    /// Dense symmetric 0/1 matrix in the given processing order.
    pub fn to_matrix(&self, order: &[ClusterId]) -> Vec<Vec<u8>> {
        order
            .iter()
            .map(|a| {
                order
                    .iter()
                    .map(|b| u8::from(self.are_adjacent(*a, *b)))
                    .collect()
            })
            .collect()
    }
}

/// Running accumulator for one coloring run: every pushed scaled hull is
/// tested against all hulls pushed before it.
#[derive(Debug, Default)]
pub struct AdjacencyBuilder {
    processed: Vec<(ClusterId, Bounds2, Vec<Point>)>,
    relation: AdjacencyRelation,
}

impl AdjacencyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test `scaled_hull` against every earlier entry and record contacts.
    ///
    /// Returns the ids of the earlier clusters it touches, in push order.
    pub fn push(
        &mut self,
        id: ClusterId,
        scaled_hull: Vec<Point>,
    ) -> Result<Vec<ClusterId>, EngineError> {
        if self.processed.iter().any(|(seen, _, _)| *seen == id) {
            return Err(EngineError::DuplicateCluster { id });
        }
        let bounds = Bounds2::of(&scaled_hull)
            .ok_or_else(|| EngineError::invalid_polygon(format!("cluster {id} has no vertices")))?;
        self.relation.insert_node(id);

        let mut touched = Vec::new();
        for (other, other_bounds, other_hull) in &self.processed {
            if !bounds.overlaps_eps(other_bounds, EPS * bounds.extent().max(other_bounds.extent())) {
                continue;
            }
            if intersects(&scaled_hull, other_hull)? {
                self.relation.add_edge(id, *other);
                touched.push(*other);
            }
        }
        if !touched.is_empty() {
            tracing::debug!(cluster = %id, touches = ?touched, "adjacency recorded");
        }
        self.processed.push((id, bounds, scaled_hull));
        Ok(touched)
    }

    /// Ids in push order.
    pub fn order(&self) -> Vec<ClusterId> {
        self.processed.iter().map(|(id, _, _)| *id).collect()
    }

    pub fn finish(self) -> AdjacencyRelation {
        self.relation
    }
}

/// Derived adjacency: clusters whose hulls, scaled by `scale_factor` about
/// their building centroid, overlap or touch.
pub fn build_adjacency(
    clusters: &[Cluster],
    scale_factor: f64,
) -> Result<AdjacencyRelation, EngineError> {
    let mut seen = HashSet::with_capacity(clusters.len());
    if let Some(dup) = clusters.iter().find(|c| !seen.insert(c.id)) {
        return Err(EngineError::DuplicateCluster { id: dup.id });
    }
    let mut builder = AdjacencyBuilder::new();
    for cluster in clusters {
        builder.push(cluster.id, cluster.scaled_hull(scale_factor)?)?;
    }
    let relation = builder.finish();
    tracing::debug!(
        clusters = relation.node_count(),
        edges = relation.edge_count(),
        "derived adjacency"
    );
    Ok(relation)
}
