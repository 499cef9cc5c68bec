//! First-fit greedy coloring over a fixed processing order.
//!
//! Position 0 is seeded with `seed_color`. Every later cluster takes the
//! smallest color not used by an already-colored neighbor; later neighbors are
//! not consulted and nothing is revisited. The result is proper with respect
//! to the relation it was given; it is not a minimum coloring.
//!
//! Candidate bound
//! - Candidates are scanned from 0 up to `adjacency.node_count()`. When every
//!   candidate in that range is taken the scan continues past it, so a cluster
//!   is never left uncolored.
//!
//! An id may appear at most once in the order; a repeat is
//! `EngineError::DuplicateCluster`.

use std::collections::{BTreeSet, HashMap};

use crate::adjacency::AdjacencyRelation;
use crate::cluster::{Cluster, ClusterId};
use crate::error::EngineError;

/// Color given to the first cluster in processing order.
pub const DEFAULT_SEED_COLOR: usize = 1;

/// Colors in processing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorAssignment {
    entries: Vec<(ClusterId, usize)>,
}

impl ColorAssignment {
    /// Color of `id`, if it was part of the run.
    pub fn get(&self, id: ClusterId) -> Option<usize> {
        self.entries
            .iter()
            .find(|(c, _)| *c == id)
            .map(|(_, color)| *color)
    }

    /// Color at processing index `i`.
    #[inline]
    pub fn color_at(&self, i: usize) -> Option<usize> {
        self.entries.get(i).map(|(_, color)| *color)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClusterId, usize)> + '_ {
        self.entries.iter().copied()
    }

    /// Plain color vector indexed by processing order.
    pub fn colors(&self) -> Vec<usize> {
        self.entries.iter().map(|(_, color)| *color).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct colors used.
    pub fn palette_size(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, color)| *color)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Adjacent pairs (both colored) sharing a color.
    pub fn conflicts(&self, adjacency: &AdjacencyRelation) -> Vec<(ClusterId, ClusterId)> {
        adjacency
            .edges()
            .filter(|(a, b)| matches!((self.get(*a), self.get(*b)), (Some(x), Some(y)) if x == y))
            .collect()
    }

    pub fn is_proper(&self, adjacency: &AdjacencyRelation) -> bool {
        self.conflicts(adjacency).is_empty()
    }
}

/// Color `clusters` in slice order.
pub fn greedy_color(
    clusters: &[Cluster],
    adjacency: &AdjacencyRelation,
    seed_color: usize,
) -> Result<ColorAssignment, EngineError> {
    let order: Vec<ClusterId> = clusters.iter().map(|c| c.id).collect();
    greedy_color_ids(&order, adjacency, seed_color)
}

/// Color the ids in `order`; ids the relation does not know have no neighbors.
pub fn greedy_color_ids(
    order: &[ClusterId],
    adjacency: &AdjacencyRelation,
    seed_color: usize,
) -> Result<ColorAssignment, EngineError> {
    greedy_color_bounded(order, adjacency, seed_color, adjacency.node_count())
}

/// First-fit pass with an explicit candidate bound (advisory: colors above
/// `bound` are still handed out when every candidate up to it is taken).
pub fn greedy_color_bounded(
    order: &[ClusterId],
    adjacency: &AdjacencyRelation,
    seed_color: usize,
    bound: usize,
) -> Result<ColorAssignment, EngineError> {
    let mut colored: HashMap<ClusterId, usize> = HashMap::with_capacity(order.len());
    let mut entries = Vec::with_capacity(order.len());

    for (i, &id) in order.iter().enumerate() {
        if colored.contains_key(&id) {
            return Err(EngineError::DuplicateCluster { id });
        }
        let color = if i == 0 {
            seed_color
        } else {
            let used: BTreeSet<usize> = adjacency
                .neighbors(id)
                .filter_map(|n| colored.get(&n).copied())
                .collect();
            let color = first_free(&used);
            if color > bound {
                tracing::debug!(cluster = %id, color, bound, "color past candidate bound");
            }
            color
        };
        colored.insert(id, color);
        entries.push((id, color));
    }
    Ok(ColorAssignment { entries })
}

/// Smallest non-negative integer not in `used`.
fn first_free(used: &BTreeSet<usize>) -> usize {
    let mut c = 0;
    while used.contains(&c) {
        c += 1;
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::build_adjacency;
    use crate::cluster::Building;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn ids(n: u32) -> Vec<ClusterId> {
        (0..n).map(ClusterId).collect()
    }

    fn path3() -> AdjacencyRelation {
        let mut rel = AdjacencyRelation::with_nodes(ids(3));
        rel.add_edge(ClusterId(0), ClusterId(1));
        rel.add_edge(ClusterId(1), ClusterId(2));
        rel
    }

    #[test]
    fn path_of_three_reuses_seed() {
        let colors = greedy_color_ids(&ids(3), &path3(), DEFAULT_SEED_COLOR).unwrap();
        assert_eq!(colors.colors(), vec![1, 0, 1]);
        assert!(colors.is_proper(&path3()));
        assert_eq!(colors.palette_size(), 2);
        assert_eq!(colors.get(ClusterId(1)), Some(0));
        assert_eq!(colors.color_at(2), Some(1));
        assert_eq!(colors.get(ClusterId(9)), None);
    }

    #[test]
    fn triangle_needs_three_colors() {
        let mut rel = path3();
        rel.add_edge(ClusterId(0), ClusterId(2));
        let colors = greedy_color_ids(&ids(3), &rel, DEFAULT_SEED_COLOR).unwrap();
        assert_eq!(colors.colors(), vec![1, 0, 2]);
        assert!(colors.is_proper(&rel));
    }

    #[test]
    fn only_predecessors_are_consulted() {
        // 2 is adjacent to 0 only; 1 is isolated and takes 0 freely.
        let mut rel = AdjacencyRelation::with_nodes(ids(3));
        rel.add_edge(ClusterId(0), ClusterId(2));
        let colors = greedy_color_ids(&ids(3), &rel, 0).unwrap();
        assert_eq!(colors.colors(), vec![0, 0, 1]);
    }

    #[test]
    fn empty_order_and_unknown_ids() {
        let rel = AdjacencyRelation::new();
        assert!(greedy_color_ids(&[], &rel, 1).unwrap().is_empty());
        // An empty relation has bound 0; every cluster still gets a color.
        let colors = greedy_color_ids(&ids(3), &rel, 4).unwrap();
        assert_eq!(colors.colors(), vec![4, 0, 0]);
    }

    #[test]
    fn cliques_use_one_color_per_node() {
        let mut rel = AdjacencyRelation::new();
        for a in 0..4 {
            for b in (a + 1)..4 {
                rel.add_edge(ClusterId(a), ClusterId(b));
            }
        }
        let colors = greedy_color_ids(&ids(4), &rel, 5).unwrap();
        assert_eq!(colors.colors(), vec![5, 0, 1, 2]);
        assert!(colors.is_proper(&rel));

        let mut k5 = rel.clone();
        for a in 0..4 {
            k5.add_edge(ClusterId(a), ClusterId(4));
        }
        let colors = greedy_color_ids(&ids(5), &k5, 0).unwrap();
        assert_eq!(colors.colors(), vec![0, 1, 2, 3, 4]);
        assert!(colors.is_proper(&k5));
    }

    #[test]
    fn colors_past_an_undersized_bound() {
        let mut rel = AdjacencyRelation::new();
        for a in 0..4 {
            for b in (a + 1)..4 {
                rel.add_edge(ClusterId(a), ClusterId(b));
            }
        }
        let colors = greedy_color_bounded(&ids(4), &rel, 0, 1).unwrap();
        assert_eq!(colors.colors(), vec![0, 1, 2, 3]);
        assert!(colors.is_proper(&rel));
    }

    #[test]
    fn repeated_id_in_order_is_rejected() {
        let order = [ClusterId(0), ClusterId(1), ClusterId(0)];
        assert_eq!(
            greedy_color_ids(&order, &path3(), DEFAULT_SEED_COLOR),
            Err(EngineError::DuplicateCluster { id: ClusterId(0) })
        );
        let cluster = Cluster::with_buildings(ClusterId(3), vec![Building::new(1, 0.0, 0.0)]);
        let twice = vec![cluster.clone(), cluster];
        assert!(matches!(
            greedy_color(&twice, &AdjacencyRelation::new(), 0),
            Err(EngineError::DuplicateCluster { id: ClusterId(3) })
        ));
    }

    #[test]
    fn seed_color_conflict_is_reported() {
        let mut rel = AdjacencyRelation::with_nodes(ids(2));
        rel.add_edge(ClusterId(0), ClusterId(1));
        let bad = ColorAssignment {
            entries: vec![(ClusterId(0), 3), (ClusterId(1), 3)],
        };
        assert_eq!(bad.conflicts(&rel), vec![(ClusterId(0), ClusterId(1))]);
        assert!(!bad.is_proper(&rel));
    }

    #[test]
    fn greedy_color_follows_cluster_slice_order() {
        let cluster = |id: u32, x: f64| {
            Cluster::with_buildings(
                ClusterId(id),
                vec![
                    Building::new(1, x, 0.0),
                    Building::new(2, x + 1.0, 0.0),
                    Building::new(3, x, 1.0),
                ],
            )
        };
        let clusters = vec![cluster(9, 0.0), cluster(4, 0.5), cluster(6, 10.0)];
        let rel = build_adjacency(&clusters, 1.5).unwrap();
        let colors = greedy_color(&clusters, &rel, DEFAULT_SEED_COLOR).unwrap();
        let got: Vec<_> = colors.iter().collect();
        assert_eq!(got, vec![(ClusterId(9), 1), (ClusterId(4), 0), (ClusterId(6), 0)]);
    }

    #[test]
    fn random_relations_are_colored_properly() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..40 {
            let n = rng.gen_range(1..30u32);
            let mut rel = AdjacencyRelation::with_nodes(ids(n));
            for a in 0..n {
                for b in (a + 1)..n {
                    if rng.gen_bool(0.3) {
                        rel.add_edge(ClusterId(a), ClusterId(b));
                    }
                }
            }
            let mut order = ids(n);
            order.reverse();
            let colors = greedy_color_ids(&order, &rel, DEFAULT_SEED_COLOR).unwrap();
            assert_eq!(colors.len(), n as usize);
            assert!(colors.is_proper(&rel));
            assert_eq!(colors, greedy_color_ids(&order, &rel, DEFAULT_SEED_COLOR).unwrap());
        }
    }
}
