//! Seeded synthetic building layouts.
//!
//! Clusters are blobs of buildings around grid cell centers with bounded
//! jitter, so neighboring cells produce near-touching footprints. Used by the
//! benchmarks, property tests and the CLI `demo` command.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cluster::{Building, Cluster, ClusterId};

/// Layout parameters.
#[derive(Clone, Copy, Debug)]
pub struct ScatterCfg {
    /// Grid columns; rows follow from `clusters`.
    pub columns: usize,
    pub clusters: usize,
    /// Buildings per cluster, inclusive range.
    pub buildings_min: usize,
    pub buildings_max: usize,
    /// Distance between neighboring cell centers.
    pub spacing: f64,
    /// Max offset of a building from its cell center, as a fraction of `spacing`.
    pub spread: f64,
}

impl Default for ScatterCfg {
    fn default() -> Self {
        Self {
            columns: 4,
            clusters: 12,
            buildings_min: 3,
            buildings_max: 12,
            spacing: 100.0,
            spread: 0.35,
        }
    }
}

/// Draw a layout; the same `(cfg, seed)` always yields the same clusters.
pub fn scatter(cfg: ScatterCfg, seed: u64) -> Vec<Cluster> {
    let mut rng = StdRng::seed_from_u64(seed);
    let columns = cfg.columns.max(1);
    let lo = cfg.buildings_min.max(1);
    let hi = cfg.buildings_max.max(lo);
    let reach = cfg.spacing * cfg.spread.clamp(0.0, 1.0);
    let mut next_building = 0i64;

    (0..cfg.clusters)
        .map(|k| {
            let cx = (k % columns) as f64 * cfg.spacing;
            let cy = (k / columns) as f64 * cfg.spacing;
            let n = rng.gen_range(lo..=hi);
            let buildings = (0..n)
                .map(|_| {
                    let dx = (rng.gen::<f64>() * 2.0 - 1.0) * reach;
                    let dy = (rng.gen::<f64>() * 2.0 - 1.0) * reach;
                    next_building += 1;
                    Building::new(next_building, cx + dx, cy + dy)
                })
                .collect();
            Cluster::with_buildings(ClusterId(k as u32), buildings)
        })
        .collect()
}
