//! Per-run outputs: a building table (CSV) and a cluster report (JSON).

use anyhow::{Context, Result};
use hullcolor::{AdjacencyRelation, Cluster, MapColoring, Point, RunCfg};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::palette::{rgb, rgb_unit};

#[derive(Serialize)]
pub struct ClusterReport {
    pub id: u32,
    pub color: usize,
    pub rgb: [f64; 3],
    pub buildings: usize,
    pub centroid: [f64; 2],
    pub hull: Vec<[f64; 2]>,
    pub scaled_hull: Vec<[f64; 2]>,
    pub neighbors: Vec<u32>,
}

#[derive(Serialize)]
pub struct RunReport {
    pub map: String,
    pub granularity: String,
    pub scale_factor: f64,
    pub seed_color: usize,
    pub palette_size: usize,
    pub clusters: Vec<ClusterReport>,
    /// Relation from scaled-hull contact, keyed by cluster id.
    pub derived_adjacency: BTreeMap<u32, Vec<u32>>,
    /// Relation the colors were computed against.
    pub coloring_adjacency: BTreeMap<u32, Vec<u32>>,
}

fn xy(p: &Point) -> [f64; 2] {
    [p.x, p.y]
}

fn adjacency_lists(rel: &AdjacencyRelation) -> BTreeMap<u32, Vec<u32>> {
    rel.nodes()
        .map(|id| (id.0, rel.neighbors(id).map(|n| n.0).collect()))
        .collect()
}

pub fn run_report(
    map: &str,
    granularity: &str,
    cfg: &RunCfg,
    clusters: &[Cluster],
    run: &MapColoring,
) -> RunReport {
    let clusters = clusters
        .iter()
        .zip(&run.footprints)
        .zip(run.colors.iter())
        .map(|((cluster, fp), (id, color))| ClusterReport {
            id: id.0,
            color,
            rgb: rgb_unit(color),
            buildings: cluster.len(),
            centroid: xy(&fp.centroid),
            hull: fp.hull.iter().map(xy).collect(),
            scaled_hull: fp.scaled_hull.iter().map(xy).collect(),
            neighbors: run.derived.neighbors(id).map(|n| n.0).collect(),
        })
        .collect();
    RunReport {
        map: map.to_string(),
        granularity: granularity.to_string(),
        scale_factor: cfg.scale_factor,
        seed_color: cfg.seed_color,
        palette_size: run.colors.palette_size(),
        clusters,
        derived_adjacency: adjacency_lists(&run.derived),
        coloring_adjacency: adjacency_lists(&run.coloring_relation),
    }
}

/// Building table with cluster, color id and 8-bit RGB per row.
pub fn clusters_frame(clusters: &[Cluster], run: &MapColoring) -> Result<DataFrame> {
    let mut building = Vec::new();
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut cluster = Vec::new();
    let mut color = Vec::new();
    let (mut r, mut g, mut b) = (Vec::new(), Vec::new(), Vec::new());
    for c in clusters {
        let id = c.id;
        let col = run
            .colors
            .get(id)
            .with_context(|| format!("cluster {id} has no color"))?;
        let [cr, cg, cb] = rgb(col);
        for bld in &c.buildings {
            building.push(bld.id.to_string());
            x.push(bld.pos.x);
            y.push(bld.pos.y);
            cluster.push(id.0);
            color.push(col as u64);
            r.push(u32::from(cr));
            g.push(u32::from(cg));
            b.push(u32::from(cb));
        }
    }
    let df = df!(
        "building" => building,
        "x" => x,
        "y" => y,
        "cluster" => cluster,
        "color" => color,
        "r" => r,
        "g" => g,
        "b" => b
    )?;
    Ok(df)
}

/// Create `dir` (and parents) unless it already exists.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    Ok(())
}

/// Write `clusters.csv` and `report.json` into `dir`; returns both paths.
pub fn write_run(
    dir: &Path,
    clusters: &[Cluster],
    report: &RunReport,
    run: &MapColoring,
) -> Result<(PathBuf, PathBuf)> {
    ensure_dir(dir)?;
    let csv_path = dir.join("clusters.csv");
    let mut df = clusters_frame(clusters, run)?;
    let mut file = fs::File::create(&csv_path)
        .with_context(|| format!("creating {}", csv_path.display()))?;
    CsvWriter::new(&mut file)
        .finish(&mut df)
        .with_context(|| format!("writing {}", csv_path.display()))?;

    let report_path = dir.join("report.json");
    fs::write(&report_path, serde_json::to_vec_pretty(report)?)
        .with_context(|| format!("writing {}", report_path.display()))?;
    Ok((csv_path, report_path))
}
