//! Per-file, per-granularity driver around the core.
//!
//! Each (map, granularity) pair is one unit of work. A core error fails only
//! that unit: it is logged and skipped, and the remaining units still run.
//! The same holds for a unit's provided adjacency matrix
//! (`<adjacency_dir>/<map>/<granularity>.csv`): missing, malformed or
//! mis-sized matrices skip that unit only.

use anyhow::{bail, Context, Result};
use hullcolor::synth::{scatter, ScatterCfg};
use hullcolor::{color_map, AdjacencySource, Cluster, ClusterId, RunCfg};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

use crate::export::{run_report, write_run};
use crate::provenance::{write_sidecar, Payload};
use crate::table::{provided_relation, read_adjacency_matrix, read_table};

/// Options for the `color` command.
#[derive(Clone, Debug)]
pub struct ColorOpts {
    pub input: PathBuf,
    pub out: PathBuf,
    pub scale_factor: f64,
    pub seed_color: usize,
    pub page_height: Option<f64>,
    pub adjacency_dir: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct Summary {
    pub runs: usize,
    pub skipped: usize,
    pub outputs: Vec<PathBuf>,
}

/// CSV files to process: the input itself, or a directory's `.csv` entries
/// in name order.
pub fn input_files(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        bail!("input {} does not exist", input.display());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(input).with_context(|| format!("listing {}", input.display()))? {
        let path = entry?.path();
        if is_csv(&path) {
            files.push(path);
        } else {
            tracing::info!(path = %path.display(), "skipping non-csv entry");
        }
    }
    files.sort();
    Ok(files)
}

fn is_csv(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

pub fn color_inputs(opts: &ColorOpts) -> Result<Summary> {
    let files = input_files(&opts.input)?;
    tracing::info!(files = files.len(), input = %opts.input.display(), "color");

    let mut summary = Summary::default();
    for file in &files {
        let table = read_table(file)?;
        tracing::info!(map = %table.name, granularities = table.granularities.len(), "map");
        for g in &table.granularities {
            let clusters = table.clusters(g, opts.page_height);
            let matrix = opts
                .adjacency_dir
                .as_deref()
                .map(|dir| matrix_path(dir, &table.name, &g.label));
            let adjacency_source = match &matrix {
                Some(path) => match provided_source(path, &clusters) {
                    Ok(source) => source,
                    Err(err) => {
                        tracing::warn!(
                            map = %table.name,
                            granularity = %g.label,
                            error = %format!("{err:#}"),
                            "skipping unit: adjacency matrix unusable"
                        );
                        summary.skipped += 1;
                        continue;
                    }
                },
                None => AdjacencySource::Derived,
            };
            let cfg = RunCfg {
                scale_factor: opts.scale_factor,
                seed_color: opts.seed_color,
                adjacency_source,
            };
            let params = json!({
                "input": file.to_string_lossy(),
                "page_height": opts.page_height,
                "adjacency_matrix": matrix.as_ref().map(|p| p.to_string_lossy()),
            });
            let dir = opts.out.join(&table.name).join(&g.label);
            run_unit(&dir, &table.name, &g.label, &cfg, &clusters, params, &mut summary)?;
        }
    }
    Ok(summary)
}

/// Where the matrix for one (map, granularity) unit lives.
pub fn matrix_path(dir: &Path, map: &str, label: &str) -> PathBuf {
    dir.join(map).join(format!("{label}.csv"))
}

fn provided_source(path: &Path, clusters: &[Cluster]) -> Result<AdjacencySource> {
    if !path.is_file() {
        bail!("no adjacency matrix at {}", path.display());
    }
    let matrix = read_adjacency_matrix(path)?;
    let order: Vec<ClusterId> = clusters.iter().map(|c| c.id).collect();
    let relation = provided_relation(&matrix, &order).with_context(|| path.display().to_string())?;
    Ok(AdjacencySource::Provided(relation))
}

/// Options for the `demo` command.
#[derive(Clone, Debug)]
pub struct DemoOpts {
    pub out: PathBuf,
    pub layout: ScatterCfg,
    pub seed: u64,
    pub scale_factor: f64,
    pub seed_color: usize,
}

pub fn demo(opts: &DemoOpts) -> Result<Summary> {
    let clusters = scatter(opts.layout, opts.seed);
    let label = format!("k_{}", opts.layout.clusters);
    let cfg = RunCfg {
        scale_factor: opts.scale_factor,
        seed_color: opts.seed_color,
        adjacency_source: AdjacencySource::Derived,
    };
    let params = json!({
        "synthetic_seed": opts.seed,
        "columns": opts.layout.columns,
        "spacing": opts.layout.spacing,
        "spread": opts.layout.spread,
    });
    let dir = opts.out.join("demo").join(&label);
    let mut summary = Summary::default();
    run_unit(&dir, "demo", &label, &cfg, &clusters, params, &mut summary)?;
    Ok(summary)
}

/// Color one unit and export it. Core errors skip the unit; I/O errors abort.
fn run_unit(
    dir: &Path,
    map: &str,
    label: &str,
    cfg: &RunCfg,
    clusters: &[Cluster],
    mut params: serde_json::Value,
    summary: &mut Summary,
) -> Result<()> {
    let run = match color_map(clusters, cfg) {
        Ok(run) => run,
        Err(err) => {
            tracing::warn!(map, granularity = label, error = %err, "skipping unit");
            summary.skipped += 1;
            return Ok(());
        }
    };
    tracing::info!(
        map,
        granularity = label,
        clusters = run.order.len(),
        edges = run.derived.edge_count(),
        colors = run.colors.palette_size(),
        "colored"
    );
    let report = run_report(map, label, cfg, clusters, &run);
    let (csv_path, report_path) = write_run(dir, clusters, &report, &run)?;

    params["map"] = json!(map);
    params["granularity"] = json!(label);
    params["scale_factor"] = json!(cfg.scale_factor);
    params["seed_color"] = json!(cfg.seed_color);
    let payload = Payload::new(params)
        .with_output(&report_path)
        .with_output(&csv_path);
    let prov = write_sidecar(&report_path, payload)?;

    summary.runs += 1;
    summary.outputs.extend([csv_path, report_path, prov]);
    Ok(())
}
