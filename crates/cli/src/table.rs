//! Building tables: CSV with `id,x,y` plus one cluster label column per
//! granularity, named `k_<n>`.

use anyhow::{bail, Context, Result};
use hullcolor::{AdjacencyRelation, Building, BuildingId, Cluster, ClusterId};
use polars::prelude::*;
use std::path::Path;

/// Prefix that marks a cluster label column.
pub const GRANULARITY_PREFIX: &str = "k_";

#[derive(Clone, Debug)]
pub struct BuildingRow {
    pub id: BuildingId,
    pub x: f64,
    pub y: f64,
}

/// One cluster label column.
#[derive(Clone, Debug)]
pub struct Granularity {
    /// Column name, also the output sub-directory (`k_4`, ...).
    pub label: String,
    /// Cluster id per building row.
    pub assignment: Vec<ClusterId>,
}

#[derive(Clone, Debug)]
pub struct MapTable {
    pub name: String,
    pub buildings: Vec<BuildingRow>,
    pub granularities: Vec<Granularity>,
}

impl MapTable {
    /// Group buildings into clusters; cluster order is order of first
    /// appearance, building order is row order.
    ///
    /// With `page_height = Some(h)` the y axis is flipped to `h - y`.
    pub fn clusters(&self, g: &Granularity, page_height: Option<f64>) -> Vec<Cluster> {
        let mut clusters: Vec<Cluster> = Vec::new();
        for (row, &cid) in self.buildings.iter().zip(&g.assignment) {
            let y = page_height.map_or(row.y, |h| h - row.y);
            let building = Building {
                id: row.id.clone(),
                pos: hullcolor::Point::new(row.x, y),
            };
            match clusters.iter_mut().find(|c| c.id == cid) {
                Some(c) => c.push(building),
                None => clusters.push(Cluster::with_buildings(cid, vec![building])),
            }
        }
        clusters
    }
}

/// Map name from a file name: the stem up to `_Building`, if present.
pub fn map_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "map".to_string());
    match stem.split_once("_Building") {
        Some((head, _)) if !head.is_empty() => head.to_string(),
        _ => stem,
    }
}

pub fn read_table(path: &Path) -> Result<MapTable> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()
        .and_then(|lf| lf.collect())
        .with_context(|| format!("reading {}", path.display()))?;

    let ids: Vec<BuildingId> = df
        .column("id")?
        .cast(&DataType::String)?
        .str()?
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.map(BuildingId::parse).with_context(|| format!("row {i}: missing id")))
        .collect::<Result<_>>()?;
    let xs = float_column(&df, "x")?;
    let ys = float_column(&df, "y")?;

    let buildings = ids
        .into_iter()
        .zip(xs)
        .zip(ys)
        .map(|((id, x), y)| BuildingRow { id, x, y })
        .collect();

    let mut labels: Vec<String> = df
        .get_columns()
        .iter()
        .map(|s| s.name().to_string())
        .filter(|name| name.starts_with(GRANULARITY_PREFIX))
        .collect();
    labels.sort_by_key(|l| granularity_rank(l));
    if labels.is_empty() {
        bail!(
            "{}: no cluster label columns (expected `{GRANULARITY_PREFIX}<n>`)",
            path.display()
        );
    }
    let granularities = labels
        .into_iter()
        .map(|label| {
            let assignment = cluster_column(&df, &label)?;
            Ok(Granularity { label, assignment })
        })
        .collect::<Result<_>>()?;

    Ok(MapTable {
        name: map_name(path),
        buildings,
        granularities,
    })
}

/// Numeric suffix for ordering `k_4` before `k_10`; non-numeric labels last.
fn granularity_rank(label: &str) -> (u64, String) {
    let n = label
        .strip_prefix(GRANULARITY_PREFIX)
        .and_then(|s| s.parse().ok())
        .unwrap_or(u64::MAX);
    (n, label.to_string())
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    df.column(name)?
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(i, v)| match v {
            Some(v) if v.is_finite() => Ok(v),
            _ => bail!("column `{name}` row {i}: missing or non-finite value"),
        })
        .collect()
}

fn cluster_column(df: &DataFrame, name: &str) -> Result<Vec<ClusterId>> {
    df.column(name)?
        .cast(&DataType::Int64)?
        .i64()?
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            let v = v.with_context(|| format!("column `{name}` row {i}: missing label"))?;
            let id = u32::try_from(v)
                .with_context(|| format!("column `{name}` row {i}: label {v} out of range"))?;
            Ok(ClusterId(id))
        })
        .collect()
}

/// Square 0/1 matrix without header; rows and columns follow processing order.
pub fn read_adjacency_matrix(path: &Path) -> Result<Vec<Vec<u8>>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(false)
        .finish()
        .and_then(|lf| lf.collect())
        .with_context(|| format!("reading {}", path.display()))?;
    let (height, width) = df.shape();
    if height != width {
        bail!("{}: adjacency matrix is {height}x{width}", path.display());
    }
    let mut rows = vec![vec![0u8; width]; height];
    for (j, col) in df.get_columns().iter().enumerate() {
        let col = col.cast(&DataType::Int64)?;
        for (i, v) in col.i64()?.into_iter().enumerate() {
            rows[i][j] = match v {
                Some(0) => 0,
                Some(1) => 1,
                Some(other) => bail!(
                    "{}: row {}, column {} holds {other}, expected 0 or 1",
                    path.display(),
                    i + 1,
                    j + 1
                ),
                None => bail!(
                    "{}: row {}, column {} is empty or not an integer",
                    path.display(),
                    i + 1,
                    j + 1
                ),
            };
        }
    }
    Ok(rows)
}

/// Relation from a matrix for one run's processing order.
pub fn provided_relation(matrix: &[Vec<u8>], order: &[ClusterId]) -> Result<AdjacencyRelation> {
    if matrix.len() != order.len() {
        bail!(
            "adjacency matrix has {} rows but the run has {} clusters",
            matrix.len(),
            order.len()
        );
    }
    Ok(AdjacencyRelation::from_matrix(order, matrix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn map_name_strips_building_suffix() {
        assert_eq!(map_name(Path::new("in/Campus_Building_Map.csv")), "Campus");
        assert_eq!(map_name(Path::new("plain.csv")), "plain");
    }

    #[test]
    fn read_table_groups_by_first_appearance() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Town_Buildings.csv");
        fs::write(
            &path,
            "id,x,y,k_10,k_2\n1,0,0,5,1\nA7,1,0,3,1\n3,0,1,5,0\n4,9,9,3,0\n",
        )
        .unwrap();
        let table = read_table(&path).unwrap();
        assert_eq!(table.name, "Town");
        assert_eq!(table.buildings.len(), 4);
        assert_eq!(table.buildings[1].id, BuildingId::Name("A7".into()));
        let labels: Vec<_> = table.granularities.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["k_2", "k_10"]);

        let k10 = &table.granularities[1];
        let clusters = table.clusters(k10, Some(10.0));
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].id, ClusterId(5));
        assert_eq!(clusters[0].len(), 2);
        assert_eq!(clusters[0].buildings[1].pos, hullcolor::Point::new(0.0, 9.0));
        assert_eq!(clusters[1].id, ClusterId(3));
    }

    #[test]
    fn read_table_requires_label_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.csv");
        fs::write(&path, "id,x,y\n1,0,0\n").unwrap();
        assert!(read_table(&path).is_err());
    }

    #[test]
    fn matrix_reader_checks_shape_and_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("adj.csv");
        fs::write(&path, "0,1,0\n1,0,0\n0,0,0\n").unwrap();
        let m = read_adjacency_matrix(&path).unwrap();
        assert_eq!(m, vec![vec![0, 1, 0], vec![1, 0, 0], vec![0, 0, 0]]);

        let order = [ClusterId(4), ClusterId(2), ClusterId(9)];
        let rel = provided_relation(&m, &order).unwrap();
        assert!(rel.are_adjacent(ClusterId(4), ClusterId(2)));
        assert_eq!(rel.degree(ClusterId(9)), 0);
        assert!(provided_relation(&m, &order[..2]).is_err());
    }

    #[test]
    fn matrix_reader_rejects_blank_and_non_binary_cells() {
        let dir = tempdir().unwrap();
        let blank = dir.path().join("blank.csv");
        fs::write(&blank, "0,1\n1,\n").unwrap();
        let err = read_adjacency_matrix(&blank).unwrap_err();
        assert!(err.to_string().contains("row 2, column 2"), "{err}");

        let wide = dir.path().join("wide.csv");
        fs::write(&wide, "0,2\n1,0\n").unwrap();
        let err = read_adjacency_matrix(&wide).unwrap_err();
        assert!(err.to_string().contains("expected 0 or 1"), "{err}");
    }
}
