//! Buildings, clusters and the per-cluster geometric footprint.
//!
//! A cluster's hull, centroid and scaled hull are recomputed on demand and
//! never cached: every (map, granularity) run starts from fresh clusters.
//!
//! Centroid source
//! - The scaling origin is the mean of the raw building coordinates, never
//!   the mean of the hull vertices. It is a convex combination of the
//!   buildings, so it always lies inside the hull and `factor > 1` grows the
//!   hull outward on every side.

use std::fmt;

use crate::error::EngineError;
use crate::geom::{compute_centroid, compute_hull, scale_hull, Point};

/// Building identifier as it appears in the upstream table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuildingId {
    Int(i64),
    Name(String),
}

impl BuildingId {
    /// Integer text becomes `Int`; anything else is kept verbatim.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => Self::Int(n),
            Err(_) => Self::Name(trimmed.to_string()),
        }
    }
}

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Name(s) => f.write_str(s),
        }
    }
}

impl From<i64> for BuildingId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for BuildingId {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<&str> for BuildingId {
    fn from(s: &str) -> Self {
        Self::Name(s.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Building {
    pub id: BuildingId,
    pub pos: Point,
}

impl Building {
    #[inline]
    pub fn new(id: impl Into<BuildingId>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            pos: Point::new(x, y),
        }
    }
}

/// Cluster identifier, unique within one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub u32);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered collection of buildings (insertion order from upstream clustering).
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    pub id: ClusterId,
    pub buildings: Vec<Building>,
}

impl Cluster {
    pub fn new(id: ClusterId) -> Self {
        Self {
            id,
            buildings: Vec::new(),
        }
    }

    pub fn with_buildings(id: ClusterId, buildings: Vec<Building>) -> Self {
        Self { id, buildings }
    }

    #[inline]
    pub fn push(&mut self, building: Building) {
        self.buildings.push(building);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    /// Building coordinates in insertion order.
    pub fn points(&self) -> Vec<Point> {
        self.buildings.iter().map(|b| b.pos).collect()
    }

    pub fn hull(&self) -> Result<Vec<Point>, EngineError> {
        compute_hull(&self.points())
    }

    pub fn centroid(&self) -> Result<Point, EngineError> {
        compute_centroid(&self.points())
    }

    pub fn scaled_hull(&self, factor: f64) -> Result<Vec<Point>, EngineError> {
        Ok(self.footprint(factor)?.scaled_hull)
    }

    /// Hull, centroid and scaled hull from a single pass over the buildings.
    pub fn footprint(&self, factor: f64) -> Result<Footprint, EngineError> {
        let points = self.points();
        let hull = compute_hull(&points)?;
        let centroid = compute_centroid(&points)?;
        let scaled_hull = scale_hull(&hull, centroid, factor)?;
        Ok(Footprint {
            hull,
            centroid,
            scaled_hull,
        })
    }
}

/// Geometric artifacts derived from one cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct Footprint {
    pub hull: Vec<Point>,
    pub centroid: Point,
    pub scaled_hull: Vec<Point>,
}
