//! Error type shared by the geometry kernel, the intersection tester and the
//! adjacency builder.
//!
//! All variants are deterministic: the same input reproduces the same error,
//! so callers should skip or abort the current (map, granularity) run rather
//! than retry.

use std::fmt;

use crate::cluster::ClusterId;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Hull construction received no usable points.
    DegenerateInput { reason: String },
    /// A polygon handed to the intersection tester has no vertices.
    InvalidPolygon { reason: String },
    /// Scale factor is not a finite positive number.
    InvalidScaleFactor { factor: f64 },
    /// Two clusters in one run share an identifier.
    DuplicateCluster { id: ClusterId },
}

impl EngineError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_polygon(reason: impl Into<String>) -> Self {
        Self::InvalidPolygon {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateInput { reason } => write!(f, "degenerate input: {reason}"),
            Self::InvalidPolygon { reason } => write!(f, "invalid polygon: {reason}"),
            Self::InvalidScaleFactor { factor } => {
                write!(f, "scale factor must be finite and > 0, got {factor}")
            }
            Self::DuplicateCluster { id } => write!(f, "duplicate cluster id {id}"),
        }
    }
}

impl std::error::Error for EngineError {}
