//! Benchmark parameter types.

use std::fmt;

/// Radius-search backend measured by a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OracleKind {
    /// Exhaustive scan per query.
    Linear,
    /// Bulk-loaded R*-tree.
    RTree,
}

impl fmt::Display for OracleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linear => "linear",
            Self::RTree => "rtree",
        })
    }
}

/// Parameters for one extraction benchmark run.
#[derive(Clone, Debug)]
pub struct ExtractionBenchParams {
    /// Radius-search backend.
    pub oracle: OracleKind,
    /// Number of points in the cloud.
    pub point_count: usize,
    /// Whether the oracle returns nearest-first neighbour lists.
    pub sorted: bool,
    /// Whether growth is gated by normal deviation.
    pub normals: bool,
}

impl fmt::Display for ExtractionBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},n={},sorted={}",
            self.oracle, self.point_count, self.sorted
        )?;
        if self.normals {
            f.write_str(",normals")?;
        }
        Ok(())
    }
}
