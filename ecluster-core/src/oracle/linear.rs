//! Exhaustive radius search over a [`DenseCloud`].
//!
//! No index structure is built: every query scans the participating points.
//! Large scans are split across the rayon pool when the `cpu` feature is
//! enabled; the result order is identical to the sequential scan.

#[cfg(feature = "cpu")]
use rayon::prelude::*;

use super::{NeighbourBuffer, ProximityOracle, nearest_first};
use crate::{
    cloud::{DenseCloud, PointCloud, PointId},
    error::OracleError,
};

/// Candidate count above which the scan is parallelised.
#[cfg(feature = "cpu")]
const PARALLEL_SCAN_THRESHOLD: usize = 16_384;

/// Reference oracle answering radius queries by linear scan.
///
/// # Examples
/// ```
/// use ecluster_core::{DenseCloud, LinearScanOracle, NeighbourBuffer, ProximityOracle};
///
/// let cloud = DenseCloud::from_rows(vec![vec![0.0], vec![1.0], vec![5.0]])?;
/// let oracle = LinearScanOracle::new(&cloud).with_sorted_results(true);
/// let mut out = NeighbourBuffer::default();
/// oracle.radius_search(1, 1.5, &mut out)?;
/// assert_eq!(out.ids(), &[1, 0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct LinearScanOracle<'a> {
    cloud: &'a DenseCloud,
    indices: Option<&'a [PointId]>,
    sorted: bool,
}

impl<'a> LinearScanOracle<'a> {
    /// Creates an oracle over every point of `cloud`.
    #[must_use]
    pub fn new(cloud: &'a DenseCloud) -> Self {
        Self {
            cloud,
            indices: None,
            sorted: false,
        }
    }

    /// Restricts the searchable set to `indices`.
    #[must_use]
    pub fn with_indices(mut self, indices: &'a [PointId]) -> Self {
        self.indices = Some(indices);
        self
    }

    /// Orders results by ascending distance, query point first among ties.
    #[must_use]
    pub fn with_sorted_results(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    fn scan(&self, query: PointId, radius: f32) -> Vec<(PointId, f32)> {
        let within = |candidate: PointId| {
            self.cloud
                .distance(query, candidate)
                .filter(|distance| *distance <= radius)
                .map(|distance| (candidate, distance))
        };

        match self.indices {
            Some(indices) => scan_candidates(indices.iter().copied(), indices.len(), within),
            None => {
                let len = self.cloud.len();
                scan_candidates(0..len, len, within)
            }
        }
    }
}

#[cfg(feature = "cpu")]
fn scan_candidates<I, F>(candidates: I, count: usize, within: F) -> Vec<(PointId, f32)>
where
    I: Iterator<Item = PointId>,
    F: Fn(PointId) -> Option<(PointId, f32)> + Sync + Send,
{
    if count < PARALLEL_SCAN_THRESHOLD {
        return candidates.filter_map(within).collect();
    }
    let ids: Vec<PointId> = candidates.collect();
    ids.into_par_iter().filter_map(within).collect()
}

#[cfg(not(feature = "cpu"))]
fn scan_candidates<I, F>(candidates: I, _count: usize, within: F) -> Vec<(PointId, f32)>
where
    I: Iterator<Item = PointId>,
    F: Fn(PointId) -> Option<(PointId, f32)>,
{
    candidates.filter_map(within).collect()
}

impl ProximityOracle for LinearScanOracle<'_> {
    fn cloud_len(&self) -> usize {
        self.cloud.len()
    }

    fn index_len(&self) -> Option<usize> {
        self.indices.map(<[PointId]>::len)
    }

    fn sorted_results(&self) -> bool {
        self.sorted
    }

    fn radius_search(
        &self,
        query: PointId,
        radius: f32,
        out: &mut NeighbourBuffer,
    ) -> Result<(), OracleError> {
        out.clear();
        if !radius.is_finite() || radius < 0.0 {
            return Err(OracleError::InvalidRadius);
        }
        let len = self.cloud.len();
        if query >= len {
            return Err(OracleError::QueryOutOfBounds { query, len });
        }

        let mut hits = self.scan(query, radius);
        if self.sorted {
            hits.sort_by(|left, right| nearest_first(query, left, right));
        }
        out.extend(hits);
        Ok(())
    }
}
