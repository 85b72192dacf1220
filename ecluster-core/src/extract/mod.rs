//! Cluster growth engine.
//!
//! Partitions the participating points of a cloud into connected components
//! of the radius-`tolerance` neighbour graph, optionally split further by an
//! [`AdmissionPredicate`]:
//!
//! - Points are visited in traversal order (cloud order, or index-subset
//!   order). Every unvisited point seeds a new cluster.
//! - The cluster's own identifier list doubles as the breadth-first work
//!   queue; a cursor walks it while the list grows.
//! - A neighbour is marked visited the moment it is admitted, so it can never
//!   be claimed by a second cluster and is queried at most once.
//! - Finished clusters outside the size bounds are discarded, but their
//!   points stay visited and are never reconsidered.
//!
//! The engine is single-threaded. It borrows the oracle for the duration of
//! the call and owns the visited set exclusively.

use tracing::{debug, info, instrument, warn};

use crate::{
    Result,
    cloud::{NormalCloud, PointCloud, PointId},
    error::ExtractionError,
    oracle::{NeighbourBuffer, ProximityOracle},
    predicate::{AdmissionPredicate, NormalDeviation},
    result::{Extraction, ExtractionStats, PointCluster},
};

/// Inclusive size bounds a cluster must satisfy to be committed.
///
/// # Examples
/// ```
/// use ecluster_core::ClusterBounds;
///
/// let bounds = ClusterBounds::new(2, 4)?;
/// assert!(!bounds.contains(1));
/// assert!(bounds.contains(4));
/// assert_eq!(ClusterBounds::default().min(), 1);
/// # Ok::<(), ecluster_core::ExtractionError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClusterBounds {
    min: usize,
    max: usize,
}

impl ClusterBounds {
    /// Default upper bound, matching the largest signed 32-bit count.
    pub const DEFAULT_MAX: usize = i32::MAX as usize;

    /// Creates bounds accepting clusters of `min..=max` points.
    ///
    /// # Errors
    /// Returns [`ExtractionError::InvalidClusterBounds`] when `min > max`.
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if min > max {
            return Err(ExtractionError::InvalidClusterBounds { min, max });
        }
        Ok(Self { min, max })
    }

    /// Returns the smallest admissible cluster size.
    #[must_use]
    pub fn min(&self) -> usize {
        self.min
    }

    /// Returns the largest admissible cluster size.
    #[must_use]
    pub fn max(&self) -> usize {
        self.max
    }

    /// Returns whether a cluster of `len` points would be committed.
    #[must_use]
    pub fn contains(&self, len: usize) -> bool {
        (self.min..=self.max).contains(&len)
    }
}

impl Default for ClusterBounds {
    fn default() -> Self {
        Self {
            min: 1,
            max: Self::DEFAULT_MAX,
        }
    }
}

/// Extracts clusters from `cloud` using `oracle` for radius queries.
///
/// When `indices` is supplied only those points participate, in that order,
/// and the oracle must have been built over exactly that subset. The
/// predicate receives the identifier of the point that opened the growing
/// cluster as its seed.
///
/// # Errors
/// Returns [`ExtractionError::InvalidTolerance`] for a negative or non-finite
/// tolerance, [`ExtractionError::OracleIndexMismatch`] when the subset size
/// differs from the oracle's, [`ExtractionError::CloudSizeMismatch`] when the
/// oracle was built over a different cloud size, and
/// [`ExtractionError::IndexOutOfBounds`] when the subset names a point outside
/// the cloud. No clusters are produced on error.
///
/// # Examples
/// ```
/// use ecluster_core::{
///     AcceptAll, ClusterBounds, DenseCloud, LinearScanOracle, extract_clusters,
/// };
///
/// let xs = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
/// let cloud = DenseCloud::from_rows(xs.iter().map(|&x| vec![x]).collect())?;
/// let oracle = LinearScanOracle::new(&cloud);
/// let extraction =
///     extract_clusters(&cloud, None, &AcceptAll, &oracle, 1.5, ClusterBounds::default())?;
/// let clusters: Vec<&[usize]> = extraction.clusters().iter().map(|c| c.indices()).collect();
/// assert_eq!(clusters, [&[0, 1, 2][..], &[3, 4, 5][..]]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "core.extract",
    err,
    skip_all,
    fields(
        points = cloud.len(),
        participating = indices.map_or(cloud.len(), <[PointId]>::len),
        tolerance = tolerance,
        min_cluster_size = bounds.min(),
        max_cluster_size = bounds.max(),
        sorted = oracle.sorted_results(),
    ),
)]
pub fn extract_clusters<C, P, O>(
    cloud: &C,
    indices: Option<&[PointId]>,
    predicate: &P,
    oracle: &O,
    tolerance: f32,
    bounds: ClusterBounds,
) -> Result<Extraction>
where
    C: PointCloud + ?Sized,
    P: AdmissionPredicate<C> + ?Sized,
    O: ProximityOracle + ?Sized,
{
    validate_entry(cloud, indices, oracle, tolerance)?;

    let growth = Growth {
        cloud,
        predicate,
        oracle,
        tolerance,
        bounds,
    };
    let extraction = match indices {
        Some(subset) => growth.run(subset.iter().copied()),
        None => growth.run(0..cloud.len()),
    };

    let stats = extraction.stats();
    record_metrics(&stats);
    info!(
        clusters = stats.committed,
        discarded = stats.discarded,
        visited = stats.visited,
        failed_queries = stats.failed_queries,
        "cluster extraction completed"
    );
    Ok(extraction)
}

/// Extracts clusters whose growth is gated by normal-angle deviation.
///
/// Builds a [`NormalDeviation`] predicate for `max_angle` radians and runs
/// [`extract_clusters`]. An empty index subset returns no clusters and no
/// error.
///
/// # Errors
/// Returns [`ExtractionError::NormalCountMismatch`] when `normals` is not
/// parallel to `cloud`, plus every error of [`extract_clusters`].
#[instrument(
    name = "core.extract_with_normals",
    err,
    skip_all,
    fields(points = cloud.len(), normals = normals.len(), max_angle = max_angle),
)]
pub fn extract_clusters_with_normals<C, O>(
    cloud: &C,
    normals: &NormalCloud,
    indices: Option<&[PointId]>,
    oracle: &O,
    tolerance: f32,
    max_angle: f64,
    bounds: ClusterBounds,
) -> Result<Extraction>
where
    C: PointCloud + ?Sized,
    O: ProximityOracle + ?Sized,
{
    if normals.len() != cloud.len() {
        warn!(
            points = cloud.len(),
            normals = normals.len(),
            "normal count differs from point count, returning error"
        );
        return Err(ExtractionError::NormalCountMismatch {
            points: cloud.len(),
            normals: normals.len(),
        });
    }
    if indices.is_some_and(<[PointId]>::is_empty) {
        debug!("empty index subset, nothing to extract");
        return Ok(Extraction::default());
    }

    let predicate = NormalDeviation::new(normals, max_angle);
    extract_clusters(cloud, indices, &predicate, oracle, tolerance, bounds)
}

fn validate_entry<C, O>(
    cloud: &C,
    indices: Option<&[PointId]>,
    oracle: &O,
    tolerance: f32,
) -> Result<()>
where
    C: PointCloud + ?Sized,
    O: ProximityOracle + ?Sized,
{
    if !tolerance.is_finite() || tolerance < 0.0 {
        warn!(tolerance, "invalid cluster tolerance, returning error");
        return Err(ExtractionError::InvalidTolerance { got: tolerance });
    }

    if let Some(subset) = indices {
        let oracle_len = oracle.index_len().unwrap_or_else(|| oracle.cloud_len());
        if oracle_len != subset.len() {
            warn!(
                oracle = oracle_len,
                supplied = subset.len(),
                "oracle built over a different index subset, returning error"
            );
            return Err(ExtractionError::OracleIndexMismatch {
                oracle: oracle_len,
                supplied: subset.len(),
            });
        }
    }

    let len = cloud.len();
    if oracle.cloud_len() != len {
        warn!(
            oracle = oracle.cloud_len(),
            cloud = len,
            "oracle built over a different cloud size, returning error"
        );
        return Err(ExtractionError::CloudSizeMismatch {
            oracle: oracle.cloud_len(),
            cloud: len,
        });
    }

    if let Some(&index) = indices.and_then(|subset| subset.iter().find(|&&id| id >= len)) {
        warn!(index, len, "index subset names a point outside the cloud, returning error");
        return Err(ExtractionError::IndexOutOfBounds { index, len });
    }
    Ok(())
}

struct Growth<'a, C: ?Sized, P: ?Sized, O: ?Sized> {
    cloud: &'a C,
    predicate: &'a P,
    oracle: &'a O,
    tolerance: f32,
    bounds: ClusterBounds,
}

impl<C, P, O> Growth<'_, C, P, O>
where
    C: PointCloud + ?Sized,
    P: AdmissionPredicate<C> + ?Sized,
    O: ProximityOracle + ?Sized,
{
    fn run(&self, traversal: impl Iterator<Item = PointId>) -> Extraction {
        let mut visited = vec![false; self.cloud.len()];
        let mut neighbours = NeighbourBuffer::default();
        let mut stats = ExtractionStats::default();
        let mut clusters = Vec::new();

        for seed in traversal {
            match visited.get_mut(seed) {
                Some(flag) if !*flag => *flag = true,
                _ => continue,
            }
            stats.seeds += 1;
            stats.visited += 1;

            let members = self.grow(seed, &mut visited, &mut neighbours, &mut stats);
            if self.bounds.contains(members.len()) {
                stats.committed += 1;
                clusters.push(PointCluster::new(members, self.cloud.header().clone()));
            } else {
                stats.discarded += 1;
                debug!(seed, size = members.len(), "discarding cluster outside size bounds");
            }
        }

        Extraction::new(clusters, stats)
    }

    fn grow(
        &self,
        seed: PointId,
        visited: &mut [bool],
        neighbours: &mut NeighbourBuffer,
        stats: &mut ExtractionStats,
    ) -> Vec<PointId> {
        let skip_self = self.oracle.sorted_results();
        let mut members = vec![seed];
        let mut cursor = 0;

        while let Some(&current) = members.get(cursor) {
            cursor += 1;
            stats.oracle_queries += 1;
            if let Err(error) = self
                .oracle
                .radius_search(current, self.tolerance, neighbours)
            {
                stats.failed_queries += 1;
                debug!(point = current, %error, "radius search failed, skipping expansion");
                continue;
            }

            let ids = neighbours.ids();
            let start = usize::from(skip_self && ids.first() == Some(&current));
            for (position, &candidate) in ids.iter().enumerate().skip(start) {
                let Some(flag) = visited.get_mut(candidate) else {
                    stats.rejected_neighbours += 1;
                    warn!(
                        point = current,
                        neighbour = candidate,
                        "oracle returned a neighbour outside the cloud, ignoring it"
                    );
                    continue;
                };
                if *flag {
                    continue;
                }
                if self.predicate.admit(self.cloud, seed, ids, position) {
                    *flag = true;
                    stats.visited += 1;
                    members.push(candidate);
                }
            }
        }
        members
    }
}

#[cfg(feature = "metrics")]
fn record_metrics(stats: &ExtractionStats) {
    let count = |value: usize| u64::try_from(value).unwrap_or(u64::MAX);
    metrics::counter!("cluster_extraction_clusters_committed").increment(count(stats.committed));
    metrics::counter!("cluster_extraction_clusters_discarded").increment(count(stats.discarded));
    metrics::counter!("cluster_extraction_oracle_failures").increment(count(stats.failed_queries));
}

#[cfg(not(feature = "metrics"))]
fn record_metrics(_: &ExtractionStats) {}


#[cfg(test)]
mod property;
