//! Result types for cluster extraction.
//!
//! Provides the committed [`PointCluster`] records, the per-call
//! [`ExtractionStats`] counters, and the [`Extraction`] wrapper that bundles
//! both.

use crate::cloud::{CloudHeader, PointId};

/// A committed cluster: point identifiers in discovery order plus the source
/// cloud's metadata tag.
///
/// # Examples
/// ```
/// use ecluster_core::{CloudHeader, PointCluster};
///
/// let cluster = PointCluster::new(vec![4, 2, 3], CloudHeader::new("map"));
/// assert_eq!(cluster.len(), 3);
/// assert_eq!(cluster.indices(), &[4, 2, 3]);
/// assert_eq!(cluster.header().frame_id(), "map");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointCluster {
    indices: Vec<PointId>,
    header: CloudHeader,
}

impl PointCluster {
    /// Creates a cluster record.
    #[must_use]
    pub fn new(indices: Vec<PointId>, header: CloudHeader) -> Self {
        Self { indices, header }
    }

    /// Returns the member identifiers in discovery order.
    #[must_use]
    pub fn indices(&self) -> &[PointId] {
        &self.indices
    }

    /// Returns the metadata tag copied from the source cloud.
    #[must_use]
    pub fn header(&self) -> &CloudHeader {
        &self.header
    }

    /// Returns the number of member points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns whether the cluster has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Consumes the cluster, returning its member identifiers.
    #[must_use]
    pub fn into_indices(self) -> Vec<PointId> {
        self.indices
    }
}

/// Orders clusters by ascending size, keeping discovery order among equals.
///
/// # Examples
/// ```
/// use ecluster_core::{CloudHeader, PointCluster, sort_clusters_by_size};
///
/// let header = CloudHeader::default();
/// let mut clusters = vec![
///     PointCluster::new(vec![0, 1, 2], header.clone()),
///     PointCluster::new(vec![5], header.clone()),
///     PointCluster::new(vec![3, 4], header),
/// ];
/// sort_clusters_by_size(&mut clusters);
/// let sizes: Vec<usize> = clusters.iter().map(PointCluster::len).collect();
/// assert_eq!(sizes, [1, 2, 3]);
/// ```
pub fn sort_clusters_by_size(clusters: &mut [PointCluster]) {
    clusters.sort_by_key(PointCluster::len);
}

/// Counters describing one extraction call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Points that opened a new cluster.
    pub seeds: usize,
    /// Clusters kept because their size fell within the bounds.
    pub committed: usize,
    /// Clusters dropped for being too small or too large.
    pub discarded: usize,
    /// Points marked visited by the end of the call.
    pub visited: usize,
    /// Radius queries issued to the oracle.
    pub oracle_queries: usize,
    /// Radius queries the oracle failed to answer.
    pub failed_queries: usize,
    /// Neighbour identifiers ignored because they fell outside the cloud.
    pub rejected_neighbours: usize,
}

/// Output of one extraction call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extraction {
    clusters: Vec<PointCluster>,
    stats: ExtractionStats,
}

impl Extraction {
    pub(crate) fn new(clusters: Vec<PointCluster>, stats: ExtractionStats) -> Self {
        Self { clusters, stats }
    }

    /// Returns the committed clusters in the order their seeds were visited.
    #[must_use]
    pub fn clusters(&self) -> &[PointCluster] {
        &self.clusters
    }

    /// Returns the call's counters.
    #[must_use]
    pub fn stats(&self) -> ExtractionStats {
        self.stats
    }

    /// Consumes the extraction, returning the committed clusters.
    #[must_use]
    pub fn into_clusters(self) -> Vec<PointCluster> {
        self.clusters
    }
}
