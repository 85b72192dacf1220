//! Radius search over an R*-tree bulk-loaded from a [`DenseCloud`].
//!
//! Clouds of up to three dimensions are indexed. Lower-dimensional points are
//! padded with zero coordinates, which leaves every distance unchanged. Tree
//! hits are re-checked against [`DenseCloud::distance`] so the admitted set is
//! exactly the one [`super::LinearScanOracle`] would report.

use std::fmt;

use rstar::{RTree, primitives::GeomWithData};
use tracing::debug;

use super::{NeighbourBuffer, ProximityOracle, nearest_first};
use crate::{
    cloud::{DenseCloud, PointCloud, PointId},
    error::OracleError,
};

const INDEX_DIMENSION: usize = 3;

/// Relative widening of the tree query. Squared-distance rounding must never
/// drop a point lying exactly on the radius.
const RADIUS_SLACK: f32 = 1.000_1;

type IndexedPoint = GeomWithData<[f32; INDEX_DIMENSION], PointId>;

/// Spatially indexed oracle answering radius queries in logarithmic time.
///
/// # Examples
/// ```
/// use ecluster_core::{DenseCloud, NeighbourBuffer, ProximityOracle, RTreeOracle};
///
/// let cloud = DenseCloud::from_rows(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![5.0, 5.0]])?;
/// let oracle = RTreeOracle::new(&cloud)?.with_sorted_results(true);
/// let mut out = NeighbourBuffer::default();
/// oracle.radius_search(1, 1.5, &mut out)?;
/// assert_eq!(out.ids(), &[1, 0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct RTreeOracle<'a> {
    cloud: &'a DenseCloud,
    tree: RTree<IndexedPoint>,
    index_len: Option<usize>,
    sorted: bool,
}

impl<'a> RTreeOracle<'a> {
    /// Largest cloud dimension the index accepts.
    pub const MAX_DIMENSION: usize = INDEX_DIMENSION;

    /// Indexes every point of `cloud`.
    ///
    /// # Errors
    /// Returns [`OracleError::UnsupportedDimension`] when the cloud has more
    /// than [`Self::MAX_DIMENSION`] coordinates per point.
    pub fn new(cloud: &'a DenseCloud) -> Result<Self, OracleError> {
        Self::build(cloud, 0..cloud.len(), None)
    }

    /// Indexes only the points named by `indices`.
    ///
    /// Queries may still name any point of the cloud; only the results are
    /// restricted to the subset.
    ///
    /// # Errors
    /// Returns [`OracleError::UnsupportedDimension`] for clouds above
    /// [`Self::MAX_DIMENSION`] and [`OracleError::IndexOutOfBounds`] when an
    /// index names no cloud point.
    pub fn with_indices(cloud: &'a DenseCloud, indices: &[PointId]) -> Result<Self, OracleError> {
        Self::build(cloud, indices.iter().copied(), Some(indices.len()))
    }

    /// Orders results by ascending distance, query point first among ties.
    #[must_use]
    pub fn with_sorted_results(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    fn build(
        cloud: &'a DenseCloud,
        ids: impl Iterator<Item = PointId>,
        index_len: Option<usize>,
    ) -> Result<Self, OracleError> {
        let dimension = cloud.dimension();
        if dimension > INDEX_DIMENSION {
            return Err(OracleError::UnsupportedDimension {
                dimension,
                max: INDEX_DIMENSION,
            });
        }
        let len = cloud.len();
        let points = ids
            .map(|id| {
                cloud
                    .point(id)
                    .map(|coords| GeomWithData::new(pad(coords), id))
                    .ok_or(OracleError::IndexOutOfBounds { index: id, len })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(points = points.len(), dimension, "bulk loading r-tree");
        Ok(Self {
            cloud,
            tree: RTree::bulk_load(points),
            index_len,
            sorted: false,
        })
    }
}

impl fmt::Debug for RTreeOracle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RTreeOracle")
            .field("cloud_len", &self.cloud.len())
            .field("indexed", &self.tree.size())
            .field("index_len", &self.index_len)
            .field("sorted", &self.sorted)
            .finish()
    }
}

fn pad(coords: &[f32]) -> [f32; INDEX_DIMENSION] {
    let mut padded = [0.0; INDEX_DIMENSION];
    for (slot, value) in padded.iter_mut().zip(coords) {
        *slot = *value;
    }
    padded
}

impl ProximityOracle for RTreeOracle<'_> {
    fn cloud_len(&self) -> usize {
        self.cloud.len()
    }

    fn index_len(&self) -> Option<usize> {
        self.index_len
    }

    fn sorted_results(&self) -> bool {
        self.sorted
    }

    #[expect(clippy::float_arithmetic, reason = "widening the tree query radius")]
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
        let origin = self
            .cloud
            .point(query)
            .map(pad)
            .ok_or(OracleError::QueryOutOfBounds { query, len })?;

        let reach = radius * RADIUS_SLACK;
        let mut hits: Vec<(PointId, f32)> = self
            .tree
            .locate_within_distance(origin, reach * reach)
            .filter_map(|hit| {
                self.cloud
                    .distance(query, hit.data)
                    .filter(|distance| *distance <= radius)
                    .map(|distance| (hit.data, distance))
            })
            .collect();
        if self.sorted {
            hits.sort_by(|left, right| nearest_first(query, left, right));
        }
        out.extend(hits);
        Ok(())
    }
}
