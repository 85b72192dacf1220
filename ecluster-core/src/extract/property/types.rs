//! Fixture types for extraction property tests.

use test_strategy::Arbitrary;

use crate::{
    cloud::{DenseCloud, NormalCloud, PointId},
    error::{CloudError, ExtractionError},
    extract::ClusterBounds,
};

/// Spatial arrangement of a generated cloud.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum Layout {
    /// Points scattered uniformly in a cube.
    #[weight(3)]
    Uniform,
    /// Tight blobs around well-separated centres.
    #[weight(3)]
    Blobs,
    /// Points strung along a line with random gaps.
    #[weight(2)]
    Chain,
    /// Few distinct positions repeated many times.
    #[weight(1)]
    Duplicates,
}

/// Generated input for one extraction run.
#[derive(Clone, Debug)]
pub(super) struct ExtractionFixture {
    /// Layout used to generate `rows`.
    pub layout: Layout,
    /// Point coordinates, one row per point.
    pub rows: Vec<Vec<f32>>,
    /// Unit normals parallel to `rows`.
    pub normals: Vec<[f32; 3]>,
    /// Neighbour radius.
    pub tolerance: f32,
    /// Inclusive minimum cluster size.
    pub min_size: usize,
    /// Inclusive maximum cluster size.
    pub max_size: usize,
    /// Optional participating subset, distinct ids in traversal order.
    pub subset: Option<Vec<PointId>>,
}

impl ExtractionFixture {
    pub fn cloud(&self) -> Result<DenseCloud, CloudError> {
        DenseCloud::from_rows(self.rows.clone())
    }

    pub fn normal_cloud(&self) -> NormalCloud {
        NormalCloud::new(self.normals.clone())
    }

    pub fn bounds(&self) -> Result<ClusterBounds, ExtractionError> {
        ClusterBounds::new(self.min_size, self.max_size)
    }

    /// Returns the participating ids in traversal order.
    pub fn participants(&self) -> Vec<PointId> {
        self.subset
            .clone()
            .unwrap_or_else(|| (0..self.rows.len()).collect())
    }
}
