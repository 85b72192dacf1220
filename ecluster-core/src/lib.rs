//! ecluster core library.
//!
//! Euclidean cluster extraction: partitions a point cloud into connected
//! components of its radius-`tolerance` neighbour graph, with optional
//! admission predicates (such as normal-angle gating) and cluster size bounds.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod cloud;
mod error;
mod extract;
mod oracle;
mod predicate;
mod result;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{ClusterExtraction, ClusterExtractionBuilder},
    cloud::{CloudHeader, DenseCloud, NormalCloud, PointCloud, PointId},
    error::{
        CloudError, CloudErrorCode, ExtractionError, ExtractionErrorCode, OracleError,
        OracleErrorCode, Result,
    },
    extract::{ClusterBounds, extract_clusters, extract_clusters_with_normals},
    oracle::{LinearScanOracle, NeighbourBuffer, ProximityOracle},
    predicate::{AcceptAll, AdmissionPredicate, NormalDeviation},
    result::{Extraction, ExtractionStats, PointCluster, sort_clusters_by_size},
};

#[cfg(feature = "rtree")]
#[cfg_attr(docsrs, doc(cfg(feature = "rtree")))]
pub use crate::oracle::RTreeOracle;
