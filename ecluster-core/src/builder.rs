//! Builder utilities for configuring cluster extraction.
//!
//! Validates the tolerance and size bounds once so that a
//! [`ClusterExtraction`] can be reused across many clouds and oracles.

use tracing::warn;

use crate::{
    Result,
    cloud::{NormalCloud, PointCloud, PointId},
    error::ExtractionError,
    extract::{ClusterBounds, extract_clusters, extract_clusters_with_normals},
    oracle::ProximityOracle,
    predicate::{AcceptAll, AdmissionPredicate},
    result::Extraction,
};

/// Configures and constructs [`ClusterExtraction`] instances.
///
/// # Examples
/// ```
/// use ecluster_core::ClusterExtractionBuilder;
///
/// let extraction = ClusterExtractionBuilder::new()
///     .with_tolerance(0.02)
///     .with_min_cluster_size(100)
///     .with_max_cluster_size(25_000)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(extraction.min_cluster_size(), 100);
/// assert_eq!(extraction.max_cluster_size(), 25_000);
/// ```
#[derive(Debug, Clone)]
pub struct ClusterExtractionBuilder {
    tolerance: f32,
    min_cluster_size: usize,
    max_cluster_size: usize,
}

impl Default for ClusterExtractionBuilder {
    fn default() -> Self {
        let bounds = ClusterBounds::default();
        Self {
            tolerance: 0.0,
            min_cluster_size: bounds.min(),
            max_cluster_size: bounds.max(),
        }
    }
}

impl ClusterExtractionBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use ecluster_core::{ClusterBounds, ClusterExtractionBuilder};
    ///
    /// let builder = ClusterExtractionBuilder::new();
    /// assert_eq!(builder.tolerance(), 0.0);
    /// assert_eq!(builder.min_cluster_size(), 1);
    /// assert_eq!(builder.max_cluster_size(), ClusterBounds::DEFAULT_MAX);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the neighbour search radius, in cloud units.
    ///
    /// # Examples
    /// ```
    /// use ecluster_core::ClusterExtractionBuilder;
    ///
    /// let builder = ClusterExtractionBuilder::new().with_tolerance(0.5);
    /// assert_eq!(builder.tolerance(), 0.5);
    /// ```
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns the configured search radius.
    #[must_use]
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Overrides the minimum cluster size.
    ///
    /// # Examples
    /// ```
    /// use ecluster_core::ClusterExtractionBuilder;
    ///
    /// let builder = ClusterExtractionBuilder::new().with_min_cluster_size(10);
    /// assert_eq!(builder.min_cluster_size(), 10);
    /// ```
    #[must_use]
    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = size;
        self
    }

    /// Returns the configured minimum cluster size.
    #[must_use]
    pub fn min_cluster_size(&self) -> usize {
        self.min_cluster_size
    }

    /// Overrides the maximum cluster size.
    ///
    /// # Examples
    /// ```
    /// use ecluster_core::ClusterExtractionBuilder;
    ///
    /// let builder = ClusterExtractionBuilder::new().with_max_cluster_size(64);
    /// assert_eq!(builder.max_cluster_size(), 64);
    /// ```
    #[must_use]
    pub fn with_max_cluster_size(mut self, size: usize) -> Self {
        self.max_cluster_size = size;
        self
    }

    /// Returns the configured maximum cluster size.
    #[must_use]
    pub fn max_cluster_size(&self) -> usize {
        self.max_cluster_size
    }

    /// Validates the configuration and constructs a [`ClusterExtraction`].
    ///
    /// # Errors
    /// Returns [`ExtractionError::InvalidTolerance`] when the tolerance is
    /// negative or not finite, and [`ExtractionError::InvalidClusterBounds`]
    /// when the minimum size exceeds the maximum.
    ///
    /// # Examples
    /// ```
    /// use ecluster_core::{ClusterExtractionBuilder, ExtractionErrorCode};
    ///
    /// let err = ClusterExtractionBuilder::new()
    ///     .with_min_cluster_size(9)
    ///     .with_max_cluster_size(3)
    ///     .build()
    ///     .expect_err("inverted bounds must be rejected");
    /// assert_eq!(err.code(), ExtractionErrorCode::InvalidClusterBounds);
    /// ```
    pub fn build(self) -> Result<ClusterExtraction> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            warn!(tolerance = self.tolerance, "rejecting cluster tolerance");
            return Err(ExtractionError::InvalidTolerance {
                got: self.tolerance,
            });
        }
        let bounds = ClusterBounds::new(self.min_cluster_size, self.max_cluster_size)?;
        Ok(ClusterExtraction {
            tolerance: self.tolerance,
            bounds,
        })
    }
}

/// Validated extraction parameters.
///
/// # Examples
/// ```
/// use ecluster_core::{ClusterExtractionBuilder, DenseCloud, LinearScanOracle};
///
/// let cloud = DenseCloud::from_rows(vec![vec![0.0], vec![0.5], vec![4.0]])?;
/// let oracle = LinearScanOracle::new(&cloud);
/// let extraction = ClusterExtractionBuilder::new()
///     .with_tolerance(1.0)
///     .with_min_cluster_size(2)
///     .build()?
///     .extract(&cloud, &oracle)?;
/// assert_eq!(extraction.clusters().len(), 1);
/// assert_eq!(extraction.clusters()[0].indices(), &[0, 1]);
/// assert_eq!(extraction.stats().discarded, 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterExtraction {
    tolerance: f32,
    bounds: ClusterBounds,
}

impl ClusterExtraction {
    /// Returns the neighbour search radius.
    #[must_use]
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Returns the minimum committed cluster size.
    #[must_use]
    pub fn min_cluster_size(&self) -> usize {
        self.bounds.min()
    }

    /// Returns the maximum committed cluster size.
    #[must_use]
    pub fn max_cluster_size(&self) -> usize {
        self.bounds.max()
    }

    /// Returns the validated size bounds.
    #[must_use]
    pub fn bounds(&self) -> ClusterBounds {
        self.bounds
    }

    /// Clusters every point of `cloud` by distance alone.
    ///
    /// # Errors
    /// See [`extract_clusters`].
    pub fn extract<C, O>(&self, cloud: &C, oracle: &O) -> Result<Extraction>
    where
        C: PointCloud + ?Sized,
        O: ProximityOracle + ?Sized,
    {
        self.extract_with(cloud, None, &AcceptAll, oracle)
    }

    /// Clusters only the points named by `indices`, in that order.
    ///
    /// # Errors
    /// See [`extract_clusters`].
    pub fn extract_indexed<C, O>(
        &self,
        cloud: &C,
        indices: &[PointId],
        oracle: &O,
    ) -> Result<Extraction>
    where
        C: PointCloud + ?Sized,
        O: ProximityOracle + ?Sized,
    {
        self.extract_with(cloud, Some(indices), &AcceptAll, oracle)
    }

    /// Clusters with a caller-supplied admission predicate.
    ///
    /// # Errors
    /// See [`extract_clusters`].
    pub fn extract_with<C, P, O>(
        &self,
        cloud: &C,
        indices: Option<&[PointId]>,
        predicate: &P,
        oracle: &O,
    ) -> Result<Extraction>
    where
        C: PointCloud + ?Sized,
        P: AdmissionPredicate<C> + ?Sized,
        O: ProximityOracle + ?Sized,
    {
        extract_clusters(cloud, indices, predicate, oracle, self.tolerance, self.bounds)
    }

    /// Clusters with normal-angle gating; `max_angle` is in radians.
    ///
    /// # Errors
    /// See [`extract_clusters_with_normals`].
    pub fn extract_with_normals<C, O>(
        &self,
        cloud: &C,
        normals: &NormalCloud,
        indices: Option<&[PointId]>,
        oracle: &O,
        max_angle: f64,
    ) -> Result<Extraction>
    where
        C: PointCloud + ?Sized,
        O: ProximityOracle + ?Sized,
    {
        extract_clusters_with_normals(
            cloud,
            normals,
            indices,
            oracle,
            self.tolerance,
            max_angle,
            self.bounds,
        )
    }
}
