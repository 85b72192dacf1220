//! Point-cloud containers read by the cluster growth engine.
//!
//! The engine only needs a cloud's length and metadata tag; coordinates and
//! normals are consulted by oracles and admission predicates respectively.

use crate::error::CloudError;

/// Identifier of a point: its position within the cloud.
pub type PointId = usize;

/// Metadata tag copied onto every committed cluster.
///
/// # Examples
/// ```
/// use ecluster_core::CloudHeader;
///
/// let header = CloudHeader::new("lidar").with_stamp(42).with_seq(7);
/// assert_eq!(header.frame_id(), "lidar");
/// assert_eq!(header.stamp(), 42);
/// assert_eq!(header.seq(), 7);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CloudHeader {
    frame_id: String,
    stamp: u64,
    seq: u32,
}

impl CloudHeader {
    /// Creates a header for the given coordinate frame.
    #[must_use]
    pub fn new(frame_id: impl Into<String>) -> Self {
        Self {
            frame_id: frame_id.into(),
            ..Self::default()
        }
    }

    /// Sets the acquisition timestamp.
    #[must_use]
    pub fn with_stamp(mut self, stamp: u64) -> Self {
        self.stamp = stamp;
        self
    }

    /// Sets the sequence number.
    #[must_use]
    pub fn with_seq(mut self, seq: u32) -> Self {
        self.seq = seq;
        self
    }

    /// Returns the coordinate frame identifier.
    #[must_use]
    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    /// Returns the acquisition timestamp.
    #[must_use]
    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    /// Returns the sequence number.
    #[must_use]
    pub fn seq(&self) -> u32 {
        self.seq
    }
}

/// Read-only view of an ordered point cloud.
///
/// # Examples
/// ```
/// use ecluster_core::{CloudHeader, PointCloud};
///
/// struct Line {
///     xs: Vec<f32>,
///     header: CloudHeader,
/// }
///
/// impl PointCloud for Line {
///     fn len(&self) -> usize { self.xs.len() }
///     fn header(&self) -> &CloudHeader { &self.header }
/// }
///
/// let line = Line { xs: vec![0.0, 1.0], header: CloudHeader::new("line") };
/// assert_eq!(line.len(), 2);
/// assert!(!line.is_empty());
/// ```
pub trait PointCloud {
    /// Returns the number of points.
    fn len(&self) -> usize;

    /// Returns whether the cloud holds no points.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the metadata tag stamped onto committed clusters.
    fn header(&self) -> &CloudHeader;
}

/// Dense point cloud backed by a contiguous row-major buffer.
///
/// # Examples
/// ```
/// use ecluster_core::{DenseCloud, PointCloud};
///
/// let cloud = DenseCloud::from_rows(vec![vec![0.0, 0.0], vec![3.0, 4.0]])?;
/// assert_eq!(cloud.len(), 2);
/// assert_eq!(cloud.dimension(), 2);
/// assert_eq!(cloud.point(1), Some(&[3.0, 4.0][..]));
/// # Ok::<(), ecluster_core::CloudError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DenseCloud {
    header: CloudHeader,
    dimension: usize,
    values: Vec<f32>,
}

impl DenseCloud {
    /// Wraps a row-major buffer of `dimension`-wide points.
    ///
    /// # Errors
    /// Returns [`CloudError::ZeroDimension`] when `dimension == 0` and
    /// [`CloudError::RaggedBuffer`] when `values` does not divide evenly.
    pub fn try_new(dimension: usize, values: Vec<f32>) -> Result<Self, CloudError> {
        if dimension == 0 {
            return Err(CloudError::ZeroDimension);
        }
        if values.len() % dimension != 0 {
            return Err(CloudError::RaggedBuffer {
                len: values.len(),
                dimension,
            });
        }
        Ok(Self {
            header: CloudHeader::default(),
            dimension,
            values,
        })
    }

    /// Builds a cloud from per-point rows of equal width.
    ///
    /// An empty row list yields an empty one-dimensional cloud.
    ///
    /// # Errors
    /// Returns [`CloudError::ZeroDimension`] when the first row is empty and
    /// [`CloudError::DimensionMismatch`] when a later row differs in width.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, CloudError> {
        let Some(first) = rows.first() else {
            return Self::try_new(1, Vec::new());
        };
        let dimension = first.len();
        if dimension == 0 {
            return Err(CloudError::ZeroDimension);
        }
        let mut values = Vec::with_capacity(rows.len().saturating_mul(dimension));
        for (row, coords) in rows.into_iter().enumerate() {
            if coords.len() != dimension {
                return Err(CloudError::DimensionMismatch {
                    row,
                    expected: dimension,
                    actual: coords.len(),
                });
            }
            values.extend(coords);
        }
        Self::try_new(dimension, values)
    }

    /// Replaces the metadata tag.
    #[must_use]
    pub fn with_header(mut self, header: CloudHeader) -> Self {
        self.header = header;
        self
    }

    /// Returns the number of coordinates per point.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the row-major coordinate buffer.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Returns the coordinates of `id`, or `None` when out of range.
    #[must_use]
    pub fn point(&self, id: PointId) -> Option<&[f32]> {
        let start = id.checked_mul(self.dimension)?;
        let end = start.checked_add(self.dimension)?;
        self.values.get(start..end)
    }

    /// Returns the Euclidean distance between two points.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "vector arithmetic")]
    pub fn distance(&self, left: PointId, right: PointId) -> Option<f32> {
        let a = self.point(left)?;
        let b = self.point(right)?;
        let sum = a
            .iter()
            .zip(b)
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum::<f32>();
        Some(sum.sqrt())
    }
}

impl PointCloud for DenseCloud {
    fn len(&self) -> usize {
        self.values.len() / self.dimension
    }

    fn header(&self) -> &CloudHeader {
        &self.header
    }
}

/// Per-point unit normals, parallel to a point cloud.
///
/// # Examples
/// ```
/// use ecluster_core::NormalCloud;
///
/// let normals = NormalCloud::new(vec![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]);
/// assert_eq!(normals.len(), 2);
/// assert_eq!(normals.normal(1), Some(&[1.0, 0.0, 0.0]));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalCloud {
    normals: Vec<[f32; 3]>,
}

impl NormalCloud {
    /// Wraps already-normalised vectors.
    #[must_use]
    pub fn new(normals: Vec<[f32; 3]>) -> Self {
        Self { normals }
    }

    /// Builds normals from a flat `nx, ny, nz, ...` buffer.
    ///
    /// # Errors
    /// Returns [`CloudError::RaggedBuffer`] when the buffer length is not a
    /// multiple of three.
    pub fn try_from_flat(values: &[f32]) -> Result<Self, CloudError> {
        let chunks = values.chunks_exact(3);
        if !chunks.remainder().is_empty() {
            return Err(CloudError::RaggedBuffer {
                len: values.len(),
                dimension: 3,
            });
        }
        let normals = chunks
            .map(|chunk| {
                let mut normal = [0.0_f32; 3];
                normal.copy_from_slice(chunk);
                normal
            })
            .collect();
        Ok(Self { normals })
    }

    /// Returns the number of normals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.normals.len()
    }

    /// Returns whether no normals are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }

    /// Returns the normal of `id`, or `None` when out of range.
    #[must_use]
    pub fn normal(&self, id: PointId) -> Option<&[f32; 3]> {
        self.normals.get(id)
    }

    /// Returns the stored normals.
    #[must_use]
    pub fn as_slice(&self) -> &[[f32; 3]] {
        &self.normals
    }

    /// Largest deviation from length one at which a normal still counts as
    /// unit.
    pub const UNIT_TOLERANCE: f32 = 1.0e-3;

    /// Returns the identifiers of normals that are not unit length, within
    /// [`Self::UNIT_TOLERANCE`]. Zero and non-finite normals are included.
    ///
    /// # Examples
    /// ```
    /// use ecluster_core::NormalCloud;
    ///
    /// let normals = NormalCloud::new(vec![[0.0, 0.0, 1.0], [0.0, 0.0, 0.0], [0.0, 2.0, 0.0]]);
    /// assert_eq!(normals.non_unit_ids(), vec![1, 2]);
    /// ```
    #[must_use]
    pub fn non_unit_ids(&self) -> Vec<PointId> {
        self.normals
            .iter()
            .enumerate()
            .filter(|(_, normal)| !is_unit(normal))
            .map(|(id, _)| id)
            .collect()
    }
}

#[expect(clippy::float_arithmetic, reason = "vector length")]
fn is_unit(normal: &[f32; 3]) -> bool {
    let length = normal.iter().map(|c| c * c).sum::<f32>().sqrt();
    (length - 1.0).abs() <= NormalCloud::UNIT_TOLERANCE
}
