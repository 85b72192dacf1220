//! Proximity oracle abstraction consumed by the cluster growth engine.
//!
//! An oracle answers "which points lie within radius `r` of point `p`". The
//! engine borrows it for the duration of one extraction call and never
//! mutates the structure behind it, so the oracle must outlive the call.

mod linear;
#[cfg(feature = "rtree")]
mod rtree;

pub use self::linear::LinearScanOracle;
#[cfg(feature = "rtree")]
pub use self::rtree::RTreeOracle;

use std::cmp::Ordering;

use crate::{cloud::PointId, error::OracleError};

/// Orders hits by ascending distance, the query point first among ties, then
/// by identifier.
pub(super) fn nearest_first(
    query: PointId,
    left: &(PointId, f32),
    right: &(PointId, f32),
) -> Ordering {
    left.1
        .total_cmp(&right.1)
        .then_with(|| (left.0 != query).cmp(&(right.0 != query)))
        .then_with(|| left.0.cmp(&right.0))
}

/// Reusable output buffer for radius queries.
///
/// Identifiers and distances are stored as parallel sequences so admission
/// predicates can receive the full identifier list as a slice.
///
/// # Examples
/// ```
/// use ecluster_core::NeighbourBuffer;
///
/// let mut buffer = NeighbourBuffer::default();
/// buffer.push(3, 0.5);
/// buffer.push(1, 0.25);
/// assert_eq!(buffer.ids(), &[3, 1]);
/// assert_eq!(buffer.distances(), &[0.5, 0.25]);
/// buffer.clear();
/// assert!(buffer.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighbourBuffer {
    ids: Vec<PointId>,
    distances: Vec<f32>,
}

impl NeighbourBuffer {
    /// Creates a buffer with room for `capacity` neighbours.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            distances: Vec::with_capacity(capacity),
        }
    }

    /// Removes every neighbour while keeping the allocation.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.distances.clear();
    }

    /// Appends a neighbour and its distance from the query.
    pub fn push(&mut self, id: PointId, distance: f32) {
        self.ids.push(id);
        self.distances.push(distance);
    }

    /// Returns the neighbour identifiers in oracle order.
    #[must_use]
    pub fn ids(&self) -> &[PointId] {
        &self.ids
    }

    /// Returns the neighbour distances, parallel to [`Self::ids`].
    #[must_use]
    pub fn distances(&self) -> &[f32] {
        &self.distances
    }

    /// Returns the number of neighbours held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns whether the buffer holds no neighbours.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Extend<(PointId, f32)> for NeighbourBuffer {
    fn extend<T: IntoIterator<Item = (PointId, f32)>>(&mut self, iter: T) {
        for (id, distance) in iter {
            self.push(id, distance);
        }
    }
}

/// Spatial radius-search capability.
///
/// # Examples
/// ```
/// use ecluster_core::{NeighbourBuffer, OracleError, PointId, ProximityOracle};
///
/// struct Line(Vec<f32>);
///
/// impl ProximityOracle for Line {
///     fn cloud_len(&self) -> usize { self.0.len() }
///     fn radius_search(
///         &self,
///         query: PointId,
///         radius: f32,
///         out: &mut NeighbourBuffer,
///     ) -> Result<(), OracleError> {
///         let origin = *self.0.get(query).ok_or(OracleError::QueryOutOfBounds {
///             query,
///             len: self.0.len(),
///         })?;
///         out.clear();
///         for (id, x) in self.0.iter().enumerate() {
///             let distance = (x - origin).abs();
///             if distance <= radius {
///                 out.push(id, distance);
///             }
///         }
///         Ok(())
///     }
/// }
///
/// let oracle = Line(vec![0.0, 1.0, 5.0]);
/// let mut out = NeighbourBuffer::default();
/// oracle.radius_search(0, 1.5, &mut out)?;
/// assert_eq!(out.ids(), &[0, 1]);
/// # Ok::<(), OracleError>(())
/// ```
pub trait ProximityOracle {
    /// Returns the size of the cloud the oracle was built over.
    fn cloud_len(&self) -> usize;

    /// Returns the size of the index subset the oracle was built over, or
    /// `None` when it covers the whole cloud.
    fn index_len(&self) -> Option<usize> {
        None
    }

    /// Returns whether results are ordered nearest first.
    ///
    /// Sorted oracles must report the query point itself as the first result
    /// whenever it lies within the radius.
    fn sorted_results(&self) -> bool {
        false
    }

    /// Writes every point within `radius` of `query` into `out`.
    ///
    /// Implementations must clear `out` before writing. The query point is
    /// normally among the results.
    ///
    /// # Errors
    /// Returns [`OracleError`] when the query cannot be answered; the engine
    /// treats this as a local failure for `query` alone.
    fn radius_search(
        &self,
        query: PointId,
        radius: f32,
        out: &mut NeighbourBuffer,
    ) -> Result<(), OracleError>;
}

impl<O: ProximityOracle + ?Sized> ProximityOracle for &O {
    fn cloud_len(&self) -> usize {
        (**self).cloud_len()
    }

    fn index_len(&self) -> Option<usize> {
        (**self).index_len()
    }

    fn sorted_results(&self) -> bool {
        (**self).sorted_results()
    }

    fn radius_search(
        &self,
        query: PointId,
        radius: f32,
        out: &mut NeighbourBuffer,
    ) -> Result<(), OracleError> {
        (**self).radius_search(query, radius, out)
    }
}
