//! Admission predicates gating cluster growth beyond pure distance.
//!
//! The engine only consults a predicate for neighbours that are not yet
//! visited; a predicate therefore never needs to track membership itself.

use std::f64::consts::PI;

use crate::cloud::{NormalCloud, PointId};

/// Caller-supplied acceptance test for a candidate neighbour.
///
/// `seed` is the point that opened the growing cluster, `neighbours` is the
/// full identifier list returned by the oracle, and `position` indexes the
/// candidate within that list. Implementations must be free of side effects
/// and independent of traversal order.
///
/// Any closure with the matching signature is a predicate:
///
/// ```
/// use ecluster_core::{AdmissionPredicate, DenseCloud, PointId};
///
/// let even_only = |_: &DenseCloud, _: PointId, ids: &[PointId], pos: usize| {
///     ids.get(pos).is_some_and(|id| id % 2 == 0)
/// };
/// let cloud = DenseCloud::from_rows(vec![vec![0.0]])?;
/// assert!(even_only.admit(&cloud, 0, &[3, 4], 1));
/// assert!(!even_only.admit(&cloud, 0, &[3, 4], 0));
/// # Ok::<(), ecluster_core::CloudError>(())
/// ```
pub trait AdmissionPredicate<C: ?Sized> {
    /// Returns whether `neighbours[position]` may join the cluster seeded by
    /// `seed`.
    fn admit(&self, cloud: &C, seed: PointId, neighbours: &[PointId], position: usize) -> bool;
}

impl<C, F> AdmissionPredicate<C> for F
where
    C: ?Sized,
    F: Fn(&C, PointId, &[PointId], usize) -> bool,
{
    fn admit(&self, cloud: &C, seed: PointId, neighbours: &[PointId], position: usize) -> bool {
        self(cloud, seed, neighbours, position)
    }
}

/// Predicate accepting every unvisited neighbour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AcceptAll;

impl<C: ?Sized> AdmissionPredicate<C> for AcceptAll {
    fn admit(&self, _: &C, _: PointId, _: &[PointId], _: usize) -> bool {
        true
    }
}

/// Angle-aware predicate comparing the seed's normal with the candidate's.
///
/// The configured angle is made absolute and clamped to `[0, π]` before its
/// cosine is taken once. A candidate is admitted when
/// `|dot(n_seed, n_candidate)| < cos(max_angle)`, which is unaffected by the
/// sign of either normal. Candidates without a stored normal are rejected.
///
/// # Examples
/// ```
/// use std::f64::consts::FRAC_PI_4;
///
/// use ecluster_core::{AdmissionPredicate, DenseCloud, NormalCloud, NormalDeviation};
///
/// let cloud = DenseCloud::from_rows(vec![vec![0.0], vec![1.0], vec![2.0]])?;
/// let normals = NormalCloud::new(vec![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]]);
/// let predicate = NormalDeviation::new(&normals, FRAC_PI_4);
/// assert!(predicate.admit(&cloud, 0, &[0, 1, 2], 1));
/// assert!(!predicate.admit(&cloud, 0, &[0, 1, 2], 2));
/// # Ok::<(), ecluster_core::CloudError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct NormalDeviation<'a> {
    normals: &'a NormalCloud,
    cos_threshold: f64,
}

impl<'a> NormalDeviation<'a> {
    /// Creates the predicate for `max_angle` radians.
    #[must_use]
    pub fn new(normals: &'a NormalCloud, max_angle: f64) -> Self {
        let clamped = max_angle.abs().min(PI);
        Self {
            normals,
            cos_threshold: clamped.cos(),
        }
    }

    /// Returns the precomputed cosine threshold.
    #[must_use]
    pub fn cos_threshold(&self) -> f64 {
        self.cos_threshold
    }
}

#[expect(clippy::float_arithmetic, reason = "dot product")]
fn dot(left: &[f32; 3], right: &[f32; 3]) -> f64 {
    left.iter()
        .zip(right)
        .map(|(l, r)| f64::from(*l) * f64::from(*r))
        .sum()
}

impl<C: ?Sized> AdmissionPredicate<C> for NormalDeviation<'_> {
    fn admit(&self, _: &C, seed: PointId, neighbours: &[PointId], position: usize) -> bool {
        let Some(seed_normal) = self.normals.normal(seed) else {
            return false;
        };
        let Some(candidate_normal) = neighbours
            .get(position)
            .and_then(|&id| self.normals.normal(id))
        else {
            return false;
        };
        dot(seed_normal, candidate_normal).abs() < self.cos_threshold
    }
}
