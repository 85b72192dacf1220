//! Deterministic point layouts with known cluster structure.
//!
//! Rows are plain coordinate vectors so any crate can wrap them in its own
//! cloud type.

/// Places one point per coordinate on the x axis.
///
/// # Examples
/// ```
/// use ecluster_test_support::scenes::collinear;
///
/// assert_eq!(collinear(&[0.0, 2.5]), vec![vec![0.0], vec![2.5]]);
/// ```
#[must_use]
pub fn collinear(xs: &[f32]) -> Vec<Vec<f32>> {
    xs.iter().map(|&x| vec![x]).collect()
}

/// Builds `blobs` cubic lattices of `side³` points in three dimensions.
///
/// Neighbouring lattice points are `spacing` apart and consecutive blobs are
/// separated along x by `gap` between their facing edges. Points are emitted
/// blob by blob, so blob `b` occupies rows `b * side³ .. (b + 1) * side³`.
///
/// # Examples
/// ```
/// use ecluster_test_support::scenes::lattice_blobs;
///
/// let rows = lattice_blobs(2, 2, 1.0, 10.0);
/// assert_eq!(rows.len(), 16);
/// assert_eq!(rows[8], vec![11.0, 0.0, 0.0]);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "lattice coordinates")]
pub fn lattice_blobs(blobs: usize, side: usize, spacing: f32, gap: f32) -> Vec<Vec<f32>> {
    let step = |n: usize| spacing * n as f32;
    let width = step(side.saturating_sub(1));
    let mut rows = Vec::with_capacity(blobs * side * side * side);
    for blob in 0..blobs {
        let origin = (width + gap) * blob as f32;
        for x in 0..side {
            for y in 0..side {
                for z in 0..side {
                    rows.push(vec![origin + step(x), step(y), step(z)]);
                }
            }
        }
    }
    rows
}
