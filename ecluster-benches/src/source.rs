//! Synthetic point clouds for benchmarking.
//!
//! Provides [`SyntheticCloud`]: box-shaped blobs scattered through a cube,
//! with a random unit normal per point. Generation is seeded so every
//! benchmark run measures the same cloud.

use ecluster_core::{CloudError, CloudHeader, DenseCloud, NormalCloud};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Side length of the cube blob centres are drawn from.
const SCENE_EXTENT: f32 = 100.0;

/// Errors that may occur during synthetic cloud generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The requested point count was zero.
    #[error("point count must be greater than zero")]
    ZeroPoints,
    /// The requested blob count was zero.
    #[error("blob count must be greater than zero")]
    ZeroBlobs,
    /// The requested dimension count was zero.
    #[error("dimension count must be greater than zero")]
    ZeroDimensions,
    /// The blob half-width was negative or not finite.
    #[error("blob spread must be finite and non-negative")]
    InvalidSpread,
    /// The generated buffer could not be wrapped as a cloud.
    #[error("cloud assembly failed: {0}")]
    Cloud(#[from] CloudError),
}

/// Configuration for synthetic blob generation.
#[derive(Clone, Debug)]
pub struct BlobCloudConfig {
    /// Number of points to generate.
    pub point_count: usize,
    /// Number of blobs the points are dealt across.
    pub blobs: usize,
    /// Dimensionality of each point.
    pub dimensions: usize,
    /// Half-width of the box each blob's points are drawn from.
    pub spread: f32,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Seeded blob cloud with one unit normal per point.
///
/// # Examples
///
/// ```
/// use ecluster_benches::source::{BlobCloudConfig, SyntheticCloud};
/// use ecluster_core::PointCloud;
///
/// let config = BlobCloudConfig {
///     point_count: 12,
///     blobs: 3,
///     dimensions: 3,
///     spread: 0.5,
///     seed: 7,
/// };
/// let synthetic = SyntheticCloud::generate(&config).expect("valid config");
/// assert_eq!(synthetic.cloud().len(), 12);
/// assert_eq!(synthetic.normals().len(), 12);
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticCloud {
    cloud: DenseCloud,
    normals: NormalCloud,
}

impl SyntheticCloud {
    /// Generates the cloud eagerly from `config`.
    ///
    /// Points are dealt to blobs round-robin, so blob sizes differ by at most
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`SyntheticError`] when a count is zero or the spread is
    /// invalid.
    pub fn generate(config: &BlobCloudConfig) -> Result<Self, SyntheticError> {
        validate(config)?;
        let mut rng = SmallRng::seed_from_u64(config.seed);

        let centres: Vec<Vec<f32>> = (0..config.blobs)
            .map(|_| {
                (0..config.dimensions)
                    .map(|_| rng.gen_range(0.0..SCENE_EXTENT))
                    .collect()
            })
            .collect();

        let mut values = Vec::with_capacity(config.point_count.saturating_mul(config.dimensions));
        for centre in centres.iter().cycle().take(config.point_count) {
            values.extend(jitter(centre, config.spread, &mut rng));
        }
        let normals = (0..config.point_count)
            .map(|_| unit_normal(&mut rng))
            .collect();

        let cloud = DenseCloud::try_new(config.dimensions, values)?
            .with_header(CloudHeader::new("synthetic").with_seq(1));
        Ok(Self {
            cloud,
            normals: NormalCloud::new(normals),
        })
    }

    /// Returns the generated points.
    #[must_use]
    pub const fn cloud(&self) -> &DenseCloud {
        &self.cloud
    }

    /// Returns the generated normals, parallel to [`Self::cloud`].
    #[must_use]
    pub const fn normals(&self) -> &NormalCloud {
        &self.normals
    }
}

fn validate(config: &BlobCloudConfig) -> Result<(), SyntheticError> {
    if config.point_count == 0 {
        return Err(SyntheticError::ZeroPoints);
    }
    if config.blobs == 0 {
        return Err(SyntheticError::ZeroBlobs);
    }
    if config.dimensions == 0 {
        return Err(SyntheticError::ZeroDimensions);
    }
    if !config.spread.is_finite() || config.spread < 0.0 {
        return Err(SyntheticError::InvalidSpread);
    }
    Ok(())
}

#[expect(
    clippy::float_arithmetic,
    reason = "offsets are added to blob centres"
)]
fn jitter<'a>(
    centre: &'a [f32],
    spread: f32,
    rng: &'a mut SmallRng,
) -> impl Iterator<Item = f32> + 'a {
    centre
        .iter()
        .map(move |axis| axis + rng.gen_range(-spread..=spread))
}

#[expect(
    clippy::float_arithmetic,
    reason = "normalising a random direction"
)]
fn unit_normal(rng: &mut SmallRng) -> [f32; 3] {
    loop {
        let candidate: [f32; 3] = [
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        ];
        let norm = candidate.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 1e-3 {
            return candidate.map(|v| v / norm);
        }
    }
}
