//! Strategy builders for extraction property tests.
//!
//! Every fixture is derived from a layout and a seed so failures can be
//! replayed through the rstest cases in `tests.rs`.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::types::{ExtractionFixture, Layout};

const MIN_POINTS: usize = 1;
const MAX_POINTS: usize = 72;

/// Generates fixtures across every layout.
pub(super) fn extraction_fixture_strategy() -> impl Strategy<Value = ExtractionFixture> {
    (any::<Layout>(), any::<u64>()).prop_map(|(layout, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_fixture(layout, &mut rng)
    })
}

/// Generates a fixture for a specific layout.
pub(super) fn generate_fixture(layout: Layout, rng: &mut SmallRng) -> ExtractionFixture {
    let count = rng.gen_range(MIN_POINTS..=MAX_POINTS);
    let dimension = rng.gen_range(1..=3);
    let rows = match layout {
        Layout::Uniform => uniform_rows(rng, count, dimension),
        Layout::Blobs => blob_rows(rng, count, dimension),
        Layout::Chain => chain_rows(rng, count, dimension),
        Layout::Duplicates => duplicate_rows(rng, count, dimension),
    };
    let normals = (0..count).map(|_| unit_normal(rng)).collect();
    let tolerance = match rng.gen_range(0..4) {
        0 => 0.0,
        1 => rng.gen_range(0.05..0.5),
        2 => rng.gen_range(0.5..2.0),
        _ => rng.gen_range(2.0..6.0),
    };
    let min_size = rng.gen_range(0..=4);
    let max_size = if rng.gen_bool(0.5) {
        rng.gen_range(min_size..=count.max(min_size) + 2)
    } else {
        usize::MAX
    };
    let subset = rng.gen_bool(0.4).then(|| {
        let mut ids: Vec<usize> = (0..count).collect();
        ids.shuffle(rng);
        let keep = rng.gen_range(0..=count);
        ids.truncate(keep);
        ids
    });

    ExtractionFixture {
        layout,
        rows,
        normals,
        tolerance,
        min_size,
        max_size,
        subset,
    }
}

fn uniform_rows(rng: &mut SmallRng, count: usize, dimension: usize) -> Vec<Vec<f32>> {
    (0..count)
        .map(|_| (0..dimension).map(|_| rng.gen_range(-10.0..10.0)).collect())
        .collect()
}

#[expect(clippy::float_arithmetic, reason = "blob offsets")]
fn blob_rows(rng: &mut SmallRng, count: usize, dimension: usize) -> Vec<Vec<f32>> {
    let blobs = rng.gen_range(1..=5_usize);
    let centres: Vec<Vec<f32>> = (0..blobs)
        .map(|blob| {
            let mut centre = vec![0.0_f32; dimension];
            if let Some(first) = centre.first_mut() {
                *first = 25.0 * blob as f32;
            }
            centre
        })
        .collect();
    (0..count)
        .map(|idx| {
            let centre = &centres[idx % blobs];
            centre
                .iter()
                .map(|coord| coord + rng.gen_range(-1.5..1.5))
                .collect()
        })
        .collect()
}

#[expect(clippy::float_arithmetic, reason = "cumulative gaps")]
fn chain_rows(rng: &mut SmallRng, count: usize, dimension: usize) -> Vec<Vec<f32>> {
    let mut position = 0.0_f32;
    (0..count)
        .map(|_| {
            position += rng.gen_range(0.0..3.0);
            let mut row = vec![0.0_f32; dimension];
            if let Some(first) = row.first_mut() {
                *first = position;
            }
            row
        })
        .collect()
}

fn duplicate_rows(rng: &mut SmallRng, count: usize, dimension: usize) -> Vec<Vec<f32>> {
    let positions = rng.gen_range(1..=4);
    let distinct = uniform_rows(rng, positions, dimension);
    (0..count)
        .map(|_| distinct[rng.gen_range(0..distinct.len())].clone())
        .collect()
}

#[expect(clippy::float_arithmetic, reason = "normalisation")]
fn unit_normal(rng: &mut SmallRng) -> [f32; 3] {
    loop {
        let candidate: [f32; 3] = [
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        ];
        let norm = candidate.iter().map(|c| c * c).sum::<f32>().sqrt();
        if norm > 1e-3 {
            return candidate.map(|c| c / norm);
        }
    }
}
