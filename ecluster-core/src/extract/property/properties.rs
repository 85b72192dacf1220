//! Property runners shared by the proptest and rstest entry points.

use std::collections::HashSet;

use proptest::{
    prop_assert, prop_assert_eq,
    test_runner::{TestCaseError, TestCaseResult},
};

use super::{
    reference::{reference_components, sorted_memberships},
    types::ExtractionFixture,
};
#[cfg(feature = "rtree")]
use crate::RTreeOracle;
use crate::{
    AcceptAll, DenseCloud, LinearScanOracle, NormalCloud, PointId, ProximityOracle,
    extract::{extract_clusters, extract_clusters_with_normals},
    result::Extraction,
};

fn extract_plain<O: ProximityOracle>(
    fixture: &ExtractionFixture,
    cloud: &DenseCloud,
    oracle: &O,
) -> Result<Extraction, String> {
    let bounds = fixture.bounds().map_err(|err| err.to_string())?;
    extract_clusters(
        cloud,
        fixture.subset.as_deref(),
        &AcceptAll,
        oracle,
        fixture.tolerance,
        bounds,
    )
    .map_err(|err| err.to_string())
}

fn run_plain(fixture: &ExtractionFixture, sorted: bool) -> Result<Extraction, String> {
    let cloud = fixture.cloud().map_err(|err| err.to_string())?;
    let oracle = LinearScanOracle::new(&cloud).with_sorted_results(sorted);
    let oracle = match fixture.subset.as_deref() {
        Some(subset) => oracle.with_indices(subset),
        None => oracle,
    };
    extract_plain(fixture, &cloud, &oracle)
}

#[cfg(feature = "rtree")]
fn run_indexed(fixture: &ExtractionFixture, sorted: bool) -> Result<Extraction, String> {
    let cloud = fixture.cloud().map_err(|err| err.to_string())?;
    let oracle = match fixture.subset.as_deref() {
        Some(subset) => RTreeOracle::with_indices(&cloud, subset),
        None => RTreeOracle::new(&cloud),
    }
    .map_err(|err| err.to_string())?
    .with_sorted_results(sorted);
    extract_plain(fixture, &cloud, &oracle)
}

fn run_with_normals(
    fixture: &ExtractionFixture,
    cloud: &DenseCloud,
    normals: &NormalCloud,
    max_angle: f64,
) -> Result<Extraction, String> {
    let bounds = fixture.bounds().map_err(|err| err.to_string())?;
    let oracle = LinearScanOracle::new(cloud);
    let oracle = match fixture.subset.as_deref() {
        Some(subset) => oracle.with_indices(subset),
        None => oracle,
    };
    extract_clusters_with_normals(
        cloud,
        normals,
        fixture.subset.as_deref(),
        &oracle,
        fixture.tolerance,
        max_angle,
        bounds,
    )
    .map_err(|err| err.to_string())
}

/// Committed clusters are disjoint, drawn from the participants, and within
/// the size bounds; every participant is visited exactly once.
pub(super) fn run_partition_property(fixture: &ExtractionFixture) -> TestCaseResult {
    let extraction = run_plain(fixture, false).map_err(TestCaseError::fail)?;
    let participants: HashSet<PointId> = fixture.participants().into_iter().collect();

    let mut seen = HashSet::new();
    for cluster in extraction.clusters() {
        prop_assert!(cluster.len() >= fixture.min_size);
        prop_assert!(cluster.len() <= fixture.max_size);
        for &id in cluster.indices() {
            prop_assert!(participants.contains(&id), "{id} is not a participant");
            prop_assert!(seen.insert(id), "{id} claimed twice");
        }
    }

    let stats = extraction.stats();
    prop_assert_eq!(stats.visited, participants.len());
    prop_assert_eq!(stats.oracle_queries, participants.len());
    prop_assert_eq!(stats.seeds, stats.committed + stats.discarded);
    prop_assert_eq!(stats.committed, extraction.clusters().len());
    prop_assert_eq!(stats.failed_queries, 0);
    prop_assert_eq!(stats.rejected_neighbours, 0);
    Ok(())
}

/// Without a predicate, clusters equal the bounded radius-graph components
/// in seed order.
pub(super) fn run_reference_equivalence_property(fixture: &ExtractionFixture) -> TestCaseResult {
    let extraction = run_plain(fixture, false).map_err(TestCaseError::fail)?;
    let cloud = fixture
        .cloud()
        .map_err(|err| TestCaseError::fail(err.to_string()))?;

    let expected: Vec<Vec<PointId>> =
        reference_components(&cloud, &fixture.participants(), fixture.tolerance)
            .into_iter()
            .filter(|component| {
                (fixture.min_size..=fixture.max_size).contains(&component.len())
            })
            .collect();
    prop_assert_eq!(sorted_memberships(&extraction), expected);
    Ok(())
}

/// Sorted and unsorted oracles yield the same clusters.
pub(super) fn run_oracle_order_property(fixture: &ExtractionFixture) -> TestCaseResult {
    let unsorted = run_plain(fixture, false).map_err(TestCaseError::fail)?;
    let sorted = run_plain(fixture, true).map_err(TestCaseError::fail)?;
    prop_assert_eq!(sorted_memberships(&unsorted), sorted_memberships(&sorted));
    prop_assert_eq!(unsorted.stats(), sorted.stats());
    Ok(())
}

/// The R*-tree oracle yields the same clusters as the linear scan. With
/// nearest-first results both traversals are identical, so the member order
/// matches too.
#[cfg(feature = "rtree")]
pub(super) fn run_indexed_oracle_property(fixture: &ExtractionFixture) -> TestCaseResult {
    let linear_sorted = run_plain(fixture, true).map_err(TestCaseError::fail)?;
    let indexed_sorted = run_indexed(fixture, true).map_err(TestCaseError::fail)?;
    prop_assert_eq!(indexed_sorted.clusters(), linear_sorted.clusters());
    prop_assert_eq!(indexed_sorted.stats(), linear_sorted.stats());

    let linear = run_plain(fixture, false).map_err(TestCaseError::fail)?;
    let indexed = run_indexed(fixture, false).map_err(TestCaseError::fail)?;
    prop_assert_eq!(sorted_memberships(&indexed), sorted_memberships(&linear));
    prop_assert_eq!(indexed.stats(), linear.stats());
    Ok(())
}

/// Flipping the orientation of any normals leaves the clusters unchanged.
pub(super) fn run_normal_flip_property(fixture: &ExtractionFixture) -> TestCaseResult {
    let cloud = fixture
        .cloud()
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    let normals = fixture.normal_cloud();
    let flipped = NormalCloud::new(
        fixture
            .normals
            .iter()
            .enumerate()
            .map(|(idx, normal)| if idx % 2 == 0 { normal.map(|c| -c) } else { *normal })
            .collect(),
    );

    for max_angle in [0.3, 1.0, -1.2] {
        let original = run_with_normals(fixture, &cloud, &normals, max_angle)
            .map_err(TestCaseError::fail)?;
        let mirrored = run_with_normals(fixture, &cloud, &flipped, max_angle)
            .map_err(TestCaseError::fail)?;
        prop_assert_eq!(original.clusters(), mirrored.clusters());
    }
    Ok(())
}

/// Normal gating only splits clusters: every gated cluster lies within one
/// ungated component.
pub(super) fn run_gating_refines_property(fixture: &ExtractionFixture) -> TestCaseResult {
    let cloud = fixture
        .cloud()
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    let components = reference_components(&cloud, &fixture.participants(), fixture.tolerance);
    let gated = run_with_normals(fixture, &cloud, &fixture.normal_cloud(), 1.0)
        .map_err(TestCaseError::fail)?;

    for cluster in gated.clusters() {
        let Some(first) = cluster.indices().first() else {
            continue;
        };
        let home = components
            .iter()
            .find(|component| component.contains(first));
        prop_assert!(home.is_some(), "seed {first} belongs to no component");
        if let Some(home) = home {
            prop_assert!(cluster.indices().iter().all(|id| home.contains(id)));
        }
    }
    Ok(())
}
