//! Shared test utilities for `ecluster-core`.

use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
};

use ecluster_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{
    cloud::PointId,
    error::OracleError,
    oracle::{NeighbourBuffer, ProximityOracle},
};

/// Builds a standard proptest configuration from the shared CI profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Wraps an oracle, recording every query it answers.
pub(crate) struct CountingOracle<O> {
    inner: O,
    queries: RefCell<Vec<PointId>>,
}

impl<O: ProximityOracle> CountingOracle<O> {
    pub(crate) fn new(inner: O) -> Self {
        Self {
            inner,
            queries: RefCell::new(Vec::new()),
        }
    }

    /// Returns the queried points in call order.
    pub(crate) fn queries(&self) -> Vec<PointId> {
        self.queries.borrow().clone()
    }
}

impl<O: ProximityOracle> ProximityOracle for CountingOracle<O> {
    fn cloud_len(&self) -> usize {
        self.inner.cloud_len()
    }

    fn index_len(&self) -> Option<usize> {
        self.inner.index_len()
    }

    fn sorted_results(&self) -> bool {
        self.inner.sorted_results()
    }

    fn radius_search(
        &self,
        query: PointId,
        radius: f32,
        out: &mut NeighbourBuffer,
    ) -> Result<(), OracleError> {
        self.queries.borrow_mut().push(query);
        self.inner.radius_search(query, radius, out)
    }
}

/// Wraps an oracle, failing queries for a fixed set of points.
pub(crate) struct FailingOracle<O> {
    inner: O,
    failing: BTreeSet<PointId>,
}

impl<O: ProximityOracle> FailingOracle<O> {
    pub(crate) fn new(inner: O, failing: impl IntoIterator<Item = PointId>) -> Self {
        Self {
            inner,
            failing: failing.into_iter().collect(),
        }
    }
}

impl<O: ProximityOracle> ProximityOracle for FailingOracle<O> {
    fn cloud_len(&self) -> usize {
        self.inner.cloud_len()
    }

    fn index_len(&self) -> Option<usize> {
        self.inner.index_len()
    }

    fn sorted_results(&self) -> bool {
        self.inner.sorted_results()
    }

    fn radius_search(
        &self,
        query: PointId,
        radius: f32,
        out: &mut NeighbourBuffer,
    ) -> Result<(), OracleError> {
        if self.failing.contains(&query) {
            out.clear();
            return Err(OracleError::MissingInput);
        }
        self.inner.radius_search(query, radius, out)
    }
}

/// Oracle answering from a fixed neighbour table, ignoring the radius.
pub(crate) struct ScriptedOracle {
    cloud_len: usize,
    sorted: bool,
    table: BTreeMap<PointId, Vec<PointId>>,
}

impl ScriptedOracle {
    pub(crate) fn new(cloud_len: usize) -> Self {
        Self {
            cloud_len,
            sorted: false,
            table: BTreeMap::new(),
        }
    }

    pub(crate) fn sorted(mut self) -> Self {
        self.sorted = true;
        self
    }

    pub(crate) fn with(mut self, query: PointId, neighbours: Vec<PointId>) -> Self {
        self.table.insert(query, neighbours);
        self
    }
}

impl ProximityOracle for ScriptedOracle {
    fn cloud_len(&self) -> usize {
        self.cloud_len
    }

    fn sorted_results(&self) -> bool {
        self.sorted
    }

    fn radius_search(
        &self,
        query: PointId,
        _radius: f32,
        out: &mut NeighbourBuffer,
    ) -> Result<(), OracleError> {
        out.clear();
        let neighbours = self.table.get(&query).map_or(&[][..], Vec::as_slice);
        out.extend(neighbours.iter().map(|&id| (id, 0.0)));
        Ok(())
    }
}
