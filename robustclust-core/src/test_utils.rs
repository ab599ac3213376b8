//! Shared test utilities for `robustclust-core`.

use std::cell::Cell;
use std::hash::Hash;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use proptest::test_runner::Config as ProptestConfig;
use robustclust_test_support::profile::PropertyProfile;

use crate::{
    datasource::DataSource,
    error::DataSourceError,
    oracle::{LabelOracle, Oracle},
    pairwise::PairwiseDistances,
};

/// Builds a proptest configuration from the shared run profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = PropertyProfile::load(default_cases);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// One-dimensional [`DataSource`] that counts distance invocations.
#[derive(Clone)]
pub(crate) struct CountingSource {
    data: Vec<f32>,
    calls: Arc<AtomicUsize>,
}

impl CountingSource {
    #[must_use]
    pub(crate) fn new(data: Vec<f32>, calls: Arc<AtomicUsize>) -> Self {
        Self { data, calls }
    }

    /// Returns the backing distance counter for assertions.
    pub(crate) fn calls(&self) -> &Arc<AtomicUsize> {
        &self.calls
    }
}

impl DataSource for CountingSource {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn name(&self) -> &str {
        "counting"
    }

    fn distance(&self, left: usize, right: usize) -> Result<f32, DataSourceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let a = self
            .data
            .get(left)
            .ok_or(DataSourceError::OutOfBounds { index: left })?;
        let b = self
            .data
            .get(right)
            .ok_or(DataSourceError::OutOfBounds { index: right })?;
        Ok((a - b).abs())
    }
}

/// Pairwise distances between points on a line.
pub(crate) fn line_distances(values: &[f32]) -> PairwiseDistances {
    let source = CountingSource::new(values.to_vec(), Arc::new(AtomicUsize::new(0)));
    PairwiseDistances::from_source(&source).expect("line distances are finite")
}

/// Label-backed oracle that counts the questions it answers.
pub(crate) struct CountingOracle<'a, L> {
    inner: LabelOracle<'a, L>,
    calls: Cell<usize>,
}

impl<'a, L: Eq + Hash> CountingOracle<'a, L> {
    pub(crate) fn new(labels: &'a [L]) -> Self {
        Self {
            inner: LabelOracle::new(labels),
            calls: Cell::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<L: Eq> Oracle for CountingOracle<'_, L> {
    fn answer(&self, left: usize, right: usize) -> bool {
        self.calls.set(self.calls.get() + 1);
        self.inner.answer(left, right)
    }
}
