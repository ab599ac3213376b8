//! Query-selection strategies.
//!
//! Each strategy turns a budget into a [`QueryPlan`]: the pairs to put to
//! the oracle and, for the farthest-first family, the neighbourhoods the
//! answers revealed. Strategies never see ground truth except through an
//! [`crate::Oracle`].

mod acd;
mod ffqs;
mod mmffqs;
mod random;

use rand::Rng;
use tracing::warn;

use crate::neighbourhood::{NeighbourhoodId, NeighbourhoodLabels};

pub use self::{
    acd::ActiveClassDiscovery, ffqs::FarthestFirst, mmffqs::MinimaxFarthestFirst,
    random::RandomPairs,
};

/// Ordered pair of point indices put to the oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QueryPair {
    /// Point being placed.
    pub left: usize,
    /// Point it is compared with.
    pub right: usize,
}

impl QueryPair {
    /// Creates a pair.
    #[must_use]
    pub const fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    pub(crate) fn random<R: Rng + ?Sized>(points: usize, rng: &mut R) -> Self {
        Self::new(rng.gen_range(0..points), rng.gen_range(0..points))
    }
}

/// How a candidate's comparison with neighbourhood representatives ended.
enum Scan {
    /// The oracle answered "same" for this neighbourhood.
    Matched(NeighbourhoodId),
    /// Every neighbourhood was asked and answered "different".
    AllDifferent,
    /// The budget ran out before every neighbourhood was asked.
    OutOfBudget,
}

/// Pairs chosen by a strategy, plus any neighbourhoods it discovered.
///
/// The first [`Self::structured`] pairs come from the strategy itself; any
/// after that are uniform random padding.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryPlan {
    pairs: Vec<QueryPair>,
    structured: usize,
    neighbourhoods: Option<NeighbourhoodLabels>,
}

impl QueryPlan {
    /// Wraps strategy output; every pair counts as structured.
    #[must_use]
    pub fn new(pairs: Vec<QueryPair>, neighbourhoods: Option<NeighbourhoodLabels>) -> Self {
        Self {
            structured: pairs.len(),
            pairs,
            neighbourhoods,
        }
    }

    /// Pairs in query order.
    #[rustfmt::skip]
    #[must_use]
    pub fn pairs(&self) -> &[QueryPair] { &self.pairs }

    /// Number of pairs chosen by the strategy rather than by padding.
    #[must_use]
    pub fn structured(&self) -> usize {
        self.structured
    }

    /// Neighbourhood labels discovered by farthest-first strategies.
    #[must_use]
    pub fn neighbourhoods(&self) -> Option<&NeighbourhoodLabels> {
        self.neighbourhoods.as_ref()
    }

    /// Number of pairs, padding included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns whether the plan holds no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Splits the plan into its pairs and neighbourhoods.
    #[must_use]
    pub fn into_parts(self) -> (Vec<QueryPair>, Option<NeighbourhoodLabels>) {
        (self.pairs, self.neighbourhoods)
    }

    /// Tops the plan up to `budget` pairs drawn uniformly over `points`.
    ///
    /// Does nothing when the plan is already full or `points` is zero.
    pub fn pad<R: Rng + ?Sized>(&mut self, points: usize, budget: usize, rng: &mut R) {
        let missing = budget.saturating_sub(self.pairs.len());
        if missing == 0 || points == 0 {
            return;
        }
        warn!(
            structured = self.structured,
            budget,
            padding = missing,
            "strategy ran short, padding with random pairs"
        );
        self.pairs
            .extend((0..missing).map(|_| QueryPair::random(points, rng)));
    }
}
