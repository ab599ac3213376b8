//! Farthest-first query search.
//!
//! Neighbourhoods grow one skeleton point at a time. Each new point is the
//! unassigned point farthest from the skeleton, and it is compared with one
//! representative per neighbourhood until the oracle answers "same".

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::{
    neighbourhood::NeighbourhoodLabels,
    oracle::Oracle,
    pairwise::PairwiseDistances,
};

use super::{QueryPair, QueryPlan, Scan};

/// Farthest-first neighbourhood discovery.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use robustclust_core::{FarthestFirst, LabelOracle, PairwiseDistances};
///
/// // Two groups on a line: {0, 1} near zero and {2, 3} near ten.
/// let distances =
///     PairwiseDistances::from_condensed(4, vec![1.0, 10.0, 11.0, 9.0, 10.0, 1.0])?;
/// let oracle = LabelOracle::new(&[0, 0, 1, 1]);
/// let mut rng = SmallRng::seed_from_u64(7);
///
/// let plan = FarthestFirst::new()
///     .with_class_count(2)
///     .select(&distances, &oracle, 4, &mut rng);
/// let labels = plan.neighbourhoods().expect("farthest-first reports neighbourhoods");
/// assert_eq!(labels.count(), 2);
/// assert_eq!(plan.len(), 1);
/// # Ok::<(), robustclust_core::DataSourceError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FarthestFirst {
    class_count: Option<usize>,
}

impl FarthestFirst {
    /// Creates a search without an early stop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops discovery once `classes` neighbourhoods exist.
    ///
    /// Only a simulated oracle knows this number; a human-backed search
    /// leaves it unset and runs until the budget is spent.
    #[must_use]
    pub fn with_class_count(mut self, classes: usize) -> Self {
        self.class_count = Some(classes);
        self
    }

    /// Returns the configured early-stop class count.
    #[must_use]
    pub fn class_count(&self) -> Option<usize> {
        self.class_count
    }

    /// Runs discovery with at most `budget` queries.
    ///
    /// The seed point is drawn from `rng`. The plan carries the
    /// neighbourhood labels even when the budget is zero. A point whose
    /// scan the budget cuts short stays unassigned.
    #[instrument(
        name = "core.ffqs",
        skip(self, distances, oracle, rng),
        fields(points = distances.points(), class_count = ?self.class_count),
    )]
    pub fn select<O, R>(
        &self,
        distances: &PairwiseDistances,
        oracle: &O,
        budget: usize,
        rng: &mut R,
    ) -> QueryPlan
    where
        O: Oracle + ?Sized,
        R: Rng + ?Sized,
    {
        let points = distances.points();
        let mut labels = NeighbourhoodLabels::new(points);
        let mut pairs = Vec::with_capacity(budget);
        if points == 0 {
            return QueryPlan::new(pairs, Some(labels));
        }

        let seed = rng.gen_range(0..points);
        labels.open(seed);
        let mut nearest: Vec<f32> = (0..points).map(|p| distances.get(seed, p)).collect();

        while pairs.len() < budget && !self.discovered_all(&labels) {
            let Some(candidate) = farthest_unassigned(&labels, &nearest) else {
                break;
            };
            match scan_in_order(candidate, &labels, oracle, budget, &mut pairs) {
                Scan::Matched(id) => labels.assign(candidate, id),
                Scan::AllDifferent => {
                    let id = labels.open(candidate);
                    debug!(neighbourhood = %id, founder = candidate, "opened neighbourhood");
                }
                Scan::OutOfBudget => {
                    debug!(candidate, "budget ran out mid-scan, point left unassigned");
                    break;
                }
            }
            for (point, best) in nearest.iter_mut().enumerate() {
                *best = best.min(distances.get(candidate, point));
            }
        }

        info!(
            queries = pairs.len(),
            neighbourhoods = labels.count(),
            "farthest-first discovery finished"
        );
        QueryPlan::new(pairs, Some(labels))
    }

    fn discovered_all(&self, labels: &NeighbourhoodLabels) -> bool {
        self.class_count
            .is_some_and(|classes| labels.count() >= classes)
    }
}

/// Unassigned point with the largest distance to the skeleton; the lowest
/// index wins ties.
fn farthest_unassigned(labels: &NeighbourhoodLabels, nearest: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (point, &distance) in nearest.iter().enumerate() {
        if labels.is_assigned(point) {
            continue;
        }
        if best.is_none_or(|(_, current)| distance > current) {
            best = Some((point, distance));
        }
    }
    best.map(|(point, _)| point)
}

/// Compares `candidate` with each representative in id order, recording
/// every query, until the first "same" answer or the end of the budget.
fn scan_in_order<O: Oracle + ?Sized>(
    candidate: usize,
    labels: &NeighbourhoodLabels,
    oracle: &O,
    budget: usize,
    pairs: &mut Vec<QueryPair>,
) -> Scan {
    for id in labels.ids() {
        let Some(representative) = labels.representative(id) else {
            continue;
        };
        if pairs.len() >= budget {
            return Scan::OutOfBudget;
        }
        pairs.push(QueryPair::new(candidate, representative));
        if oracle.answer(candidate, representative) {
            return Scan::Matched(id);
        }
    }
    Scan::AllDifferent
}
