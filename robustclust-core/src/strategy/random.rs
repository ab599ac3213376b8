//! Uniform random baseline.

use rand::Rng;
use tracing::instrument;

use super::{QueryPair, QueryPlan};

/// Draws every pair independently and uniformly, with replacement.
///
/// A pair may repeat and may join a point with itself; the baseline makes
/// no attempt to be informative.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use robustclust_core::RandomPairs;
///
/// let mut rng = SmallRng::seed_from_u64(1);
/// let plan = RandomPairs.select(10, 4, &mut rng);
/// assert_eq!(plan.len(), 4);
/// assert!(plan.neighbourhoods().is_none());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RandomPairs;

impl RandomPairs {
    /// Draws `budget` pairs over `points` points.
    ///
    /// Returns an empty plan when `points` is zero.
    #[instrument(name = "core.rand", skip(self, rng))]
    pub fn select<R: Rng + ?Sized>(&self, points: usize, budget: usize, rng: &mut R) -> QueryPlan {
        if points == 0 {
            return QueryPlan::new(Vec::new(), None);
        }
        let pairs = (0..budget)
            .map(|_| QueryPair::random(points, rng))
            .collect();
        QueryPlan::new(pairs, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    #[rstest]
    #[case(1, 5)]
    #[case(7, 0)]
    #[case(20, 33)]
    fn draws_exactly_budget_pairs_in_range(#[case] points: usize, #[case] budget: usize) {
        let mut rng = SmallRng::seed_from_u64(11);
        let plan = RandomPairs.select(points, budget, &mut rng);
        assert_eq!(plan.len(), budget);
        assert_eq!(plan.structured(), budget);
        assert!(
            plan.pairs()
                .iter()
                .all(|pair| pair.left < points && pair.right < points)
        );
    }

    #[test]
    fn empty_dataset_yields_empty_plan() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(RandomPairs.select(0, 3, &mut rng).is_empty());
    }

    #[test]
    fn seeded_draws_repeat() {
        let first = RandomPairs.select(50, 20, &mut SmallRng::seed_from_u64(3));
        let second = RandomPairs.select(50, 20, &mut SmallRng::seed_from_u64(3));
        assert_eq!(first, second);
    }
}
