//! Active class discovery.
//!
//! Balanced merges high in the average-linkage tree join two populous
//! groups, so a query across one of them says the most about whether those
//! groups belong together. Merges are ranked by the size of their smaller
//! side and one random member of each side is queried.

use std::{cmp::Reverse, num::NonZeroUsize};

use rand::{Rng, seq::SliceRandom};
use tracing::{info, instrument};

use crate::{
    hierarchy::{HierarchyError, MergeTree},
    pairwise::PairwiseDistances,
};

use super::{QueryPair, QueryPlan};

/// Merge-tree driven query selection.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use rand::{SeedableRng, rngs::SmallRng};
/// use robustclust_core::{ActiveClassDiscovery, PairwiseDistances};
///
/// let distances =
///     PairwiseDistances::from_condensed(4, vec![1.0, 10.0, 11.0, 9.0, 10.0, 1.0])?;
/// let mut rng = SmallRng::seed_from_u64(3);
///
/// let plan = ActiveClassDiscovery::new()
///     .with_min_merge_size(NonZeroUsize::new(2).expect("non-zero"))
///     .select(&distances, 3, &mut rng)?;
/// assert_eq!(plan.len(), 3);
/// // Only the root merge has two points on each side.
/// assert_eq!(plan.structured(), 1);
/// let first = plan.pairs()[0];
/// assert_ne!(first.left < 2, first.right < 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActiveClassDiscovery {
    min_merge_size: Option<NonZeroUsize>,
}

impl ActiveClassDiscovery {
    /// Creates a search that considers every merge.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignores merges whose smaller side has fewer than `size` points.
    #[must_use]
    pub fn with_min_merge_size(mut self, size: NonZeroUsize) -> Self {
        self.min_merge_size = Some(size);
        self
    }

    /// Returns the smaller-side threshold, if any.
    #[rustfmt::skip]
    #[must_use]
    pub fn min_merge_size(&self) -> Option<NonZeroUsize> { self.min_merge_size }

    /// Merge steps of `tree` in query order.
    ///
    /// Larger smaller sides come first; equal sizes keep merge-step order.
    #[must_use]
    pub fn rank(&self, tree: &MergeTree) -> Vec<usize> {
        let threshold = self.min_merge_size.map_or(1, NonZeroUsize::get);
        let merges = tree.merges();
        let mut steps: Vec<usize> = (0..merges.len())
            .filter(|&step| merges[step].smaller_side() >= threshold)
            .collect();
        steps.sort_by_key(|&step| Reverse(merges[step].smaller_side()));
        steps
    }

    /// Builds the merge tree over `distances` and selects `budget` pairs.
    ///
    /// Ranked merges beyond the budget are ignored; a shortfall is padded
    /// with uniform random pairs.
    ///
    /// # Errors
    /// Returns [`HierarchyError`] when the merge tree cannot be built.
    #[instrument(
        name = "core.acd",
        err,
        skip(self, distances, rng),
        fields(points = distances.points(), min_merge_size = ?self.min_merge_size),
    )]
    pub fn select<R: Rng + ?Sized>(
        &self,
        distances: &PairwiseDistances,
        budget: usize,
        rng: &mut R,
    ) -> Result<QueryPlan, HierarchyError> {
        let tree = MergeTree::average_linkage(distances)?;
        let ranked = self.rank(&tree);
        let pairs: Vec<QueryPair> = ranked
            .iter()
            .take(budget)
            .filter_map(|&step| {
                let (left, right) = tree.sides(step)?;
                Some(QueryPair::new(*left.choose(rng)?, *right.choose(rng)?))
            })
            .collect();
        info!(
            merges = tree.merges().len(),
            eligible = ranked.len(),
            queries = pairs.len(),
            "merge ranking finished"
        );

        let mut plan = QueryPlan::new(pairs, None);
        plan.pad(tree.points(), budget, rng);
        Ok(plan)
    }
}
