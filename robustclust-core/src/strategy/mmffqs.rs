//! Minimax farthest-first query search.
//!
//! Runs [`FarthestFirst`] and then spends the rest of the budget on
//! consolidation. Candidates are the points least similar to the skeleton,
//! and neighbourhoods are tried in order of their most similar member.

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::{
    neighbourhood::{NeighbourhoodId, NeighbourhoodLabels},
    oracle::Oracle,
    pairwise::{Affinities, PairwiseDistances},
};

use super::{QueryPair, QueryPlan, Scan, ffqs::FarthestFirst};

/// Farthest-first discovery followed by affinity-ranked consolidation.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use robustclust_core::{LabelOracle, MinimaxFarthestFirst, PairwiseDistances};
///
/// let distances =
///     PairwiseDistances::from_condensed(4, vec![1.0, 10.0, 11.0, 9.0, 10.0, 1.0])?;
/// let oracle = LabelOracle::new(&[0, 0, 1, 1]);
/// let mut rng = SmallRng::seed_from_u64(7);
///
/// let plan = MinimaxFarthestFirst::new()
///     .with_class_count(2)
///     .select(&distances, &oracle, 4, &mut rng);
/// let labels = plan.neighbourhoods().expect("neighbourhoods are reported");
/// assert_eq!(labels.assigned().count(), 4);
/// assert!(plan.len() <= 4);
/// # Ok::<(), robustclust_core::DataSourceError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinimaxFarthestFirst {
    discovery: FarthestFirst,
}

impl MinimaxFarthestFirst {
    /// Creates a search without a discovery early stop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ends the discovery phase once `classes` neighbourhoods exist.
    #[must_use]
    pub fn with_class_count(mut self, classes: usize) -> Self {
        self.discovery = self.discovery.with_class_count(classes);
        self
    }

    /// Runs both phases with at most `budget` queries in total.
    ///
    /// Consolidation stops early when no neighbourhood has a member other
    /// than the candidate; the caller pads what is left.
    #[instrument(
        name = "core.mmffqs",
        skip(self, distances, oracle, rng),
        fields(points = distances.points()),
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
        let discovered = self.discovery.select(distances, oracle, budget, rng);
        let discovery_queries = discovered.len();
        let (mut pairs, labels) = discovered.into_parts();
        let points = distances.points();
        let mut labels = labels.unwrap_or_else(|| NeighbourhoodLabels::new(points));
        if points == 0 {
            return QueryPlan::new(pairs, Some(labels));
        }

        let affinities = Affinities::from_distances(distances);
        let mut skeleton = Skeleton::from_labels(&labels, &affinities);

        while pairs.len() < budget {
            let candidate = match skeleton.least_similar() {
                Some(point) => point,
                None => rng.gen_range(0..points),
            };
            let ranked = rank_neighbourhoods(candidate, &labels, &affinities);
            if ranked.is_empty() {
                debug!(candidate, "no neighbourhood to compare with");
                break;
            }

            let outcome = scan_ranked(candidate, &ranked, oracle, budget, &mut pairs);
            if !labels.is_assigned(candidate) {
                match outcome {
                    Scan::Matched(id) => labels.assign(candidate, id),
                    Scan::AllDifferent => {
                        let id = labels.open(candidate);
                        debug!(neighbourhood = %id, founder = candidate, "opened neighbourhood");
                    }
                    Scan::OutOfBudget => {}
                }
            }
            skeleton.insert(candidate, &affinities);
        }

        info!(
            queries = pairs.len(),
            discovery_queries,
            neighbourhoods = labels.count(),
            "minimax consolidation finished"
        );
        QueryPlan::new(pairs, Some(labels))
    }
}

/// Skeleton membership with each point's best affinity to it.
struct Skeleton {
    member: Vec<bool>,
    size: usize,
    best: Vec<f32>,
}

impl Skeleton {
    fn from_labels(labels: &NeighbourhoodLabels, affinities: &Affinities) -> Self {
        let points = labels.len();
        let mut skeleton = Self {
            member: vec![false; points],
            size: 0,
            best: vec![f32::NEG_INFINITY; points],
        };
        for point in labels.assigned() {
            skeleton.insert(point, affinities);
        }
        skeleton
    }

    fn insert(&mut self, point: usize, affinities: &Affinities) {
        if self.member[point] {
            return;
        }
        self.member[point] = true;
        self.size += 1;
        for (other, best) in self.best.iter_mut().enumerate() {
            *best = best.max(affinities.get(point, other));
        }
    }

    /// Non-member with the smallest best affinity; the lowest index wins
    /// ties. `None` once every point is a member.
    fn least_similar(&self) -> Option<usize> {
        if self.size == self.member.len() {
            return None;
        }
        let mut chosen: Option<(usize, f32)> = None;
        for (point, &affinity) in self.best.iter().enumerate() {
            if self.member[point] {
                continue;
            }
            if chosen.is_none_or(|(_, current)| affinity < current) {
                chosen = Some((point, affinity));
            }
        }
        chosen.map(|(point, _)| point)
    }
}

/// Neighbourhoods ordered by their most affine member, descending.
fn rank_neighbourhoods(
    candidate: usize,
    labels: &NeighbourhoodLabels,
    affinities: &Affinities,
) -> Vec<(NeighbourhoodId, usize, f32)> {
    let mut ranked: Vec<_> = labels
        .ids()
        .filter_map(|id| {
            let members: Vec<usize> = labels
                .members(id)
                .iter()
                .copied()
                .filter(|&member| member != candidate)
                .collect();
            let block = affinities.block(&[candidate], &members);
            let row = block.row(0)?;
            let (at, &affinity) = row
                .iter()
                .enumerate()
                .reduce(|best, next| if next.1 > best.1 { next } else { best })?;
            Some((id, members[at], affinity))
        })
        .collect();
    ranked.sort_by(|a, b| b.2.total_cmp(&a.2));
    ranked
}

fn scan_ranked<O: Oracle + ?Sized>(
    candidate: usize,
    ranked: &[(NeighbourhoodId, usize, f32)],
    oracle: &O,
    budget: usize,
    pairs: &mut Vec<QueryPair>,
) -> Scan {
    for &(id, representative, _) in ranked {
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
