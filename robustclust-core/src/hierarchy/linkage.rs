//! Average-linkage agglomeration by nearest-neighbour chain.
//!
//! Average linkage is reducible, so mutual nearest neighbours stay mutual
//! after any unrelated merge and the chain finds every merge in `O(N²)`
//! time. Merges come out of height order and name each cluster by a
//! surviving point index; [`super::MergeTree`] sorts and relabels them.

use crate::pairwise::PairwiseDistances;

/// One merge as emitted by the chain, before relabelling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct ChainMerge {
    /// Point index naming the absorbed cluster.
    pub(super) absorbed: usize,
    /// Point index naming the surviving cluster.
    pub(super) survivor: usize,
    /// Average pairwise distance between the two clusters.
    pub(super) height: f64,
}

pub(super) fn average_linkage_chain(distances: &PairwiseDistances) -> Vec<ChainMerge> {
    let n = distances.points();
    let mut dist = vec![0.0_f64; n * n];
    for i in 0..n {
        for j in i + 1..n {
            let d = f64::from(distances.get(i, j));
            dist[i * n + j] = d;
            dist[j * n + i] = d;
        }
    }
    let mut size = vec![1_usize; n];
    // Height of the cluster held in each slot; keeps parents at or above
    // their children when rounding nudges an averaged distance down.
    let mut floor = vec![0.0_f64; n];
    let mut active = vec![true; n];
    let mut chain: Vec<usize> = Vec::with_capacity(n);
    let mut merges = Vec::with_capacity(n.saturating_sub(1));

    for _ in 1..n {
        if chain.is_empty() {
            if let Some(first) = active.iter().position(|&alive| alive) {
                chain.push(first);
            }
        }
        loop {
            let Some(&current) = chain.last() else {
                break;
            };
            let previous = chain.len().checked_sub(2).map(|at| chain[at]);
            let (mut nearest, mut nearest_dist) = match previous {
                // Preferring the previous link on ties keeps the chain finite.
                Some(prev) => (Some(prev), dist[current * n + prev]),
                None => (None, f64::INFINITY),
            };
            for other in (0..n).filter(|&other| active[other] && other != current) {
                let d = dist[current * n + other];
                if d < nearest_dist {
                    nearest = Some(other);
                    nearest_dist = d;
                }
            }
            let Some(nearest) = nearest else {
                break;
            };
            if previous == Some(nearest) {
                chain.truncate(chain.len() - 2);
                let (absorbed, survivor) = if current < nearest {
                    (current, nearest)
                } else {
                    (nearest, current)
                };
                merge_average(&mut dist, &mut size, &active, n, absorbed, survivor);
                active[absorbed] = false;
                let height = nearest_dist.max(floor[absorbed]).max(floor[survivor]);
                floor[survivor] = height;
                merges.push(ChainMerge {
                    absorbed,
                    survivor,
                    height,
                });
                break;
            }
            chain.push(nearest);
        }
    }

    merges
}

fn merge_average(
    dist: &mut [f64],
    size: &mut [usize],
    active: &[bool],
    n: usize,
    absorbed: usize,
    survivor: usize,
) {
    let absorbed_size = size[absorbed] as f64;
    let survivor_size = size[survivor] as f64;
    let total = absorbed_size + survivor_size;
    for other in (0..n).filter(|&other| active[other] && other != absorbed && other != survivor) {
        let updated = (absorbed_size * dist[absorbed * n + other]
            + survivor_size * dist[survivor * n + other])
            / total;
        dist[survivor * n + other] = updated;
        dist[other * n + survivor] = updated;
    }
    size[survivor] += size[absorbed];
}
