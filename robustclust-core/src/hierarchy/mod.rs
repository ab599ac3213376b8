//! Average-linkage merge tree consumed by active class discovery.
//!
//! The tree is an append-only arena: nodes `0..N` are the points and node
//! `N + k` is created by merge step `k`. Leaves are laid out so that every
//! node covers one contiguous run of [`MergeTree::leaf_order`], which makes
//! member lookups slice borrows rather than per-node allocations.

mod linkage;
mod union_find;

use std::fmt;

use thiserror::Error;

use crate::pairwise::PairwiseDistances;

use self::{linkage::average_linkage_chain, union_find::DisjointSet};

/// Errors raised while building a [`MergeTree`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HierarchyError {
    /// No points were supplied.
    #[error("cannot build a merge tree over zero points")]
    EmptyDataset,
    /// A merge height was negative, NaN, or infinite.
    #[error("merge step {step} has invalid height {height}")]
    InvalidHeight {
        /// Merge step that produced the height.
        step: usize,
        /// Offending height.
        height: f64,
    },
}

impl HierarchyError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> HierarchyErrorCode {
        match self {
            Self::EmptyDataset => HierarchyErrorCode::EmptyDataset,
            Self::InvalidHeight { .. } => HierarchyErrorCode::InvalidHeight,
        }
    }
}

/// Stable codes describing [`HierarchyError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum HierarchyErrorCode {
    /// No points were supplied.
    EmptyDataset,
    /// A merge height was invalid.
    InvalidHeight,
}

impl HierarchyErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyDataset => "HIERARCHY_EMPTY_DATASET",
            Self::InvalidHeight => "HIERARCHY_INVALID_HEIGHT",
        }
    }
}

impl fmt::Display for HierarchyErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One merge step joining two tree nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Merge {
    left: usize,
    right: usize,
    left_size: usize,
    right_size: usize,
    height: f64,
}

impl Merge {
    /// Lower-numbered child node.
    #[rustfmt::skip]
    #[must_use]
    pub fn left(&self) -> usize { self.left }

    /// Higher-numbered child node.
    #[rustfmt::skip]
    #[must_use]
    pub fn right(&self) -> usize { self.right }

    /// Average distance between the two children.
    #[rustfmt::skip]
    #[must_use]
    pub fn height(&self) -> f64 { self.height }

    /// Number of points covered by the merged node.
    #[must_use]
    pub fn size(&self) -> usize {
        self.left_size + self.right_size
    }

    /// Size of the smaller child.
    #[must_use]
    pub fn smaller_side(&self) -> usize {
        self.left_size.min(self.right_size)
    }
}

/// Average-linkage dendrogram stored as an arena of merge steps.
///
/// # Examples
/// ```
/// use robustclust_core::{MergeTree, PairwiseDistances};
///
/// // Points on a line at 0, 1, 10 and 12.
/// let distances =
///     PairwiseDistances::from_condensed(4, vec![1.0, 10.0, 12.0, 9.0, 11.0, 2.0])?;
/// let tree = MergeTree::average_linkage(&distances)?;
///
/// let root = tree.merges().last().expect("four points merge three times");
/// assert_eq!(root.smaller_side(), 2);
/// assert_eq!(tree.members(root.left()), &[0, 1]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MergeTree {
    points: usize,
    merges: Vec<Merge>,
    sizes: Vec<usize>,
    starts: Vec<usize>,
    leaf_order: Vec<usize>,
}

impl MergeTree {
    /// Agglomerates every point under average linkage.
    ///
    /// Merges are ordered by non-decreasing height; ties keep the order in
    /// which the nearest-neighbour chain found them.
    ///
    /// # Errors
    /// Returns [`HierarchyError::EmptyDataset`] for zero points and
    /// [`HierarchyError::InvalidHeight`] when a merge height is not a finite,
    /// non-negative number.
    pub fn average_linkage(distances: &PairwiseDistances) -> Result<Self, HierarchyError> {
        let points = distances.points();
        if points == 0 {
            return Err(HierarchyError::EmptyDataset);
        }

        let mut raw = average_linkage_chain(distances);
        raw.sort_by(|a, b| a.height.total_cmp(&b.height));

        let mut sizes = vec![1_usize; 2 * points - 1];
        let mut set = DisjointSet::new(points);
        let mut merges = Vec::with_capacity(raw.len());
        for (step, chain_merge) in raw.into_iter().enumerate() {
            if !(chain_merge.height.is_finite() && chain_merge.height >= 0.0) {
                return Err(HierarchyError::InvalidHeight {
                    step,
                    height: chain_merge.height,
                });
            }
            let first = set.node_of(chain_merge.absorbed);
            let second = set.node_of(chain_merge.survivor);
            let (left, right) = (first.min(second), first.max(second));
            let node = points + step;
            set.merge_into(chain_merge.absorbed, chain_merge.survivor, node);
            sizes[node] = sizes[left] + sizes[right];
            merges.push(Merge {
                left,
                right,
                left_size: sizes[left],
                right_size: sizes[right],
                height: chain_merge.height,
            });
        }

        let mut starts = vec![0_usize; sizes.len()];
        for (step, merge) in merges.iter().enumerate().rev() {
            let start = starts[points + step];
            starts[merge.left] = start;
            starts[merge.right] = start + merge.left_size;
        }
        let mut leaf_order = vec![0_usize; points];
        for point in 0..points {
            leaf_order[starts[point]] = point;
        }

        Ok(Self {
            points,
            merges,
            sizes,
            starts,
            leaf_order,
        })
    }

    /// Number of leaves.
    #[rustfmt::skip]
    #[must_use]
    pub fn points(&self) -> usize { self.points }

    /// Merge steps in height order.
    #[rustfmt::skip]
    #[must_use]
    pub fn merges(&self) -> &[Merge] { &self.merges }

    /// Total number of nodes, leaves included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.sizes.len()
    }

    /// Points covered by `node`, or `None` when the node does not exist.
    #[must_use]
    pub fn node_size(&self, node: usize) -> Option<usize> {
        self.sizes.get(node).copied()
    }

    /// Point indices covered by `node`.
    ///
    /// # Panics
    /// Panics when `node` is not below [`Self::node_count`].
    #[must_use]
    pub fn members(&self, node: usize) -> &[usize] {
        let start = self.starts[node];
        &self.leaf_order[start..start + self.sizes[node]]
    }

    /// Member slices of both children of merge `step`.
    #[must_use]
    pub fn sides(&self, step: usize) -> Option<(&[usize], &[usize])> {
        let merge = self.merges.get(step)?;
        Some((self.members(merge.left), self.members(merge.right)))
    }

    /// Leaves in dendrogram order.
    #[must_use]
    pub fn leaf_order(&self) -> &[usize] {
        &self.leaf_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{CountingSource, suite_proptest_config};
    use proptest::prelude::*;
    use rstest::rstest;
    use std::sync::{Arc, atomic::AtomicUsize};

    fn line(points: Vec<f32>) -> PairwiseDistances {
        let source = CountingSource::new(points, Arc::new(AtomicUsize::new(0)));
        PairwiseDistances::from_source(&source).expect("finite distances")
    }

    #[test]
    fn separated_groups_join_last() {
        let tree = MergeTree::average_linkage(&line(vec![0.0, 0.5, 1.0, 20.0, 20.5, 21.0]))
            .expect("tree builds");
        assert_eq!(tree.merges().len(), 5);

        let root = tree.merges()[4];
        assert_eq!(root.smaller_side(), 3);
        assert_eq!(root.size(), 6);
        let (left, right) = tree.sides(4).expect("root exists");
        let mut left = left.to_vec();
        let mut right = right.to_vec();
        left.sort_unstable();
        right.sort_unstable();
        assert_eq!(left, vec![0, 1, 2]);
        assert_eq!(right, vec![3, 4, 5]);
    }

    #[test]
    fn heights_follow_average_linkage() {
        // 0, 1 join at 1; 10, 12 join at 2; the groups join at mean(10, 12, 9, 11).
        let tree = MergeTree::average_linkage(&line(vec![0.0, 1.0, 10.0, 12.0]))
            .expect("tree builds");
        let heights: Vec<f64> = tree.merges().iter().map(Merge::height).collect();
        assert_eq!(heights.len(), 3);
        assert!((heights[0] - 1.0).abs() < 1e-9);
        assert!((heights[1] - 2.0).abs() < 1e-9);
        assert!((heights[2] - 10.5).abs() < 1e-9);
        assert_eq!(tree.merges()[2].left(), 4);
        assert_eq!(tree.merges()[2].right(), 5);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(7)]
    fn root_covers_every_point(#[case] points: usize) {
        let tree = MergeTree::average_linkage(&line((0..points).map(|p| p as f32).collect()))
            .expect("tree builds");
        let root = tree.node_count() - 1;
        let mut members = tree.members(root).to_vec();
        members.sort_unstable();
        assert_eq!(members, (0..points).collect::<Vec<_>>());
        assert_eq!(tree.node_size(root), Some(points));
    }

    proptest! {
        #![proptest_config(suite_proptest_config(64))]

        #[test]
        fn merge_sides_partition_their_node(
            values in prop::collection::vec(-50.0_f32..50.0, 2..24),
        ) {
            let points = values.len();
            let tree = MergeTree::average_linkage(&line(values)).expect("tree builds");
            prop_assert_eq!(tree.merges().len(), points - 1);

            let mut previous = f64::NEG_INFINITY;
            for (step, merge) in tree.merges().iter().enumerate() {
                prop_assert!(merge.height() >= previous - 1e-9);
                previous = merge.height();
                prop_assert!(merge.left() < points + step);
                prop_assert!(merge.right() < points + step);

                let (left, right) = tree.sides(step).expect("step exists");
                prop_assert_eq!(left.len(), tree.node_size(merge.left()).unwrap_or(0));
                prop_assert_eq!(right.len(), tree.node_size(merge.right()).unwrap_or(0));
                let mut covered: Vec<usize> = left.iter().chain(right).copied().collect();
                covered.sort_unstable();
                let mut node = tree.members(points + step).to_vec();
                node.sort_unstable();
                prop_assert_eq!(covered, node);
            }
        }
    }
}
