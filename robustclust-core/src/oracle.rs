//! Same/different answer sources for pairwise queries.
//!
//! Selection strategies only learn about ground truth through [`Oracle`], so
//! a human-in-the-loop source can replace [`LabelOracle`] without touching
//! them.

use std::collections::HashSet;
use std::hash::Hash;

/// Answers whether two points belong to the same group.
pub trait Oracle {
    /// Returns `true` when `left` and `right` share a group.
    fn answer(&self, left: usize, right: usize) -> bool;
}

impl<O: Oracle + ?Sized> Oracle for &O {
    fn answer(&self, left: usize, right: usize) -> bool {
        (**self).answer(left, right)
    }
}

/// Oracle simulated from a ground-truth label vector.
///
/// # Examples
/// ```
/// use robustclust_core::{LabelOracle, Oracle};
///
/// let oracle = LabelOracle::new(&["a", "b", "a"]);
/// assert!(oracle.answer(0, 2));
/// assert!(!oracle.answer(0, 1));
/// assert_eq!(oracle.class_count(), 2);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct LabelOracle<'a, L> {
    labels: &'a [L],
}

impl<'a, L: Eq + Hash> LabelOracle<'a, L> {
    /// Wraps the ground-truth labels.
    #[must_use]
    pub fn new(labels: &'a [L]) -> Self {
        Self { labels }
    }

    /// Number of labelled points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns whether no points are labelled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of distinct classes in the ground truth.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.labels.iter().collect::<HashSet<_>>().len()
    }
}

impl<L: Eq> Oracle for LabelOracle<'_, L> {
    /// # Panics
    /// Panics when either index is outside the label vector.
    fn answer(&self, left: usize, right: usize) -> bool {
        self.labels[left] == self.labels[right]
    }
}
