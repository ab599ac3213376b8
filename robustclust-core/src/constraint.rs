//! Output types of a constraint selection.

use crate::{neighbourhood::NeighbourhoodLabels, pairwise::LinkMatrix};

/// Pair of points with a must-link (`true`) or cannot-link (`false`) answer.
///
/// # Examples
/// ```
/// use robustclust_core::Constraint;
///
/// let constraint = Constraint::new(4, 9, true);
/// assert_eq!(constraint.as_row(), [4, 9, 1]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constraint {
    /// First point of the pair.
    pub left: usize,
    /// Second point of the pair.
    pub right: usize,
    /// Whether the answer says the points share a group.
    pub link: bool,
}

impl Constraint {
    /// Creates a constraint.
    #[must_use]
    pub const fn new(left: usize, right: usize, link: bool) -> Self {
        Self { left, right, link }
    }

    /// Row form `[left, right, link]` with the link as `0` or `1`.
    #[must_use]
    pub const fn as_row(&self) -> [usize; 3] {
        [self.left, self.right, self.link as usize]
    }
}

/// Constraints produced by one selection run.
///
/// Holds exactly one constraint per budgeted query. Farthest-first methods
/// also carry the neighbourhoods they discovered and the all-pairs link
/// matrix those neighbourhoods imply.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
    structured: usize,
    flipped: usize,
    neighbourhoods: Option<NeighbourhoodLabels>,
    links: Option<LinkMatrix>,
}

impl ConstraintSet {
    pub(crate) fn new(
        constraints: Vec<Constraint>,
        structured: usize,
        flipped: usize,
        neighbourhoods: Option<NeighbourhoodLabels>,
        links: Option<LinkMatrix>,
    ) -> Self {
        Self {
            constraints,
            structured,
            flipped,
            neighbourhoods,
            links,
        }
    }

    /// Constraints in query order.
    #[rustfmt::skip]
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] { &self.constraints }

    /// Rows `[left, right, link]` in query order.
    pub fn rows(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.constraints.iter().map(Constraint::as_row)
    }

    /// Number of constraints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns whether the set holds no constraints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Number of leading constraints chosen by the strategy; the rest are
    /// random padding.
    #[must_use]
    pub fn structured_queries(&self) -> usize {
        self.structured
    }

    /// Number of answers flipped by noise injection.
    #[must_use]
    pub fn flipped(&self) -> usize {
        self.flipped
    }

    /// Neighbourhoods discovered by farthest-first methods.
    #[must_use]
    pub fn neighbourhoods(&self) -> Option<&NeighbourhoodLabels> {
        self.neighbourhoods.as_ref()
    }

    /// All-pairs link matrix implied by the neighbourhoods.
    #[must_use]
    pub fn link_matrix(&self) -> Option<&LinkMatrix> {
        self.links.as_ref()
    }
}
