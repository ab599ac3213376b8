//! Neighbourhood-label vector grown by the farthest-first strategies.
//!
//! Label `0` marks an unassigned point. Positive labels identify
//! neighbourhoods in discovery order. Member lists are kept alongside the
//! label vector so representative lookups do not scan every point.

use std::fmt;

/// Identifier of a discovered neighbourhood, starting at `1`.
///
/// # Examples
/// ```
/// use robustclust_core::NeighbourhoodLabels;
///
/// let labels = NeighbourhoodLabels::from_raw(vec![0, 2, 1]);
/// let id = labels.label(1).expect("point 1 is assigned");
/// assert_eq!(id.get(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeighbourhoodId(u32);

impl NeighbourhoodId {
    /// Returns the numeric label.
    #[rustfmt::skip]
    #[must_use]
    pub fn get(self) -> u32 { self.0 }

    fn slot(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for NeighbourhoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-point neighbourhood labels with member lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighbourhoodLabels {
    labels: Vec<u32>,
    members: Vec<Vec<usize>>,
}

impl NeighbourhoodLabels {
    /// Creates labels for `points` unassigned points.
    #[must_use]
    pub fn new(points: usize) -> Self {
        Self {
            labels: vec![0; points],
            members: Vec::new(),
        }
    }

    /// Builds labels from a raw vector where `0` means unassigned.
    ///
    /// Neighbourhood ids missing from `raw` become empty neighbourhoods.
    #[must_use]
    pub fn from_raw(raw: Vec<u32>) -> Self {
        let count = raw.iter().copied().max().unwrap_or(0) as usize;
        let mut members = vec![Vec::new(); count];
        for (point, &label) in raw.iter().enumerate() {
            if label > 0 {
                members[label as usize - 1].push(point);
            }
        }
        Self {
            labels: raw,
            members,
        }
    }

    /// Number of labelled points (assigned or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns whether the vector covers no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of neighbourhoods opened so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Neighbourhood ids in discovery order.
    pub fn ids(&self) -> impl Iterator<Item = NeighbourhoodId> + use<> {
        (1..=self.members.len() as u32).map(NeighbourhoodId)
    }

    /// Neighbourhood of `point`, or `None` when unassigned or out of range.
    #[must_use]
    pub fn label(&self, point: usize) -> Option<NeighbourhoodId> {
        self.labels
            .get(point)
            .copied()
            .filter(|&label| label > 0)
            .map(NeighbourhoodId)
    }

    /// Returns whether `point` belongs to a neighbourhood.
    #[must_use]
    pub fn is_assigned(&self, point: usize) -> bool {
        self.label(point).is_some()
    }

    /// Points assigned to `id`, in assignment order.
    #[must_use]
    pub fn members(&self, id: NeighbourhoodId) -> &[usize] {
        self.members.get(id.slot()).map_or(&[], Vec::as_slice)
    }

    /// Lowest-index member of `id`.
    #[must_use]
    pub fn representative(&self, id: NeighbourhoodId) -> Option<usize> {
        self.members(id).iter().copied().min()
    }

    /// Assigned points in index order.
    pub fn assigned(&self) -> impl Iterator<Item = usize> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter_map(|(point, &label)| (label > 0).then_some(point))
    }

    /// Raw label vector, `0` for unassigned points.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.labels
    }

    /// Opens a new neighbourhood founded by `point`.
    pub(crate) fn open(&mut self, point: usize) -> NeighbourhoodId {
        self.members.push(Vec::new());
        let id = NeighbourhoodId(self.members.len() as u32);
        self.assign(point, id);
        id
    }

    /// Places an unassigned `point` into `id`.
    pub(crate) fn assign(&mut self, point: usize, id: NeighbourhoodId) {
        debug_assert!(!self.is_assigned(point), "point {point} is already assigned");
        self.labels[point] = id.get();
        self.members[id.slot()].push(point);
    }
}
