//! Builder utilities for configuring constraint selection.
//!
//! Exposes the query-method selection surface and the validation run before
//! a [`ConstraintSelector`] is constructed.

use std::{fmt, num::NonZeroUsize, str::FromStr, sync::Arc};

use crate::{Result, error::SelectionError, selector::ConstraintSelector};

/// Query-selection strategy applied by a [`ConstraintSelector`].
///
/// Parses from and displays as the names `rand`, `ffqs`, `mmffqs` and `acd`.
///
/// # Examples
/// ```
/// use robustclust_core::QueryMethod;
///
/// let method: QueryMethod = "mmffqs".parse().expect("known method");
/// assert_eq!(method, QueryMethod::MinimaxFarthestFirst);
/// assert_eq!(method.to_string(), "mmffqs");
/// assert!("kmeans".parse::<QueryMethod>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QueryMethod {
    /// Uniform random pairs.
    #[default]
    Random,
    /// Farthest-first query search.
    FarthestFirst,
    /// Farthest-first discovery followed by minimax consolidation.
    MinimaxFarthestFirst,
    /// Merge-tree driven active class discovery.
    ActiveClassDiscovery,
}

impl QueryMethod {
    /// Every method, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Random,
        Self::FarthestFirst,
        Self::MinimaxFarthestFirst,
        Self::ActiveClassDiscovery,
    ];

    /// Returns the method's short name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "rand",
            Self::FarthestFirst => "ffqs",
            Self::MinimaxFarthestFirst => "mmffqs",
            Self::ActiveClassDiscovery => "acd",
        }
    }

    /// Returns whether the method reports neighbourhoods, and so a link
    /// matrix.
    #[must_use]
    pub const fn discovers_neighbourhoods(self) -> bool {
        matches!(self, Self::FarthestFirst | Self::MinimaxFarthestFirst)
    }
}

impl fmt::Display for QueryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryMethod {
    type Err = SelectionError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == name)
            .ok_or_else(|| SelectionError::UnknownMethod {
                name: Arc::from(name),
            })
    }
}

/// Plain-data options accepted by [`crate::get_constraints`].
///
/// # Examples
/// ```
/// use robustclust_core::SelectionOptions;
///
/// let options = SelectionOptions {
///     budget: Some(12),
///     seed: Some(7),
///     ..SelectionOptions::default()
/// };
/// assert_eq!(options.error_rate, 0.0);
/// assert!(options.min_merge_size.is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelectionOptions {
    /// Number of queries; half the dataset when unset.
    pub budget: Option<usize>,
    /// Probability of flipping each answer.
    pub error_rate: f64,
    /// Smallest smaller side of a merge that active class discovery queries.
    pub min_merge_size: Option<NonZeroUsize>,
    /// Seed for the random source; entropy when unset.
    pub seed: Option<u64>,
}

/// Configures and constructs [`ConstraintSelector`] instances.
///
/// # Examples
/// ```
/// use robustclust_core::{ConstraintSelectorBuilder, QueryMethod};
///
/// let selector = ConstraintSelectorBuilder::new()
///     .with_method(QueryMethod::FarthestFirst)
///     .with_budget(20)
///     .with_error_rate(0.1)
///     .with_seed(42)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(selector.method(), QueryMethod::FarthestFirst);
/// assert_eq!(selector.budget(), Some(20));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConstraintSelectorBuilder {
    method: QueryMethod,
    budget: Option<usize>,
    error_rate: f64,
    min_merge_size: Option<NonZeroUsize>,
    seed: Option<u64>,
}

impl ConstraintSelectorBuilder {
    /// Creates a builder for noise-free random selection with the default
    /// budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from `method` and plain-data `options`.
    #[must_use]
    pub fn from_options(method: QueryMethod, options: SelectionOptions) -> Self {
        Self {
            method,
            budget: options.budget,
            error_rate: options.error_rate,
            min_merge_size: options.min_merge_size,
            seed: options.seed,
        }
    }

    /// Selects the query method.
    #[must_use]
    pub fn with_method(mut self, method: QueryMethod) -> Self {
        self.method = method;
        self
    }

    /// Returns the configured method.
    #[must_use]
    pub fn method(&self) -> QueryMethod {
        self.method
    }

    /// Fixes the number of queries instead of using half the dataset.
    #[must_use]
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Returns the explicit budget, if any.
    #[must_use]
    pub fn budget(&self) -> Option<usize> {
        self.budget
    }

    /// Sets the probability of flipping each answer.
    ///
    /// # Examples
    /// ```
    /// use robustclust_core::ConstraintSelectorBuilder;
    ///
    /// let err = ConstraintSelectorBuilder::new()
    ///     .with_error_rate(1.5)
    ///     .build()
    ///     .expect_err("rates above one are rejected");
    /// assert_eq!(err.code().as_str(), "SELECTION_INVALID_ERROR_RATE");
    /// ```
    #[must_use]
    pub fn with_error_rate(mut self, rate: f64) -> Self {
        self.error_rate = rate;
        self
    }

    /// Returns the configured error rate.
    #[must_use]
    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Ignores merges whose smaller side is below `size` during active
    /// class discovery. Zero disables the filter.
    #[must_use]
    pub fn with_min_merge_size(mut self, size: usize) -> Self {
        self.min_merge_size = NonZeroUsize::new(size);
        self
    }

    /// Returns the merge-size filter, if any.
    #[must_use]
    pub fn min_merge_size(&self) -> Option<NonZeroUsize> {
        self.min_merge_size
    }

    /// Seeds the random source so runs repeat exactly.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the configured seed, if any.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Validates the configuration and constructs a [`ConstraintSelector`].
    ///
    /// # Errors
    /// Returns [`SelectionError::InvalidErrorRate`] when the error rate is
    /// not a finite probability.
    pub fn build(self) -> Result<ConstraintSelector> {
        if !(0.0..=1.0).contains(&self.error_rate) {
            return Err(SelectionError::InvalidErrorRate {
                got: self.error_rate,
            });
        }
        Ok(ConstraintSelector::new(
            self.method,
            self.budget,
            self.error_rate,
            self.min_merge_size,
            self.seed,
        ))
    }
}
