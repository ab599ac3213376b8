//! Constraint assembly for the robustclust library.
//!
//! Provides the [`ConstraintSelector`] runtime entry point, the
//! [`get_constraints`] convenience wrapper, and noise injection.

use std::{hash::Hash, num::NonZeroUsize, sync::Arc};

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{Span, field, info, instrument};

use crate::{
    Result,
    builder::{ConstraintSelectorBuilder, QueryMethod, SelectionOptions},
    constraint::{Constraint, ConstraintSet},
    datasource::DataSource,
    error::SelectionError,
    oracle::{LabelOracle, Oracle},
    pairwise::{PairwiseDistances, expand_links},
    strategy::{
        ActiveClassDiscovery, FarthestFirst, MinimaxFarthestFirst, QueryPair, RandomPairs,
    },
};

/// Entry point for selecting labelled constraints.
///
/// # Examples
/// ```
/// use robustclust_core::{ConstraintSelectorBuilder, DenseMatrix, QueryMethod};
///
/// let data = DenseMatrix::try_new(
///     "blobs",
///     vec![vec![0.0], vec![0.1], vec![0.2], vec![9.0], vec![9.1], vec![9.2]],
/// )?;
/// let labels = [0, 0, 0, 1, 1, 1];
///
/// let selector = ConstraintSelectorBuilder::new()
///     .with_method(QueryMethod::FarthestFirst)
///     .with_budget(6)
///     .with_seed(1)
///     .build()?;
/// let set = selector.select(&data, &labels)?;
/// assert_eq!(set.len(), 6);
/// assert_eq!(set.neighbourhoods().map(|n| n.count()), Some(2));
/// for [left, right, link] in set.rows() {
///     assert_eq!(link == 1, labels[left] == labels[right]);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConstraintSelector {
    method: QueryMethod,
    budget: Option<usize>,
    error_rate: f64,
    min_merge_size: Option<NonZeroUsize>,
    seed: Option<u64>,
}

impl ConstraintSelector {
    pub(crate) fn new(
        method: QueryMethod,
        budget: Option<usize>,
        error_rate: f64,
        min_merge_size: Option<NonZeroUsize>,
        seed: Option<u64>,
    ) -> Self {
        Self {
            method,
            budget,
            error_rate,
            min_merge_size,
            seed,
        }
    }

    /// Query method applied by [`Self::select`].
    #[rustfmt::skip]
    #[must_use]
    pub fn method(&self) -> QueryMethod { self.method }

    /// Explicit budget; `None` means half the dataset.
    #[rustfmt::skip]
    #[must_use]
    pub fn budget(&self) -> Option<usize> { self.budget }

    /// Probability of flipping each answer.
    #[rustfmt::skip]
    #[must_use]
    pub fn error_rate(&self) -> f64 { self.error_rate }

    /// Smallest smaller side of a merge queried by active class discovery.
    #[rustfmt::skip]
    #[must_use]
    pub fn min_merge_size(&self) -> Option<NonZeroUsize> { self.min_merge_size }

    /// Seed for the random source; entropy when unset.
    #[rustfmt::skip]
    #[must_use]
    pub fn seed(&self) -> Option<u64> { self.seed }

    /// Budget applied to a dataset of `points` items.
    #[must_use]
    pub fn budget_for(&self, points: usize) -> usize {
        self.budget.unwrap_or(points / 2)
    }

    /// Selects constraints with a random source seeded from the configured
    /// seed, or from entropy when none is set.
    ///
    /// # Errors
    /// See [`Self::select_with_rng`].
    pub fn select<D, L>(&self, source: &D, labels: &[L]) -> Result<ConstraintSet>
    where
        D: DataSource + ?Sized,
        L: Eq + Hash,
    {
        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        self.select_with_rng(source, labels, &mut rng)
    }

    /// Selects constraints, drawing all randomness from `rng`.
    ///
    /// The result always holds exactly the budgeted number of constraints.
    ///
    /// # Errors
    /// Returns [`SelectionError::LabelCountMismatch`] when `labels` does not
    /// cover the source, [`SelectionError::TooFewPoints`] for fewer than two
    /// items, [`SelectionError::SingleClass`] when `labels` holds one class,
    /// [`SelectionError::DataSource`] when distances cannot be computed, and
    /// [`SelectionError::Hierarchy`] when the merge tree cannot be built.
    #[instrument(
        name = "core.select",
        err,
        skip(self, source, labels, rng),
        fields(
            data_source = %source.name(),
            points = source.len(),
            method = %self.method,
            budget = field::Empty,
        ),
    )]
    pub fn select_with_rng<D, L, R>(
        &self,
        source: &D,
        labels: &[L],
        rng: &mut R,
    ) -> Result<ConstraintSet>
    where
        D: DataSource + ?Sized,
        L: Eq + Hash,
        R: Rng + ?Sized,
    {
        let points = source.len();
        let oracle = LabelOracle::new(labels);
        let classes = validate(source, &oracle)?;
        let budget = self.budget_for(points);
        Span::current().record("budget", budget);

        let mut plan = match self.method {
            QueryMethod::Random => RandomPairs.select(points, budget, rng),
            QueryMethod::FarthestFirst => FarthestFirst::new()
                .with_class_count(classes)
                .select(&distances(source)?, &oracle, budget, rng),
            QueryMethod::MinimaxFarthestFirst => MinimaxFarthestFirst::new()
                .with_class_count(classes)
                .select(&distances(source)?, &oracle, budget, rng),
            QueryMethod::ActiveClassDiscovery => {
                let mut acd = ActiveClassDiscovery::new();
                if let Some(size) = self.min_merge_size {
                    acd = acd.with_min_merge_size(size);
                }
                acd.select(&distances(source)?, budget, rng)?
            }
        };
        plan.pad(points, budget, rng);

        let structured = plan.structured();
        let (pairs, neighbourhoods) = plan.into_parts();
        let (constraints, flipped) = answer_with_noise(&pairs, &oracle, self.error_rate, rng);
        let links = neighbourhoods.as_ref().map(expand_links);
        info!(
            constraints = constraints.len(),
            structured,
            flipped,
            neighbourhoods = neighbourhoods.as_ref().map(|n| n.count()),
            "constraint selection completed"
        );
        Ok(ConstraintSet::new(
            constraints,
            structured,
            flipped,
            neighbourhoods,
            links,
        ))
    }
}

/// Checks the inputs and returns the number of classes in `oracle`.
fn validate<D, L>(source: &D, oracle: &LabelOracle<'_, L>) -> Result<usize>
where
    D: DataSource + ?Sized,
    L: Eq + Hash,
{
    let points = source.len();
    if oracle.len() != points {
        return Err(SelectionError::LabelCountMismatch {
            data_source: Arc::from(source.name()),
            points,
            labels: oracle.len(),
        });
    }
    if points < 2 {
        return Err(SelectionError::TooFewPoints {
            data_source: Arc::from(source.name()),
            points,
        });
    }
    let classes = oracle.class_count();
    if classes < 2 {
        return Err(SelectionError::SingleClass {
            data_source: Arc::from(source.name()),
        });
    }
    Ok(classes)
}

fn distances<D: DataSource + ?Sized>(source: &D) -> Result<PairwiseDistances> {
    PairwiseDistances::from_source(source).map_err(|error| SelectionError::DataSource {
        data_source: Arc::from(source.name()),
        error,
    })
}

/// Labels every pair through `oracle` and flips each answer independently
/// with probability `error_rate`. Returns the constraints and the number of
/// flips.
fn answer_with_noise<O, R>(
    pairs: &[QueryPair],
    oracle: &O,
    error_rate: f64,
    rng: &mut R,
) -> (Vec<Constraint>, usize)
where
    O: Oracle + ?Sized,
    R: Rng + ?Sized,
{
    let mut flipped = 0;
    let constraints = pairs
        .iter()
        .map(|pair| {
            let truth = oracle.answer(pair.left, pair.right);
            let flip = rng.gen_bool(error_rate);
            flipped += usize::from(flip);
            Constraint::new(pair.left, pair.right, truth != flip)
        })
        .collect();
    (constraints, flipped)
}

/// Selects `options.budget` labelled constraints from `source` with the
/// method named `method`.
///
/// The method name is checked before any other work.
///
/// # Errors
/// Returns [`SelectionError::UnknownMethod`] for a name other than `rand`,
/// `ffqs`, `mmffqs` or `acd`, [`SelectionError::InvalidErrorRate`] for a
/// rate outside `[0, 1]`, and any error of
/// [`ConstraintSelector::select_with_rng`].
///
/// # Examples
/// ```
/// use robustclust_core::{DenseMatrix, SelectionOptions, get_constraints};
///
/// let data = DenseMatrix::try_new("pairs", vec![vec![0.0], vec![1.0], vec![5.0], vec![6.0]])?;
/// let options = SelectionOptions {
///     budget: Some(3),
///     seed: Some(9),
///     ..SelectionOptions::default()
/// };
/// let set = get_constraints(&data, &["a", "a", "b", "b"], "acd", options)?;
/// assert_eq!(set.len(), 3);
/// assert!(set.link_matrix().is_none());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn get_constraints<D, L>(
    source: &D,
    labels: &[L],
    method: &str,
    options: SelectionOptions,
) -> Result<ConstraintSet>
where
    D: DataSource + ?Sized,
    L: Eq + Hash,
{
    let method: QueryMethod = method.parse()?;
    ConstraintSelectorBuilder::from_options(method, options)
        .build()?
        .select(source, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DataSourceError, DataSourceErrorCode, SelectionErrorCode};
    use crate::test_utils::CountingSource;
    use rstest::{fixture, rstest};
    use robustclust_test_support::tracing::RecordingLayer;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[fixture]
    fn blobs() -> CountingSource {
        CountingSource::new(
            vec![0.0, 0.3, 0.6, 40.0, 40.3, 40.6],
            Arc::new(AtomicUsize::new(0)),
        )
    }

    const TRUTH: [u8; 6] = [0, 0, 0, 1, 1, 1];

    fn selector(method: QueryMethod) -> ConstraintSelectorBuilder {
        ConstraintSelectorBuilder::new().with_method(method).with_seed(17)
    }

    #[test]
    fn built_selector_exposes_its_configuration() {
        let selector = selector(QueryMethod::ActiveClassDiscovery)
            .with_min_merge_size(2)
            .build()
            .expect("valid configuration");
        assert_eq!(selector.min_merge_size().map(NonZeroUsize::get), Some(2));
        assert_eq!(selector.seed(), Some(17));
        assert_eq!(selector.budget(), None);
        assert_eq!(selector.budget_for(9), 4);
    }

    #[rstest]
    fn default_budget_is_half_the_dataset(blobs: CountingSource) {
        for method in QueryMethod::ALL {
            let set = selector(method)
                .build()
                .expect("valid configuration")
                .select(&blobs, &TRUTH)
                .expect("selection succeeds");
            assert_eq!(set.len(), 3, "{method}");
        }
    }

    #[rstest]
    fn random_selection_computes_no_distances(blobs: CountingSource) {
        let calls = Arc::clone(blobs.calls());
        selector(QueryMethod::Random)
            .with_budget(10)
            .build()
            .expect("valid configuration")
            .select(&blobs, &TRUTH)
            .expect("selection succeeds");
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[rstest]
    #[case(QueryMethod::Random, false)]
    #[case(QueryMethod::FarthestFirst, true)]
    #[case(QueryMethod::MinimaxFarthestFirst, true)]
    #[case(QueryMethod::ActiveClassDiscovery, false)]
    fn link_matrix_only_for_neighbourhood_methods(
        blobs: CountingSource,
        #[case] method: QueryMethod,
        #[case] expected: bool,
    ) {
        let set = selector(method)
            .with_budget(8)
            .build()
            .expect("valid configuration")
            .select(&blobs, &TRUTH)
            .expect("selection succeeds");
        assert_eq!(set.link_matrix().is_some(), expected);
        assert_eq!(set.len(), 8);
        if let Some(links) = set.link_matrix() {
            assert_eq!(links.points(), 6);
        }
    }

    #[rstest]
    fn validation_rejects_degenerate_inputs(blobs: CountingSource) {
        let run = |source: &CountingSource, labels: &[u8]| {
            selector(QueryMethod::FarthestFirst)
                .build()
                .expect("valid configuration")
                .select(source, labels)
                .expect_err("input is degenerate")
                .code()
        };
        assert_eq!(run(&blobs, &TRUTH[..5]), SelectionErrorCode::LabelCountMismatch);
        assert_eq!(run(&blobs, &[4; 6]), SelectionErrorCode::SingleClass);
        let single = CountingSource::new(vec![1.0], Arc::new(AtomicUsize::new(0)));
        assert_eq!(run(&single, &[0]), SelectionErrorCode::TooFewPoints);
    }

    #[rstest]
    fn distance_failures_are_wrapped(blobs: CountingSource) {
        struct Broken(CountingSource);

        impl DataSource for Broken {
            fn len(&self) -> usize {
                self.0.len()
            }

            fn name(&self) -> &str {
                "broken"
            }

            fn distance(
                &self,
                _left: usize,
                right: usize,
            ) -> core::result::Result<f32, DataSourceError> {
                Err(DataSourceError::OutOfBounds { index: right })
            }
        }

        let err = selector(QueryMethod::ActiveClassDiscovery)
            .build()
            .expect("valid configuration")
            .select(&Broken(blobs), &TRUTH)
            .expect_err("distances fail");
        assert_eq!(err.code(), SelectionErrorCode::DataSourceFailure);
        assert_eq!(err.data_source_code(), Some(DataSourceErrorCode::OutOfBounds));
    }

    #[test]
    fn unknown_method_fails_before_touching_the_source() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingSource::new(vec![0.0, 1.0], Arc::clone(&calls));
        let err = get_constraints(&source, &[0, 1], "spectral", SelectionOptions::default())
            .expect_err("unknown method");
        assert_eq!(err.code(), SelectionErrorCode::UnknownMethod);
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    fn noise_extremes_keep_or_invert_every_answer(blobs: CountingSource, #[case] rate: f64) {
        for method in QueryMethod::ALL {
            let set = selector(method)
                .with_budget(12)
                .with_error_rate(rate)
                .build()
                .expect("valid configuration")
                .select(&blobs, &TRUTH)
                .expect("selection succeeds");
            let inverted = rate == 1.0;
            for constraint in set.constraints() {
                let truth = TRUTH[constraint.left] == TRUTH[constraint.right];
                assert_eq!(constraint.link, truth != inverted, "{method}");
            }
            assert_eq!(set.flipped(), if inverted { 12 } else { 0 });
        }
    }

    #[test]
    fn answer_with_noise_flips_only_sampled_rows() {
        let pairs = [QueryPair::new(0, 1), QueryPair::new(0, 2), QueryPair::new(1, 2)];
        let truth = [0, 0, 1];
        let oracle = LabelOracle::new(&truth);
        let mut rng = SmallRng::seed_from_u64(0);
        let (constraints, flipped) = answer_with_noise(&pairs, &oracle, 0.5, &mut rng);
        let changed = constraints
            .iter()
            .filter(|c| c.link != oracle.answer(c.left, c.right))
            .count();
        assert_eq!(changed, flipped);
    }

    #[rstest]
    fn selection_span_records_resolved_budget(blobs: CountingSource) {
        let (result, layer) = RecordingLayer::capture(|| {
            selector(QueryMethod::MinimaxFarthestFirst)
                .build()
                .expect("valid configuration")
                .select(&blobs, &TRUTH)
        });
        result.expect("selection succeeds");
        let span = layer.span("core.select").expect("select span recorded");
        assert_eq!(span.fields.get("budget").map(String::as_str), Some("3"));
        assert_eq!(span.fields.get("method").map(String::as_str), Some("mmffqs"));
        assert!(layer.span("core.mmffqs").is_some());
        assert!(layer.span("core.ffqs").is_some());
    }
}
