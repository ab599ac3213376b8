//! Average-linkage merge-tree benchmarks.
//!
//! Isolates merge-tree construction from the distance pass by building the
//! condensed matrix once per dataset.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use robustclust_benches::{
    blobs::{BlobConfig, generate_blobs},
    error::BenchSetupError,
    params::LinkageBenchParams,
};
use robustclust_core::{MergeTree, PairwiseDistances};

/// Seed used for all synthetic data generation in this benchmark.
const SEED: u64 = 7;

/// Number of blobs in every dataset.
const CLUSTERS: usize = 8;

/// Dataset sizes to benchmark.
const POINT_COUNTS: &[usize] = &[100, 500, 1_000];

fn average_linkage_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("average_linkage");
    group.sample_size(20);

    for &point_count in POINT_COUNTS {
        let (matrix, _labels) = generate_blobs(&BlobConfig::planar(point_count, CLUSTERS, SEED))?;
        let distances = PairwiseDistances::from_source(&matrix)?;
        MergeTree::average_linkage(&distances)?;

        group.bench_with_input(
            BenchmarkId::from_parameter(LinkageBenchParams { point_count }),
            &distances,
            |b, distances| {
                b.iter(|| {
                    let _tree = MergeTree::average_linkage(distances);
                });
            },
        );
    }

    group.finish();
    Ok(())
}

fn average_linkage(c: &mut Criterion) {
    if let Err(err) = average_linkage_impl(c) {
        panic!("average_linkage benchmark setup failed: {err}");
    }
}

criterion_group!(benches, average_linkage);
criterion_main!(benches);
