//! Tests for the pairwise distance, affinity and link-matrix contracts.

use robustclust_core::{
    Affinities, DataSource, DataSourceErrorCode, DenseMatrix, MergeTree, Metric,
    NeighbourhoodLabels, PairwiseDistances, expand_links,
};
use rstest::rstest;

fn grid() -> DenseMatrix {
    DenseMatrix::try_new(
        "grid",
        vec![
            vec![0.0, 0.0],
            vec![3.0, 4.0],
            vec![6.0, 8.0],
            vec![0.0, 1.0],
        ],
    )
    .expect("rows are uniform")
}

#[rstest]
fn distances_match_the_metric_for_every_pair() {
    let data = grid();
    let distances = PairwiseDistances::from_source(&data).expect("finite distances");
    assert_eq!(distances.points(), 4);
    for i in 0..4 {
        for j in 0..4 {
            let expected = data.distance(i, j).expect("rows exist");
            assert!((distances.get(i, j) - expected).abs() < 1e-6);
        }
    }
}

#[rstest]
fn block_lookup_follows_row_and_column_order() {
    let distances = PairwiseDistances::from_source(&grid()).expect("finite distances");
    let block = distances.block(&[2, 0], &[1, 3, 2]);
    assert_eq!(block.shape(), (2, 3));
    assert_eq!(block.get(0, 2), Some(0.0));
    assert_eq!(block.get(1, 0), Some(5.0));
}

#[rstest]
fn affinities_decrease_with_distance() {
    let distances = PairwiseDistances::from_source(&grid()).expect("finite distances");
    let affinities = Affinities::from_distances(&distances);
    assert!(affinities.get(0, 3) > affinities.get(0, 1));
    assert!(affinities.get(0, 1) > affinities.get(0, 2));
    assert_eq!(affinities.get(2, 2), 1.0);
}

#[rstest]
fn cosine_sources_surface_kernel_errors() {
    let data = grid().with_metric(Metric::Cosine);
    let err = PairwiseDistances::from_source(&data).expect_err("origin has no direction");
    assert_eq!(err.code(), DataSourceErrorCode::Kernel);
}

#[rstest]
fn merge_tree_over_dense_rows_groups_nearby_points() {
    let distances = PairwiseDistances::from_source(&grid()).expect("finite distances");
    let tree = MergeTree::average_linkage(&distances).expect("tree builds");
    let first = tree.merges()[0];
    assert_eq!((first.left(), first.right()), (0, 3));
    assert_eq!(tree.members(tree.node_count() - 1).len(), 4);
}

#[rstest]
fn link_expansion_ignores_unassigned_points() {
    let links = expand_links(&NeighbourhoodLabels::from_raw(vec![1, 0, 1, 2]));
    assert_eq!(links.points(), 4);
    assert_eq!(links.get(0, 2), Some(1));
    assert_eq!(links.get(2, 0), Some(1));
    assert_eq!(links.get(1, 1), Some(0));
    assert_eq!(links.get(3, 3), Some(1));
    assert_eq!(links.get(0, 3), Some(0));
    assert_eq!(links.get(4, 0), None);
}
