use std::sync::Arc;

use robustclust_core::{
    DataSourceError, DataSourceErrorCode, DistanceError, HierarchyError, HierarchyErrorCode,
    SelectionError, SelectionErrorCode, VectorKind,
};
use rstest::rstest;

#[rstest]
#[case(DataSourceError::OutOfBounds { index: 0 }, DataSourceErrorCode::OutOfBounds)]
#[case(
    DataSourceError::DimensionMismatch { left: 1, right: 2 },
    DataSourceErrorCode::DimensionMismatch,
)]
#[case(DataSourceError::EmptyData, DataSourceErrorCode::EmptyData)]
#[case(DataSourceError::ZeroDimension, DataSourceErrorCode::ZeroDimension)]
#[case(
    DataSourceError::InvalidDistance { left: 0, right: 1, value: -1.0 },
    DataSourceErrorCode::InvalidDistance,
)]
#[case(
    DataSourceError::Kernel {
        left: 0,
        right: 1,
        error: DistanceError::ZeroMagnitude { which: VectorKind::Left },
    },
    DataSourceErrorCode::Kernel,
)]
fn returns_expected_data_source_code(
    #[case] error: DataSourceError,
    #[case] expected: DataSourceErrorCode,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().to_string(), expected.as_str());
}

#[rstest]
#[case(
    SelectionError::UnknownMethod { name: Arc::from("kmeans") },
    SelectionErrorCode::UnknownMethod,
    None,
)]
#[case(
    SelectionError::InvalidErrorRate { got: 2.0 },
    SelectionErrorCode::InvalidErrorRate,
    None,
)]
#[case(
    SelectionError::LabelCountMismatch { data_source: Arc::from("src"), points: 3, labels: 2 },
    SelectionErrorCode::LabelCountMismatch,
    None,
)]
#[case(
    SelectionError::TooFewPoints { data_source: Arc::from("src"), points: 1 },
    SelectionErrorCode::TooFewPoints,
    None,
)]
#[case(
    SelectionError::SingleClass { data_source: Arc::from("src") },
    SelectionErrorCode::SingleClass,
    None,
)]
#[case(
    SelectionError::DataSource {
        data_source: Arc::from("src"),
        error: DataSourceError::EmptyData,
    },
    SelectionErrorCode::DataSourceFailure,
    Some(DataSourceErrorCode::EmptyData),
)]
#[case(
    SelectionError::Hierarchy(HierarchyError::EmptyDataset),
    SelectionErrorCode::HierarchyFailure,
    None,
)]
fn returns_expected_selection_code(
    #[case] error: SelectionError,
    #[case] expected: SelectionErrorCode,
    #[case] inner: Option<DataSourceErrorCode>,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.data_source_code(), inner);
}

#[rstest]
fn codes_are_stable_strings() {
    assert_eq!(
        SelectionErrorCode::UnknownMethod.as_str(),
        "SELECTION_UNKNOWN_METHOD"
    );
    assert_eq!(
        DataSourceErrorCode::Kernel.as_str(),
        "DATA_SOURCE_KERNEL_FAILURE"
    );
    assert_eq!(
        HierarchyError::EmptyDataset.code(),
        HierarchyErrorCode::EmptyDataset
    );
    assert_eq!(
        HierarchyErrorCode::InvalidHeight.to_string(),
        "HIERARCHY_INVALID_HEIGHT"
    );
}

#[rstest]
fn hierarchy_errors_convert_into_selection_errors() {
    let err: SelectionError = HierarchyError::EmptyDataset.into();
    assert_eq!(err.code(), SelectionErrorCode::HierarchyFailure);
    assert!(err.to_string().contains("zero points"));
}
