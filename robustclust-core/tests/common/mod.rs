use robustclust_core::{DataSource, DataSourceError, DenseMatrix};

/// One-dimensional points compared by absolute difference.
#[derive(Clone)]
pub struct Line {
    data: Vec<f32>,
}

impl Line {
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }
}

impl DataSource for Line {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn name(&self) -> &str {
        "line"
    }

    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
        let a = self
            .data
            .get(i)
            .ok_or(DataSourceError::OutOfBounds { index: i })?;
        let b = self
            .data
            .get(j)
            .ok_or(DataSourceError::OutOfBounds { index: j })?;
        Ok((a - b).abs())
    }
}

/// `groups` well-separated square grids of `per_group` points in the plane,
/// with ground-truth labels.
#[must_use]
pub fn separated_groups(groups: usize, per_group: usize) -> (DenseMatrix, Vec<usize>) {
    let mut rows = Vec::with_capacity(groups * per_group);
    let mut labels = Vec::with_capacity(groups * per_group);
    for group in 0..groups {
        let centre = 100.0 * group as f32;
        for member in 0..per_group {
            let offset = 0.1 * member as f32;
            rows.push(vec![centre + offset, centre - offset]);
            labels.push(group);
        }
    }
    let matrix = DenseMatrix::try_new("separated", rows).expect("rows are uniform");
    (matrix, labels)
}

/// Ground-truth relation of a constraint row.
#[must_use]
pub fn same_group(labels: &[usize], row: [usize; 3]) -> bool {
    labels[row[0]] == labels[row[1]]
}
