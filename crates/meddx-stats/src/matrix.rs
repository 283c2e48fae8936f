//! Dense persons-by-items score matrix used by the internal-consistency
//! coefficients.
//!
//! Rows are the measured "persons" (in an intra-observer study: the paired
//! questions), columns are the "items" (the original and repeated runs).

use crate::{
    StatsError,
    descriptive::{self, Ddof},
};

/// Rectangular, finite score matrix stored row-major.
///
/// # Examples
///
/// ```
/// # use meddx_stats::matrix::ScoreMatrix;
/// let m = ScoreMatrix::from_columns(&[vec![1.0, 2.0, 3.0], vec![1.0, 3.0, 3.0]]).unwrap();
/// assert_eq!(m.num_rows(), 3);
/// assert_eq!(m.num_columns(), 2);
/// assert_eq!(m.row_sums(), vec![2.0, 5.0, 6.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    rows: usize,
    columns: usize,
    values: Vec<f64>,
}

impl ScoreMatrix {
    /// Builds a matrix from person rows.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, StatsError>
    where
        R: AsRef<[f64]>,
    {
        let first = rows.first().ok_or(StatsError::EmptyInput)?;
        let columns = first.as_ref().len();
        if columns == 0 {
            return Err(StatsError::EmptyInput);
        }
        let mut values = Vec::with_capacity(rows.len() * columns);
        for (row, data) in rows.iter().enumerate() {
            let data = data.as_ref();
            if data.len() != columns {
                return Err(StatsError::RaggedRows {
                    row,
                    expected: columns,
                    found: data.len(),
                });
            }
            if let Some(column) = data.iter().position(|v| !v.is_finite()) {
                return Err(StatsError::NonFiniteValue { row, column });
            }
            values.extend_from_slice(data);
        }
        Ok(Self {
            rows: rows.len(),
            columns,
            values,
        })
    }

    /// Builds a matrix from item columns, each holding one value per person.
    pub fn from_columns<C>(columns: &[C]) -> Result<Self, StatsError>
    where
        C: AsRef<[f64]>,
    {
        let first = columns.first().ok_or(StatsError::EmptyInput)?;
        let rows = first.as_ref().len();
        if let Some(column) = columns.iter().find(|c| c.as_ref().len() != rows) {
            return Err(StatsError::LengthMismatch {
                left: rows,
                right: column.as_ref().len(),
            });
        }
        let transposed = (0..rows)
            .map(|r| columns.iter().map(|c| c.as_ref()[r]).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        Self::from_rows(&transposed)
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[row * self.columns + column]
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.columns..(row + 1) * self.columns]
    }

    #[must_use]
    pub fn column(&self, column: usize) -> Vec<f64> {
        (0..self.rows).map(|r| self.get(r, column)).collect()
    }

    /// Per-person total over all items.
    #[must_use]
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.rows).map(|r| self.row(r).iter().sum()).collect()
    }

    /// Item covariance matrix (`n - 1` denominator).
    pub fn covariance(&self) -> Result<Covariance, StatsError> {
        let columns = (0..self.columns)
            .map(|c| self.column(c))
            .collect::<Vec<_>>();
        let mut values = vec![0.0; self.columns * self.columns];
        for i in 0..self.columns {
            for j in i..self.columns {
                let cov = descriptive::covariance(&columns[i], &columns[j], Ddof::Sample)?;
                values[i * self.columns + j] = cov;
                values[j * self.columns + i] = cov;
            }
        }
        Ok(Covariance {
            size: self.columns,
            values,
        })
    }
}

/// Symmetric item covariance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Covariance {
    size: usize,
    values: Vec<f64>,
}

impl Covariance {
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    /// Sum of item variances.
    #[must_use]
    pub fn trace(&self) -> f64 {
        (0..self.size).map(|i| self.get(i, i)).sum()
    }

    /// Variance of the total score, i.e. the sum of every entry.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Variance of the total score restricted to a subset of items.
    #[must_use]
    pub fn total_of(&self, items: &[usize]) -> f64 {
        items
            .iter()
            .flat_map(|&i| items.iter().map(move |&j| (i, j)))
            .map(|(i, j)| self.get(i, j))
            .sum()
    }

    /// Sum of squared covariances of item `j` with every other item.
    #[must_use]
    pub fn off_diagonal_squares_of(&self, j: usize) -> f64 {
        (0..self.size)
            .filter(|&i| i != j)
            .map(|i| self.get(i, j).powi(2))
            .sum()
    }

    /// Sum of squared off-diagonal covariances over the whole matrix.
    #[must_use]
    pub fn off_diagonal_squares(&self) -> f64 {
        (0..self.size).map(|j| self.off_diagonal_squares_of(j)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rows() {
        let rows: Vec<Vec<f64>> = vec![];
        assert_eq!(ScoreMatrix::from_rows(&rows), Err(StatsError::EmptyInput));
        assert_eq!(
            ScoreMatrix::from_rows(&[Vec::<f64>::new()]),
            Err(StatsError::EmptyInput)
        );
    }

    #[test]
    fn test_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert_eq!(
            ScoreMatrix::from_rows(&rows),
            Err(StatsError::RaggedRows {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_non_finite_value() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, f64::NAN]];
        assert_eq!(
            ScoreMatrix::from_rows(&rows),
            Err(StatsError::NonFiniteValue { row: 1, column: 1 })
        );
    }

    #[test]
    fn test_columns_and_rows_agree() {
        let by_rows = ScoreMatrix::from_rows(&[[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]).unwrap();
        let by_columns =
            ScoreMatrix::from_columns(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(by_rows, by_columns);
        assert_eq!(by_rows.column(1), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_covariance_total_matches_row_sum_variance() {
        let m = ScoreMatrix::from_rows(&[
            [2.0, 3.0, 3.0],
            [3.0, 3.0, 4.0],
            [4.0, 4.0, 3.0],
            [5.0, 4.0, 3.0],
        ])
        .unwrap();
        let cov = m.covariance().unwrap();
        let direct = descriptive::variance(&m.row_sums(), Ddof::Sample).unwrap();
        assert!((cov.total() - direct).abs() < 1e-12);
        assert!((cov.total_of(&[0, 1, 2]) - direct).abs() < 1e-12);
        assert!((cov.get(0, 1) - cov.get(1, 0)).abs() < f64::EPSILON);
    }
}
