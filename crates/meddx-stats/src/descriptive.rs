//! Location and dispersion measures over `f64` samples.

use crate::StatsError;

/// Denominator convention for variance and covariance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ddof {
    /// Divide by `n`.
    Population,
    /// Divide by `n - 1`.
    Sample,
}

impl Ddof {
    #[expect(clippy::cast_precision_loss)]
    fn denominator(self, n: usize) -> Result<f64, StatsError> {
        match self {
            Self::Population if n >= 1 => Ok(n as f64),
            Self::Sample if n >= 2 => Ok((n - 1) as f64),
            Self::Population => Err(StatsError::EmptyInput),
            Self::Sample => Err(StatsError::TooFewObservations {
                required: 2,
                found: n,
            }),
        }
    }
}

/// Descriptive statistics summarizing a dataset.
///
/// # Examples
///
/// ```
/// # use meddx_stats::descriptive::DescriptiveStats;
/// let stats = DescriptiveStats::new([4.0, 1.0, 3.0, 2.0]).unwrap();
/// assert_eq!(stats.count, 4);
/// assert_eq!(stats.min, 1.0);
/// assert_eq!(stats.max, 4.0);
/// assert_eq!(stats.mean, 2.5);
/// assert_eq!(stats.median, 2.5);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Midpoint of the two central values for even-sized samples.
    pub median: f64,
    /// Sample standard deviation (`n - 1` denominator); zero for a single value.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// Returns `None` if the dataset is empty or contains a non-finite value.
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        if !values.iter().all(|v| v.is_finite()) {
            return None;
        }
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from values sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let mean = mean(sorted_values)?;
        let median = if count % 2 == 0 {
            f64::midpoint(sorted_values[count / 2 - 1], sorted_values[count / 2])
        } else {
            sorted_values[count / 2]
        };
        let std_dev = variance(sorted_values, Ddof::Sample).map_or(0.0, f64::sqrt);

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            std_dev,
        })
    }
}

/// Arithmetic mean, or `None` for an empty slice.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Variance of `values` under the given denominator convention.
///
/// ```
/// # use meddx_stats::descriptive::{variance, Ddof};
/// let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert_eq!(variance(&values, Ddof::Population).unwrap(), 4.0);
/// ```
pub fn variance(values: &[f64], ddof: Ddof) -> Result<f64, StatsError> {
    covariance(values, values, ddof)
}

/// Covariance between two equally long samples.
pub fn covariance(a: &[f64], b: &[f64], ddof: Ddof) -> Result<f64, StatsError> {
    if a.len() != b.len() {
        return Err(StatsError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let denominator = ddof.denominator(a.len())?;
    let (Some(mean_a), Some(mean_b)) = (mean(a), mean(b)) else {
        return Err(StatsError::EmptyInput);
    };
    let cross = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum::<f64>();
    Ok(cross / denominator)
}
