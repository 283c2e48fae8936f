//! Cronbach's alpha with an F-based confidence interval.

use serde::Serialize;

use crate::{StatsError, distribution::FDistribution, matrix::ScoreMatrix};

/// Two-sided confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    /// Coverage probability, e.g. `0.95`.
    pub level: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Cronbach's alpha and its confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CronbachAlpha {
    pub alpha: f64,
    pub confidence_interval: ConfidenceInterval,
}

/// Computes Cronbach's alpha over a persons-by-items matrix.
///
/// α = k/(k−1) · (1 − Σ s²ⱼ / s²ₜ), where s²ⱼ are the item variances and s²ₜ
/// the variance of the total score. The interval uses the F distribution
/// with `n − 1` and `(n − 1)(k − 1)` degrees of freedom (Feldt, 1965).
///
/// # Errors
///
/// * [`StatsError::TooFewItems`] with fewer than two items
/// * [`StatsError::TooFewObservations`] with fewer than two persons
/// * [`StatsError::ZeroVariance`] when the total score does not vary
/// * [`StatsError::InvalidProbability`] when `level` is not in (0, 1)
///
/// # Examples
///
/// ```
/// # use meddx_stats::{cronbach::cronbach_alpha, matrix::ScoreMatrix};
/// let column = [1.0, 3.0, 2.0, 5.0, 4.0];
/// let m = ScoreMatrix::from_columns(&[column, column]).unwrap();
/// let result = cronbach_alpha(&m, 0.95).unwrap();
/// assert!((result.alpha - 1.0).abs() < 1e-12);
/// ```
pub fn cronbach_alpha(matrix: &ScoreMatrix, level: f64) -> Result<CronbachAlpha, StatsError> {
    let (n, k) = check_shape(matrix)?;
    let cov = matrix.covariance()?;
    let total = cov.total();
    if total <= 0.0 {
        return Err(StatsError::ZeroVariance);
    }
    let alpha = k / (k - 1.0) * (1.0 - cov.trace() / total);

    if !(level > 0.0 && level < 1.0) {
        return Err(StatsError::InvalidProbability { value: level });
    }
    let f = FDistribution::new(n - 1.0, (n - 1.0) * (k - 1.0))?;
    let tail = (1.0 - level) / 2.0;
    let confidence_interval = ConfidenceInterval {
        level,
        lower: 1.0 - (1.0 - alpha) * f.quantile(1.0 - tail)?,
        upper: 1.0 - (1.0 - alpha) * f.quantile(tail)?,
    };

    Ok(CronbachAlpha {
        alpha,
        confidence_interval,
    })
}

/// Returns `(persons, items)` as floats after checking both are at least 2.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn check_shape(matrix: &ScoreMatrix) -> Result<(f64, f64), StatsError> {
    if matrix.num_columns() < 2 {
        return Err(StatsError::TooFewItems {
            required: 2,
            found: matrix.num_columns(),
        });
    }
    if matrix.num_rows() < 2 {
        return Err(StatsError::TooFewObservations {
            required: 2,
            found: matrix.num_rows(),
        });
    }
    Ok((matrix.num_rows() as f64, matrix.num_columns() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;

    #[test]
    fn test_reference_dataset() {
        let m = ScoreMatrix::from_rows(&testdata::FIFTEEN_BY_FOUR).unwrap();
        let result = cronbach_alpha(&m, 0.95).unwrap();
        assert!((result.alpha - testdata::FIFTEEN_BY_FOUR_ALPHA).abs() < 1e-9);
        let ci = result.confidence_interval;
        assert!(ci.lower < result.alpha && result.alpha < ci.upper);
        assert!((ci.lower - testdata::FIFTEEN_BY_FOUR_ALPHA_CI.0).abs() < 1e-6);
        assert!((ci.upper - testdata::FIFTEEN_BY_FOUR_ALPHA_CI.1).abs() < 1e-6);
    }

    #[test]
    fn test_wider_interval_for_higher_level() {
        let m = ScoreMatrix::from_rows(&testdata::FIFTEEN_BY_FOUR).unwrap();
        let narrow = cronbach_alpha(&m, 0.80).unwrap().confidence_interval;
        let wide = cronbach_alpha(&m, 0.99).unwrap().confidence_interval;
        assert!(wide.lower < narrow.lower);
        assert!(wide.upper > narrow.upper);
    }

    #[test]
    fn test_single_item_rejected() {
        let m = ScoreMatrix::from_columns(&[[1.0, 2.0, 3.0]]).unwrap();
        assert_eq!(
            cronbach_alpha(&m, 0.95),
            Err(StatsError::TooFewItems {
                required: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_constant_scores_are_degenerate() {
        let m = ScoreMatrix::from_columns(&[[2.0; 5], [2.0; 5]]).unwrap();
        assert_eq!(cronbach_alpha(&m, 0.95), Err(StatsError::ZeroVariance));
    }

    #[test]
    fn test_invalid_level() {
        let m = ScoreMatrix::from_rows(&testdata::FIFTEEN_BY_FOUR).unwrap();
        assert_eq!(
            cronbach_alpha(&m, 1.0),
            Err(StatsError::InvalidProbability { value: 1.0 })
        );
    }
}
