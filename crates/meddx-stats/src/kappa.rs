//! Cohen's kappa for two raters over the same sequence of items.

use serde::{Deserialize, Serialize};

use crate::StatsError;

/// Disagreement weights applied to the confusion matrix.
///
/// Label distances are measured on the position of each label in the sorted
/// union of both raters' values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KappaWeighting {
    /// Every disagreement weighs 1.
    #[default]
    Unweighted,
    /// Weight grows with label distance `|i - j|`.
    Linear,
    /// Weight grows with squared label distance `(i - j)^2`.
    Quadratic,
}

impl KappaWeighting {
    #[expect(clippy::cast_precision_loss)]
    fn weight(self, i: usize, j: usize) -> f64 {
        let distance = i.abs_diff(j) as f64;
        match self {
            Self::Unweighted => {
                if i == j {
                    0.0
                } else {
                    1.0
                }
            }
            Self::Linear => distance,
            Self::Quadratic => distance * distance,
        }
    }
}

/// Sorted, de-duplicated label set. `-0.0` is folded onto `0.0`.
pub(crate) fn label_set<'a, I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let mut labels = values.into_iter().map(|v| v + 0.0).collect::<Vec<_>>();
    labels.sort_by(f64::total_cmp);
    labels.dedup();
    labels
}

pub(crate) fn label_index(labels: &[f64], value: f64) -> usize {
    let value = value + 0.0;
    labels
        .binary_search_by(|probe| probe.total_cmp(&value))
        .unwrap_or_else(|_| unreachable!("value {value} missing from its own label set"))
}

/// Computes Cohen's kappa between two raters.
///
/// `rater_a[i]` and `rater_b[i]` must describe the same item; the slices are
/// never realigned.
///
/// κ = 1 − Σ wᵢⱼ·Oᵢⱼ / Σ wᵢⱼ·Eᵢⱼ, where O is the observed confusion matrix and
/// E the matrix expected from the raters' marginals.
///
/// # Errors
///
/// * [`StatsError::LengthMismatch`] if the raters have different lengths
/// * [`StatsError::EmptyInput`] if there are no items
/// * [`StatsError::NonFiniteValue`] if any rating is NaN or infinite
/// * [`StatsError::NoExpectedDisagreement`] if chance disagreement is zero,
///   e.g. both raters used one identical label throughout
///
/// # Examples
///
/// ```
/// # use meddx_stats::kappa::{cohens_kappa, KappaWeighting};
/// let a = [1.0, 2.0, 3.0, 1.0];
/// let kappa = cohens_kappa(&a, &a, KappaWeighting::Unweighted).unwrap();
/// assert_eq!(kappa, 1.0);
/// ```
pub fn cohens_kappa(
    rater_a: &[f64],
    rater_b: &[f64],
    weighting: KappaWeighting,
) -> Result<f64, StatsError> {
    if rater_a.len() != rater_b.len() {
        return Err(StatsError::LengthMismatch {
            left: rater_a.len(),
            right: rater_b.len(),
        });
    }
    if rater_a.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    for (row, (a, b)) in rater_a.iter().zip(rater_b).enumerate() {
        if !a.is_finite() {
            return Err(StatsError::NonFiniteValue { row, column: 0 });
        }
        if !b.is_finite() {
            return Err(StatsError::NonFiniteValue { row, column: 1 });
        }
    }

    let labels = label_set(rater_a.iter().chain(rater_b));
    let size = labels.len();
    let mut confusion = vec![0.0; size * size];
    for (&a, &b) in rater_a.iter().zip(rater_b) {
        confusion[label_index(&labels, a) * size + label_index(&labels, b)] += 1.0;
    }

    let row_totals = (0..size)
        .map(|i| confusion[i * size..(i + 1) * size].iter().sum::<f64>())
        .collect::<Vec<_>>();
    let column_totals = (0..size)
        .map(|j| (0..size).map(|i| confusion[i * size + j]).sum::<f64>())
        .collect::<Vec<_>>();
    let total = row_totals.iter().sum::<f64>();

    let mut observed = 0.0;
    let mut expected = 0.0;
    for i in 0..size {
        for j in 0..size {
            let w = weighting.weight(i, j);
            observed += w * confusion[i * size + j];
            expected += w * row_totals[i] * column_totals[j] / total;
        }
    }

    if expected == 0.0 {
        return Err(StatsError::NoExpectedDisagreement);
    }
    Ok(1.0 - observed / expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_identical_ratings() {
        let a = [-3.0, 2.0, 5.0, 0.0, -1.0, 2.0, 4.0, -5.0, 3.0, 1.0];
        for weighting in [
            KappaWeighting::Unweighted,
            KappaWeighting::Linear,
            KappaWeighting::Quadratic,
        ] {
            assert_close(cohens_kappa(&a, &a, weighting).unwrap(), 1.0);
        }
    }

    #[test]
    fn test_textbook_example() {
        // 2x2 table: [[20, 5], [10, 15]] -> po = 0.7, pe = 0.5, kappa = 0.4
        let mut a = vec![];
        let mut b = vec![];
        for (x, y, n) in [(1.0, 1.0, 20), (1.0, 2.0, 5), (2.0, 1.0, 10), (2.0, 2.0, 15)] {
            a.extend(std::iter::repeat_n(x, n));
            b.extend(std::iter::repeat_n(y, n));
        }
        assert_close(
            cohens_kappa(&a, &b, KappaWeighting::Unweighted).unwrap(),
            0.4,
        );
    }

    #[test]
    fn test_symmetric_in_raters() {
        let a = [1.0, 2.0, 3.0, 3.0, 2.0, 1.0, 1.0];
        let b = [1.0, 3.0, 3.0, 2.0, 2.0, 1.0, 2.0];
        for weighting in [KappaWeighting::Unweighted, KappaWeighting::Quadratic] {
            assert_close(
                cohens_kappa(&a, &b, weighting).unwrap(),
                cohens_kappa(&b, &a, weighting).unwrap(),
            );
        }
    }

    #[test]
    fn test_linear_weights_reward_near_misses() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let near = [2.0, 1.0, 4.0, 3.0, 5.0];
        let unweighted = cohens_kappa(&a, &near, KappaWeighting::Unweighted).unwrap();
        let linear = cohens_kappa(&a, &near, KappaWeighting::Linear).unwrap();
        assert!(linear > unweighted);
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let a = [0.0, 1.0, 0.0, 1.0];
        let b = [-0.0, 1.0, 0.0, 1.0];
        assert_close(
            cohens_kappa(&a, &b, KappaWeighting::Unweighted).unwrap(),
            1.0,
        );
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            cohens_kappa(&[1.0, 2.0], &[1.0], KappaWeighting::Unweighted),
            Err(StatsError::LengthMismatch { left: 2, right: 1 })
        );
    }

    #[test]
    fn test_constant_raters_are_degenerate() {
        let a = [2.0; 6];
        let err = cohens_kappa(&a, &a, KappaWeighting::Unweighted).unwrap_err();
        assert_eq!(err, StatsError::NoExpectedDisagreement);
        assert!(err.is_degenerate());
    }

    #[test]
    fn test_chance_agreement_is_zero_not_error() {
        // Marginals 50/50 and observed agreement 50% -> kappa 0.
        let a = [1.0, 1.0, 2.0, 2.0];
        let b = [1.0, 2.0, 1.0, 2.0];
        assert_close(
            cohens_kappa(&a, &b, KappaWeighting::Unweighted).unwrap(),
            0.0,
        );
    }
}
