//! Krippendorff's alpha over a raters-by-units reliability matrix with
//! missing values.
//!
//! Unlike Cohen's kappa, alpha does not require every rater to rate every
//! unit: a missing cell simply does not take part in the pairable values of
//! its unit. Units with fewer than two values are not pairable and are
//! ignored.

use serde::{Deserialize, Serialize};

use crate::{
    StatsError,
    kappa::{label_index, label_set},
};

/// Level of measurement, selecting the difference function δ².
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementLevel {
    #[default]
    Nominal,
    Ordinal,
    Interval,
    Ratio,
}

/// Computes Krippendorff's alpha.
///
/// `reliability_data[r][u]` is rater `r`'s value for unit `u`, or `None` when
/// the rater did not rate that unit. Every row must cover the same units.
///
/// α = 1 − (n − 1) · Σ o_ck δ²_ck / Σ n_c n_k δ²_ck, with `o` the coincidence
/// matrix, `n_c` its marginals and `n` the number of pairable values.
///
/// # Errors
///
/// * [`StatsError::EmptyInput`] if there are no raters or no units
/// * [`StatsError::RaggedRows`] if raters cover different numbers of units
/// * [`StatsError::NonFiniteValue`] if a present value is NaN or infinite
/// * [`StatsError::NoExpectedDisagreement`] if no unit is pairable or all
///   pairable values are equal
///
/// # Examples
///
/// ```
/// # use meddx_stats::krippendorff::{krippendorff_alpha, MeasurementLevel};
/// let data = vec![
///     vec![Some(1.0), Some(2.0), Some(3.0), None],
///     vec![Some(1.0), Some(2.0), Some(3.0), Some(3.0)],
/// ];
/// let alpha = krippendorff_alpha(&data, MeasurementLevel::Nominal).unwrap();
/// assert!((alpha - 1.0).abs() < 1e-12);
/// ```
pub fn krippendorff_alpha<R>(
    reliability_data: &[R],
    level: MeasurementLevel,
) -> Result<f64, StatsError>
where
    R: AsRef<[Option<f64>]>,
{
    let first = reliability_data.first().ok_or(StatsError::EmptyInput)?;
    let units = first.as_ref().len();
    if units == 0 {
        return Err(StatsError::EmptyInput);
    }
    for (row, rater) in reliability_data.iter().enumerate() {
        let rater = rater.as_ref();
        if rater.len() != units {
            return Err(StatsError::RaggedRows {
                row,
                expected: units,
                found: rater.len(),
            });
        }
        if let Some(column) = rater.iter().position(|v| v.is_some_and(|v| !v.is_finite())) {
            return Err(StatsError::NonFiniteValue { row, column });
        }
    }

    let unit_values = (0..units)
        .map(|u| {
            reliability_data
                .iter()
                .filter_map(|rater| rater.as_ref()[u])
                .collect::<Vec<_>>()
        })
        .filter(|values| values.len() >= 2)
        .collect::<Vec<_>>();

    let labels = label_set(unit_values.iter().flatten());
    let size = labels.len();
    let coincidences = coincidence_matrix(&unit_values, &labels);
    let marginals = (0..size)
        .map(|c| coincidences[c * size..(c + 1) * size].iter().sum::<f64>())
        .collect::<Vec<_>>();
    let n = marginals.iter().sum::<f64>();

    let mut observed = 0.0;
    let mut expected = 0.0;
    for c in 0..size {
        for k in 0..size {
            if c == k {
                continue;
            }
            let delta = difference(level, &labels, &marginals, c, k);
            observed += coincidences[c * size + k] * delta;
            expected += marginals[c] * marginals[k] * delta;
        }
    }

    if expected == 0.0 {
        return Err(StatsError::NoExpectedDisagreement);
    }
    Ok(1.0 - (n - 1.0) * observed / expected)
}

/// Coincidence matrix: every ordered pair of values within a unit adds
/// `1 / (m_u - 1)`.
#[expect(clippy::cast_precision_loss)]
fn coincidence_matrix(unit_values: &[Vec<f64>], labels: &[f64]) -> Vec<f64> {
    let size = labels.len();
    let mut coincidences = vec![0.0; size * size];
    let mut counts = vec![0.0; size];
    for values in unit_values {
        counts.fill(0.0);
        for &v in values {
            counts[label_index(labels, v)] += 1.0;
        }
        let pairable = (values.len() - 1) as f64;
        for c in 0..size {
            if counts[c] == 0.0 {
                continue;
            }
            for k in 0..size {
                let pairs = if c == k {
                    counts[c] * (counts[c] - 1.0)
                } else {
                    counts[c] * counts[k]
                };
                coincidences[c * size + k] += pairs / pairable;
            }
        }
    }
    coincidences
}

fn difference(
    level: MeasurementLevel,
    labels: &[f64],
    marginals: &[f64],
    c: usize,
    k: usize,
) -> f64 {
    match level {
        MeasurementLevel::Nominal => 1.0,
        MeasurementLevel::Ordinal => {
            let (lo, hi) = (c.min(k), c.max(k));
            let between = marginals[lo..=hi].iter().sum::<f64>();
            (between - (marginals[c] + marginals[k]) / 2.0).powi(2)
        }
        MeasurementLevel::Interval => (labels[c] - labels[k]).powi(2),
        MeasurementLevel::Ratio => {
            let sum = labels[c] + labels[k];
            if sum == 0.0 {
                0.0
            } else {
                ((labels[c] - labels[k]) / sum).powi(2)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    /// Krippendorff (2011), "Computing Krippendorff's Alpha-Reliability",
    /// example C: 4 observers, 12 units, values 1..5, missing data.
    fn reference_data() -> Vec<Vec<Option<f64>>> {
        let rows: [[Option<u8>; 12]; 4] = [
            [
                Some(1), Some(2), Some(3), Some(3), Some(2), Some(1), Some(4), Some(1), Some(2),
                None, None, None,
            ],
            [
                Some(1), Some(2), Some(3), Some(3), Some(2), Some(2), Some(4), Some(1), Some(2),
                Some(5), None, Some(3),
            ],
            [
                None, Some(3), Some(3), Some(3), Some(2), Some(3), Some(4), Some(2), Some(2),
                Some(5), Some(1), None,
            ],
            [
                Some(1), Some(2), Some(3), Some(3), Some(2), Some(4), Some(4), Some(1), Some(2),
                Some(5), Some(1), None,
            ],
        ];
        rows.iter()
            .map(|row| row.iter().map(|v| v.map(f64::from)).collect())
            .collect()
    }

    #[test]
    fn test_reference_nominal() {
        let alpha = krippendorff_alpha(&reference_data(), MeasurementLevel::Nominal).unwrap();
        assert_close(alpha, 0.743, 1e-3);
    }

    #[test]
    fn test_reference_interval() {
        let alpha = krippendorff_alpha(&reference_data(), MeasurementLevel::Interval).unwrap();
        assert_close(alpha, 0.849, 1e-3);
    }

    #[test]
    fn test_reference_ordinal() {
        let alpha = krippendorff_alpha(&reference_data(), MeasurementLevel::Ordinal).unwrap();
        assert_close(alpha, 0.815, 1e-3);
    }

    #[test]
    fn test_reference_ratio() {
        let alpha = krippendorff_alpha(&reference_data(), MeasurementLevel::Ratio).unwrap();
        assert_close(alpha, 0.797, 1e-3);
    }

    #[test]
    fn test_unequal_coverage_is_accepted() {
        let data = vec![
            vec![Some(1.0), Some(2.0), None, None, Some(1.0)],
            vec![Some(1.0), Some(2.0), Some(2.0), Some(1.0), None],
            vec![None, Some(2.0), Some(2.0), Some(2.0), Some(1.0)],
        ];
        let alpha = krippendorff_alpha(&data, MeasurementLevel::Nominal).unwrap();
        assert!(alpha > 0.0 && alpha < 1.0);
    }

    #[test]
    fn test_single_value_domain_is_degenerate() {
        let data = vec![vec![Some(4.0); 5], vec![Some(4.0); 5]];
        assert_eq!(
            krippendorff_alpha(&data, MeasurementLevel::Nominal),
            Err(StatsError::NoExpectedDisagreement)
        );
    }

    #[test]
    fn test_no_pairable_unit_is_degenerate() {
        let data = vec![vec![Some(1.0), None], vec![None, Some(2.0)]];
        assert_eq!(
            krippendorff_alpha(&data, MeasurementLevel::Nominal),
            Err(StatsError::NoExpectedDisagreement)
        );
    }

    #[test]
    fn test_ragged_rows() {
        let data = vec![vec![Some(1.0), None], vec![Some(1.0)]];
        assert_eq!(
            krippendorff_alpha(&data, MeasurementLevel::Nominal),
            Err(StatsError::RaggedRows {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }
}
