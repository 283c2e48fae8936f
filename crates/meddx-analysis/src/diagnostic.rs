//! Diagnostic score: a signed, certainty-weighted correctness value for one
//! diagnostic response.
//!
//! | label                        | score          |
//! |------------------------------|----------------|
//! | `not_applicable`             | `0`            |
//! | in ground truth, or `none`   | `+certainty`   |
//! | anything else                | `-certainty`   |

use meddx_model::{
    DiagnosticResponse, GroundTruth, ItemId, ObserverId, RatingRecord,
    response::{NO_FINDING, NOT_APPLICABLE},
};
use tracing::debug;

pub const CERTAINTY_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DiagnosticScoreError {
    #[display("no ground truth recorded for item {item}")]
    MissingGroundTruth { item: ItemId },
    #[display("observer {observer} gave certainty {certainty} for item {item}, expected 1..=5")]
    InvalidCertainty {
        observer: ObserverId,
        item: ItemId,
        certainty: u8,
    },
}

/// Scores one response against the ground truth of its item.
///
/// # Examples
///
/// ```
/// # use meddx_analysis::diagnostic::diagnostic_score;
/// # use meddx_model::{DiagnosticResponse, GroundTruth, ItemId, ObserverId};
/// let truth = GroundTruth::from_iter([(ItemId(1), ["nodule"])]);
/// let response = DiagnosticResponse {
///     observer: ObserverId(1),
///     item: ItemId(1),
///     label: "effusion".to_owned(),
///     certainty: 4,
///     repeat_of: None,
/// };
/// assert_eq!(diagnostic_score(&response, &truth), Ok(-4));
/// ```
pub fn diagnostic_score(
    response: &DiagnosticResponse,
    ground_truth: &GroundTruth,
) -> Result<i32, DiagnosticScoreError> {
    if !CERTAINTY_RANGE.contains(&response.certainty) {
        return Err(DiagnosticScoreError::InvalidCertainty {
            observer: response.observer,
            item: response.item,
            certainty: response.certainty,
        });
    }
    let truth = ground_truth
        .labels(response.item)
        .ok_or(DiagnosticScoreError::MissingGroundTruth {
            item: response.item,
        })?;

    let base = if response.label == NOT_APPLICABLE {
        0
    } else if response.label == NO_FINDING || truth.contains(&response.label) {
        1
    } else {
        -1
    };
    Ok(base * i32::from(response.certainty))
}

/// Converts diagnostic responses into rating records carrying the score as
/// value and the certainty as weight. Repeats keep their `repeat_of` link.
pub fn diagnostic_ratings<'a, I>(
    responses: I,
    ground_truth: &GroundTruth,
) -> Result<Vec<RatingRecord>, DiagnosticScoreError>
where
    I: IntoIterator<Item = &'a DiagnosticResponse>,
{
    let records = responses
        .into_iter()
        .map(|response| {
            let score = diagnostic_score(response, ground_truth)?;
            Ok(RatingRecord {
                observer: response.observer,
                item: response.item,
                value: f64::from(score),
                certainty: Some(response.certainty),
                repeat_of: response.repeat_of,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = records.len(), "scored diagnostic responses");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(item: u32, label: &str, certainty: u8) -> DiagnosticResponse {
        DiagnosticResponse {
            observer: ObserverId(1),
            item: ItemId(item),
            label: label.to_owned(),
            certainty,
            repeat_of: None,
        }
    }

    fn truth() -> GroundTruth {
        GroundTruth::from_iter([
            (ItemId(1), vec!["nodule", "effusion"]),
            (ItemId(2), vec![]),
        ])
    }

    #[test]
    fn test_correct_label() {
        assert_eq!(diagnostic_score(&response(1, "nodule", 3), &truth()), Ok(3));
    }

    #[test]
    fn test_wrong_label() {
        assert_eq!(diagnostic_score(&response(1, "fracture", 5), &truth()), Ok(-5));
        assert_eq!(diagnostic_score(&response(2, "nodule", 2), &truth()), Ok(-2));
    }

    #[test]
    fn test_not_applicable_scores_zero() {
        assert_eq!(diagnostic_score(&response(1, "not_applicable", 5), &truth()), Ok(0));
    }

    #[test]
    fn test_none_is_always_correct() {
        assert_eq!(diagnostic_score(&response(2, "none", 4), &truth()), Ok(4));
        assert_eq!(diagnostic_score(&response(1, "none", 1), &truth()), Ok(1));
    }

    #[test]
    fn test_missing_ground_truth_fails() {
        assert_eq!(
            diagnostic_score(&response(9, "none", 3), &truth()),
            Err(DiagnosticScoreError::MissingGroundTruth { item: ItemId(9) })
        );
    }

    #[test]
    fn test_certainty_out_of_range() {
        for certainty in [0, 6] {
            assert!(matches!(
                diagnostic_score(&response(1, "nodule", certainty), &truth()),
                Err(DiagnosticScoreError::InvalidCertainty { .. })
            ));
        }
    }

    #[test]
    fn test_ratings_keep_repeat_link() {
        let mut repeat = response(1, "effusion", 2);
        repeat.repeat_of = Some(ItemId(1));
        let records = diagnostic_ratings([&response(2, "none", 5), &repeat], &truth()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value, 5.0);
        assert_eq!(records[1].value, 2.0);
        assert_eq!(records[1].certainty, Some(2));
        assert_eq!(records[1].repeat_of, Some(ItemId(1)));
    }
}
