/// Failure modes shared by every coefficient in this crate.
///
/// `ZeroVariance` and `NoExpectedDisagreement` describe data for which a
/// coefficient is mathematically undefined. They are kept apart from the
/// structural errors so that callers can tell "no agreement" (a valid `0.0`)
/// from "agreement cannot be measured on this data".
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    #[display("input contains no observations")]
    EmptyInput,
    #[display("paired inputs differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
    #[display("row {row} has {found} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("non-finite value at row {row}, column {column}")]
    NonFiniteValue { row: usize, column: usize },
    #[display("at least {required} items are required, found {found}")]
    TooFewItems { required: usize, found: usize },
    #[display("at least {required} observations are required, found {found}")]
    TooFewObservations { required: usize, found: usize },
    #[display("total score variance is zero")]
    ZeroVariance,
    #[display("expected disagreement is zero")]
    NoExpectedDisagreement,
    #[display("probability {value} is outside the open interval (0, 1)")]
    InvalidProbability { value: f64 },
    #[display("degrees of freedom must be positive and finite")]
    InvalidDegreesOfFreedom,
}

impl StatsError {
    /// Returns `true` when the error means "coefficient undefined for this data"
    /// rather than "input is malformed".
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::ZeroVariance | Self::NoExpectedDisagreement)
    }
}
