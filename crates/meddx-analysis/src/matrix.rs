use meddx_model::ObserverId;
use meddx_stats::StatsError;
use serde::Serialize;

/// Agreement between two observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairCoefficient {
    Value(f64),
    /// The coefficient is undefined for this pair's data (e.g. both observers
    /// used a single identical value). Not the same as zero agreement.
    Undefined,
}

impl PairCoefficient {
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Undefined => None,
        }
    }

    /// Maps degenerate statistics to [`Self::Undefined`] and passes every
    /// other error on.
    pub(crate) fn from_result(result: Result<f64, StatsError>) -> Result<Self, StatsError> {
        match result {
            Ok(v) => Ok(Self::Value(v)),
            Err(e) if e.is_degenerate() => Ok(Self::Undefined),
            Err(e) => Err(e),
        }
    }
}

/// Symmetric observer-by-observer matrix; the diagonal is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObserverMatrix {
    observers: Vec<ObserverId>,
    values: Vec<Vec<Option<PairCoefficient>>>,
}

impl ObserverMatrix {
    /// Evaluates `coefficient(i, j)` once per unordered pair `i < j` of
    /// `observers` and mirrors it.
    pub(crate) fn from_pairs<F, E>(
        observers: Vec<ObserverId>,
        mut coefficient: F,
    ) -> Result<Self, E>
    where
        F: FnMut(usize, usize) -> Result<PairCoefficient, E>,
    {
        let n = observers.len();
        let mut values = vec![vec![None; n]; n];
        for i in 0..n {
            for j in i + 1..n {
                let c = coefficient(i, j)?;
                values[i][j] = Some(c);
                values[j][i] = Some(c);
            }
        }
        Ok(Self { observers, values })
    }

    #[must_use]
    pub fn observers(&self) -> &[ObserverId] {
        &self.observers
    }

    /// Coefficient between two observers; `None` on the diagonal or for an
    /// unknown observer.
    #[must_use]
    pub fn get(&self, a: ObserverId, b: ObserverId) -> Option<PairCoefficient> {
        let i = self.observers.iter().position(|&o| o == a)?;
        let j = self.observers.iter().position(|&o| o == b)?;
        self.values[i][j]
    }

    /// Every off-diagonal cell as `(a, b, coefficient)` with `a < b`.
    pub fn pairs(&self) -> impl Iterator<Item = (ObserverId, ObserverId, PairCoefficient)> + '_ {
        self.observers.iter().enumerate().flat_map(move |(i, &a)| {
            self.observers[i + 1..]
                .iter()
                .enumerate()
                .filter_map(move |(offset, &b)| Some((a, b, self.values[i][i + 1 + offset]?)))
        })
    }
}
