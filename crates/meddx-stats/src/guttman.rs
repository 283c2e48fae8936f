//! Guttman's six lower bounds to reliability (Guttman, 1945).
//!
//! All coefficients are computed from one item covariance matrix, so the
//! variance denominator convention cancels out and λ3 equals Cronbach's
//! alpha exactly.

use serde::Serialize;

use crate::{
    StatsError,
    cronbach::check_shape,
    matrix::{Covariance, ScoreMatrix},
};

/// How the split-half search behind λ4 was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SplitSearch {
    /// Every balanced split was evaluated; the value is the true maximum.
    Exhaustive { partitions: usize },
    /// Only the first-half / second-half split was evaluated; the value is a
    /// lower approximation of the true λ4.
    FixedSplit,
}

impl SplitSearch {
    #[must_use]
    pub fn is_approximate(&self) -> bool {
        matches!(self, Self::FixedSplit)
    }
}

/// λ4 together with the split that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lambda4 {
    pub value: f64,
    pub search: SplitSearch,
    /// Items in the first half of the best split found.
    pub half: Vec<usize>,
}

/// All six Guttman coefficients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuttmanLambdas {
    #[serde(rename = "L1")]
    pub lambda1: f64,
    #[serde(rename = "L2")]
    pub lambda2: f64,
    #[serde(rename = "L3")]
    pub lambda3: f64,
    #[serde(rename = "L4")]
    pub lambda4: Lambda4,
    #[serde(rename = "L5")]
    pub lambda5: f64,
    #[serde(rename = "L6")]
    pub lambda6: f64,
}

impl GuttmanLambdas {
    /// Computes λ1..λ6.
    ///
    /// λ4 is searched exhaustively when the item count does not exceed
    /// `lambda4_exhaustive_max_items`; above that only the fixed
    /// first-half / second-half split is evaluated.
    ///
    /// # Examples
    ///
    /// ```
    /// # use meddx_stats::{guttman::GuttmanLambdas, matrix::ScoreMatrix};
    /// let m = ScoreMatrix::from_rows(&[
    ///     [1.0, 1.0, 2.0],
    ///     [2.0, 3.0, 2.0],
    ///     [3.0, 3.0, 4.0],
    ///     [4.0, 5.0, 4.0],
    /// ])
    /// .unwrap();
    /// let l = GuttmanLambdas::new(&m, 12).unwrap();
    /// assert!(l.lambda1 < l.lambda3 && l.lambda3 <= l.lambda2);
    /// ```
    pub fn new(
        matrix: &ScoreMatrix,
        lambda4_exhaustive_max_items: usize,
    ) -> Result<Self, StatsError> {
        let terms = Terms::new(matrix)?;
        Ok(Self {
            lambda1: terms.lambda1(),
            lambda2: terms.lambda2(),
            lambda3: terms.lambda3(),
            lambda4: terms.lambda4(lambda4_exhaustive_max_items),
            lambda5: terms.lambda5(),
            lambda6: terms.lambda6(),
        })
    }
}

/// λ1 = 1 − Σ s²ⱼ / s²ₜ.
pub fn lambda1(matrix: &ScoreMatrix) -> Result<f64, StatsError> {
    Ok(Terms::new(matrix)?.lambda1())
}

/// λ2 = λ1 + √(k/(k−1) · C₂) / s²ₜ, with C₂ the sum of squared
/// off-diagonal covariances.
pub fn lambda2(matrix: &ScoreMatrix) -> Result<f64, StatsError> {
    Ok(Terms::new(matrix)?.lambda2())
}

/// λ3 = k/(k−1) · λ1.
pub fn lambda3(matrix: &ScoreMatrix) -> Result<f64, StatsError> {
    Ok(Terms::new(matrix)?.lambda3())
}

/// λ4 = max over balanced splits of 2 · (1 − (s²ₐ + s²ᵦ) / s²ₜ).
pub fn lambda4(
    matrix: &ScoreMatrix,
    lambda4_exhaustive_max_items: usize,
) -> Result<Lambda4, StatsError> {
    Ok(Terms::new(matrix)?.lambda4(lambda4_exhaustive_max_items))
}

/// λ5 = λ1 + 2 · √(maxⱼ C₂ⱼ) / s²ₜ.
pub fn lambda5(matrix: &ScoreMatrix) -> Result<f64, StatsError> {
    Ok(Terms::new(matrix)?.lambda5())
}

/// λ6 = 1 − Σ e²ⱼ / s²ₜ, where e²ⱼ is the residual variance of item `j`
/// regressed on all other items.
pub fn lambda6(matrix: &ScoreMatrix) -> Result<f64, StatsError> {
    Ok(Terms::new(matrix)?.lambda6())
}

struct Terms {
    cov: Covariance,
    k: f64,
    total: f64,
}

impl Terms {
    fn new(matrix: &ScoreMatrix) -> Result<Self, StatsError> {
        let (_, k) = check_shape(matrix)?;
        let cov = matrix.covariance()?;
        let total = cov.total();
        if total <= 0.0 {
            return Err(StatsError::ZeroVariance);
        }
        Ok(Self { cov, k, total })
    }

    fn lambda1(&self) -> f64 {
        1.0 - self.cov.trace() / self.total
    }

    fn lambda2(&self) -> f64 {
        let c2 = self.cov.off_diagonal_squares();
        self.lambda1() + (self.k / (self.k - 1.0) * c2).sqrt() / self.total
    }

    fn lambda3(&self) -> f64 {
        self.k / (self.k - 1.0) * self.lambda1()
    }

    fn lambda4(&self, exhaustive_max_items: usize) -> Lambda4 {
        let size = self.cov.size();
        let half_size = size / 2;
        let split_value = |half: &[usize]| {
            let other = (0..size).filter(|i| !half.contains(i)).collect::<Vec<_>>();
            2.0 * (1.0 - (self.cov.total_of(half) + self.cov.total_of(&other)) / self.total)
        };

        if size > exhaustive_max_items {
            let half = (0..half_size).collect::<Vec<_>>();
            return Lambda4 {
                value: split_value(&half),
                search: SplitSearch::FixedSplit,
                half,
            };
        }

        let mut best: Option<(f64, Vec<usize>)> = None;
        let mut partitions = 0;
        for half in Combinations::new(size, half_size) {
            // each unordered partition of an even item count appears twice
            if size % 2 == 0 && half.first() != Some(&0) {
                continue;
            }
            partitions += 1;
            let value = split_value(&half);
            if best.as_ref().is_none_or(|(b, _)| value > *b) {
                best = Some((value, half));
            }
        }
        let (value, half) = best.unwrap_or((f64::NAN, vec![]));
        Lambda4 {
            value,
            search: SplitSearch::Exhaustive { partitions },
            half,
        }
    }

    fn lambda5(&self) -> f64 {
        let max_c2j = (0..self.cov.size())
            .map(|j| self.cov.off_diagonal_squares_of(j))
            .fold(0.0, f64::max);
        self.lambda1() + 2.0 * max_c2j.sqrt() / self.total
    }

    fn lambda6(&self) -> f64 {
        let residuals = (0..self.cov.size())
            .map(|j| residual_variance(&self.cov, j))
            .sum::<f64>();
        1.0 - residuals / self.total
    }
}

/// Residual variance of item `j` after least-squares regression on every
/// other item.
///
/// Runs Gaussian elimination on the covariance matrix, pivoting on the
/// predictors one at a time; the remaining `(j, j)` entry is the Schur
/// complement `s_jj − s_jP S_PP⁻¹ s_Pj`. Predictors that are (numerically)
/// linear combinations of earlier ones are skipped, which leaves the fitted
/// values unchanged.
fn residual_variance(cov: &Covariance, j: usize) -> f64 {
    const COLLINEAR: f64 = 1e-10;

    let size = cov.size();
    let mut work = (0..size)
        .map(|r| (0..size).map(|c| cov.get(r, c)).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let mut eliminated = vec![false; size];

    for p in (0..size).filter(|&p| p != j) {
        let pivot = work[p][p];
        if cov.get(p, p) <= 0.0 || pivot <= COLLINEAR * cov.get(p, p) {
            continue;
        }
        eliminated[p] = true;
        for r in (0..size).filter(|&r| !eliminated[r]) {
            let factor = work[r][p] / pivot;
            for c in (0..size).filter(|&c| !eliminated[c]) {
                work[r][c] -= factor * work[p][c];
            }
        }
    }
    work[j][j].max(0.0)
}

/// Lexicographic k-combinations of `0..n`.
struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();
        let k = self.indices.len();
        match (0..k).rev().find(|&i| self.indices[i] != i + self.n - k) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }
        Some(current)
    }
}
