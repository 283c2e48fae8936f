//! Intraclass correlation coefficients (Shrout & Fleiss, 1979; McGraw &
//! Wong, 1996) from a two-way ANOVA decomposition of a persons-by-items
//! matrix.

use serde::Serialize;

use crate::{
    StatsError,
    cronbach::{ConfidenceInterval, check_shape},
    distribution::FDistribution,
    matrix::ScoreMatrix,
};

/// The six standard ICC forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize)]
pub enum IccKind {
    #[display("ICC1")]
    #[serde(rename = "ICC1")]
    Icc1,
    #[display("ICC2")]
    #[serde(rename = "ICC2")]
    Icc2,
    #[display("ICC3")]
    #[serde(rename = "ICC3")]
    Icc3,
    #[display("ICC1k")]
    #[serde(rename = "ICC1k")]
    Icc1k,
    #[display("ICC2k")]
    #[serde(rename = "ICC2k")]
    Icc2k,
    #[display("ICC3k")]
    #[serde(rename = "ICC3k")]
    Icc3k,
}

impl IccKind {
    pub const ALL: [Self; 6] = [
        Self::Icc1,
        Self::Icc2,
        Self::Icc3,
        Self::Icc1k,
        Self::Icc2k,
        Self::Icc3k,
    ];

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Icc1 => "Single raters absolute",
            Self::Icc2 => "Single random raters",
            Self::Icc3 => "Single fixed raters",
            Self::Icc1k => "Average raters absolute",
            Self::Icc2k => "Average random raters",
            Self::Icc3k => "Average fixed raters",
        }
    }
}

/// One row of the ICC table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IccRow {
    #[serde(rename = "type")]
    pub kind: IccKind,
    pub description: &'static str,
    pub icc: f64,
    /// F statistic of the test `ICC = 0`.
    pub f: f64,
    pub df1: f64,
    pub df2: f64,
    pub p_value: f64,
    pub confidence_interval: ConfidenceInterval,
}

/// All six ICC forms, in [`IccKind::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IccTable {
    rows: Vec<IccRow>,
}

impl IccTable {
    #[must_use]
    pub fn rows(&self) -> &[IccRow] {
        &self.rows
    }

    #[must_use]
    pub fn get(&self, kind: IccKind) -> &IccRow {
        // rows follow declaration order
        &self.rows[kind as usize]
    }
}

/// Mean squares of the two-way decomposition.
#[derive(Debug, Clone, Copy)]
struct MeanSquares {
    n: f64,
    k: f64,
    /// Between persons (rows).
    msb: f64,
    /// Between items (columns).
    msj: f64,
    /// Residual.
    mse: f64,
    /// Within persons (items + residual).
    msw: f64,
}

impl MeanSquares {
    fn new(matrix: &ScoreMatrix) -> Result<Self, StatsError> {
        let (n, k) = check_shape(matrix)?;
        let rows = matrix.num_rows();
        let columns = matrix.num_columns();
        let grand = matrix.row_sums().iter().sum::<f64>() / (n * k);

        let sst = (0..rows)
            .flat_map(|r| matrix.row(r).iter())
            .map(|v| (v - grand).powi(2))
            .sum::<f64>();
        let ssr = k * matrix
            .row_sums()
            .iter()
            .map(|s| (s / k - grand).powi(2))
            .sum::<f64>();
        let ssc = n * (0..columns)
            .map(|c| (matrix.column(c).iter().sum::<f64>() / n - grand).powi(2))
            .sum::<f64>();
        let sse = (sst - ssr - ssc).max(0.0);

        let dfr = n - 1.0;
        let dfc = k - 1.0;
        let dfe = dfr * dfc;
        let msb = ssr / dfr;
        if msb <= 0.0 {
            return Err(StatsError::ZeroVariance);
        }
        Ok(Self {
            n,
            k,
            msb,
            msj: ssc / dfc,
            mse: sse / dfe,
            msw: (ssc + sse) / (dfc + dfe),
        })
    }
}

/// Computes the six ICC forms together with F tests and confidence
/// intervals at `level`.
///
/// When the residual (or within-person) mean square is zero, the F
/// statistic is infinite: the p-value is reported as `0.0` and the affected
/// confidence bounds as `1.0`.
///
/// # Errors
///
/// * [`StatsError::TooFewItems`] / [`StatsError::TooFewObservations`] for a
///   matrix smaller than 2x2
/// * [`StatsError::ZeroVariance`] when the row means do not vary
/// * [`StatsError::InvalidProbability`] when `level` is not in (0, 1)
///
/// # Examples
///
/// ```
/// # use meddx_stats::{icc::{intraclass_correlation, IccKind}, matrix::ScoreMatrix};
/// let m = ScoreMatrix::from_rows(&[[1.0, 2.0], [2.0, 2.0], [4.0, 5.0], [5.0, 5.0]]).unwrap();
/// let table = intraclass_correlation(&m, 0.95).unwrap();
/// let icc3 = table.get(IccKind::Icc3);
/// assert!(icc3.icc > 0.8);
/// assert_eq!(icc3.description, "Single fixed raters");
/// ```
pub fn intraclass_correlation(matrix: &ScoreMatrix, level: f64) -> Result<IccTable, StatsError> {
    if !(level > 0.0 && level < 1.0) {
        return Err(StatsError::InvalidProbability { value: level });
    }
    let ms = MeanSquares::new(matrix)?;
    let MeanSquares {
        n,
        k,
        msb,
        msj,
        mse,
        msw,
    } = ms;
    let upper_p = 1.0 - (1.0 - level) / 2.0;

    let icc1 = (msb - msw) / (msb + (k - 1.0) * msw);
    let icc2 = (msb - mse) / (msb + (k - 1.0) * mse + k * (msj - mse) / n);
    let icc3 = (msb - mse) / (msb + (k - 1.0) * mse);
    let icc1k = (msb - msw) / msb;
    let icc2k = (msb - mse) / (msb + (msj - mse) / n);
    let icc3k = (msb - mse) / msb;

    let df1 = n - 1.0;
    let df1kd = n * (k - 1.0);
    let df2kd = (n - 1.0) * (k - 1.0);

    let one_way = FTest::new(msb, msw, df1, df1kd, upper_p)?;
    let two_way = FTest::new(msb, mse, df1, df2kd, upper_p)?;
    let random = random_raters_interval(ms, icc2, upper_p)?;

    let ci1 = one_way.map_bounds(|f| (f - 1.0) / (f + k - 1.0));
    let ci3 = two_way.map_bounds(|f| (f - 1.0) / (f + k - 1.0));
    let ci1k = one_way.map_bounds(|f| 1.0 - 1.0 / f);
    let ci3k = two_way.map_bounds(|f| 1.0 - 1.0 / f);
    let spearman_brown = |r: f64| r * k / (1.0 + r * (k - 1.0));
    let ci2k = (spearman_brown(random.0), spearman_brown(random.1));

    let interval = |(lower, upper): (f64, f64)| ConfidenceInterval {
        level,
        lower,
        upper,
    };
    let row = |kind: IccKind, icc: f64, test: &FTest, bounds: (f64, f64)| IccRow {
        kind,
        description: kind.description(),
        icc,
        f: test.f,
        df1: test.df1,
        df2: test.df2,
        p_value: test.p_value,
        confidence_interval: interval(bounds),
    };

    Ok(IccTable {
        rows: vec![
            row(IccKind::Icc1, icc1, &one_way, ci1),
            row(IccKind::Icc2, icc2, &two_way, random),
            row(IccKind::Icc3, icc3, &two_way, ci3),
            row(IccKind::Icc1k, icc1k, &one_way, ci1k),
            row(IccKind::Icc2k, icc2k, &two_way, ci2k),
            row(IccKind::Icc3k, icc3k, &two_way, ci3k),
        ],
    })
}

/// F test of `msb / denominator` with the bounds of the F ratio at the
/// requested confidence.
struct FTest {
    f: f64,
    df1: f64,
    df2: f64,
    p_value: f64,
    /// `(F / F_crit(df1, df2), F · F_crit(df2, df1))`, or `None` when F is
    /// infinite.
    bounds: Option<(f64, f64)>,
}

impl FTest {
    fn new(
        msb: f64,
        denominator: f64,
        df1: f64,
        df2: f64,
        upper_p: f64,
    ) -> Result<Self, StatsError> {
        if denominator <= 0.0 {
            return Ok(Self {
                f: f64::INFINITY,
                df1,
                df2,
                p_value: 0.0,
                bounds: None,
            });
        }
        let f = msb / denominator;
        let forward = FDistribution::new(df1, df2)?;
        let backward = FDistribution::new(df2, df1)?;
        Ok(Self {
            f,
            df1,
            df2,
            p_value: forward.sf(f),
            bounds: Some((
                f / forward.quantile(upper_p)?,
                f * backward.quantile(upper_p)?,
            )),
        })
    }

    fn map_bounds(&self, to_icc: impl Fn(f64) -> f64) -> (f64, f64) {
        match self.bounds {
            Some((lower, upper)) => (to_icc(lower), to_icc(upper)),
            None => (1.0, 1.0),
        }
    }
}

/// Confidence bounds for ICC2 using Satterthwaite's approximate degrees of
/// freedom for the combined error term.
fn random_raters_interval(
    ms: MeanSquares,
    icc2: f64,
    upper_p: f64,
) -> Result<(f64, f64), StatsError> {
    let MeanSquares {
        n,
        k,
        msb,
        msj,
        mse,
        ..
    } = ms;
    if mse <= 0.0 {
        if msj <= 0.0 {
            return Ok((1.0, 1.0));
        }
        // Satterthwaite's df tends to k - 1 as the residual vanishes.
        let f_upper = FDistribution::new(n - 1.0, k - 1.0)?.quantile(upper_p)?;
        let f_lower = FDistribution::new(k - 1.0, n - 1.0)?.quantile(upper_p)?;
        let lower = n * msb / (f_upper * k * msj + n * msb);
        let upper = n * f_lower * msb / (k * msj + n * f_lower * msb);
        return Ok((lower, upper));
    }
    let fj = msj / mse;
    let a = n * (1.0 + (k - 1.0) * icc2) - k * icc2;
    let numerator = (n - 1.0) * (k - 1.0) * (k * icc2 * fj + a).powi(2);
    let denominator = (n - 1.0) * k.powi(2) * icc2.powi(2) * fj.powi(2) + a.powi(2);
    let v = numerator / denominator;

    let f_upper = FDistribution::new(n - 1.0, v)?.quantile(upper_p)?;
    let f_lower = FDistribution::new(v, n - 1.0)?.quantile(upper_p)?;
    let spread = k * msj + (k * n - k - n) * mse;
    let lower = n * (msb - f_upper * mse) / (f_upper * spread + n * msb);
    let upper = n * (f_lower * msb - mse) / (spread + n * f_lower * msb);
    Ok((lower, upper))
}
