//! Agreement of an observer with themself across repeated measurements.
//!
//! For each observer, every repeated (control) rating is paired with the
//! original rating of the same item. The pairs form an `n x 2` score matrix
//! (rows are the paired items, columns are the original and the repeated
//! run) on which the internal-consistency coefficients are computed.

use meddx_model::ObserverId;
use meddx_stats::{
    StatsError,
    cronbach::{CronbachAlpha, cronbach_alpha},
    guttman::GuttmanLambdas,
    icc::{IccTable, intraclass_correlation},
    matrix::ScoreMatrix,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{config::AnalysisConfig, ratings::RatingTable};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum IntraObserverError {
    #[display("no observers selected for intra-observer analysis")]
    NoObservers,
    #[display("observer {observer} has no repeated measurements")]
    NoRepeatedMeasurements { observer: ObserverId },
    #[display("intra-observer statistics failed for observer {observer}: {error}")]
    Stats {
        observer: ObserverId,
        #[error(source)]
        error: StatsError,
    },
}

/// Internal-consistency coefficients of one observer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntraObserverReport {
    pub observer: ObserverId,
    /// Number of (original, repeat) pairs.
    pub pairs: usize,
    #[serde(flatten)]
    pub alpha: CronbachAlpha,
    #[serde(flatten)]
    pub lambdas: GuttmanLambdas,
    pub icc_table: IccTable,
    /// `|alpha - λ3|`; both are the same quantity and should agree to
    /// rounding error.
    pub alpha_lambda3_gap: f64,
    /// Whether the gap is within the configured tolerance.
    pub consistent: bool,
}

/// Analyses one observer.
pub fn intra_observer_report(
    table: &RatingTable,
    observer: ObserverId,
    config: &AnalysisConfig,
) -> Result<IntraObserverReport, IntraObserverError> {
    let pairs = table.repeated_pairs(observer);
    if pairs.is_empty() {
        return Err(IntraObserverError::NoRepeatedMeasurements { observer });
    }
    debug!(observer = %observer, pairs = pairs.len(), "analysing repeated measurements");

    let wrap = |error| IntraObserverError::Stats { observer, error };
    let rows = pairs
        .iter()
        .map(|p| [p.original, p.repeat])
        .collect::<Vec<_>>();
    let matrix = ScoreMatrix::from_rows(&rows).map_err(wrap)?;

    let alpha = cronbach_alpha(&matrix, config.confidence_level).map_err(wrap)?;
    let lambdas =
        GuttmanLambdas::new(&matrix, config.lambda4_exhaustive_max_items).map_err(wrap)?;
    let icc_table = intraclass_correlation(&matrix, config.confidence_level).map_err(wrap)?;

    if lambdas.lambda4.search.is_approximate() {
        warn!(
            observer = %observer,
            "lambda 4 uses a fixed split and is a lower approximation"
        );
    }
    let alpha_lambda3_gap = (alpha.alpha - lambdas.lambda3).abs();
    let consistent = alpha_lambda3_gap <= config.cross_check_tolerance;
    if !consistent {
        warn!(
            observer = %observer,
            alpha = alpha.alpha,
            lambda3 = lambdas.lambda3,
            gap = alpha_lambda3_gap,
            "Cronbach's alpha and lambda 3 disagree"
        );
    }

    Ok(IntraObserverReport {
        observer,
        pairs: pairs.len(),
        alpha,
        lambdas,
        icc_table,
        alpha_lambda3_gap,
        consistent,
    })
}

/// Analyses each observer independently, in the given order.
///
/// Fails as a whole if no observer is given or any observer lacks usable
/// repeated measurements.
pub fn intra_observer_reports(
    table: &RatingTable,
    observers: &[ObserverId],
    config: &AnalysisConfig,
) -> Result<Vec<IntraObserverReport>, IntraObserverError> {
    if observers.is_empty() {
        return Err(IntraObserverError::NoObservers);
    }
    info!(observers = observers.len(), "computing intra-observer agreement");
    observers
        .iter()
        .map(|&observer| intra_observer_report(table, observer, config))
        .collect()
}
