//! Agreement between different observers rating the same items.
//!
//! Only non-repeated ratings take part. Cohen's kappa compares observers'
//! rating sequences position by position and requires equal lengths;
//! Krippendorff's alpha aligns observers by item id and tolerates unequal
//! coverage.

use meddx_model::ObserverId;
use meddx_stats::{
    StatsError,
    kappa::{KappaWeighting, cohens_kappa},
    krippendorff::{MeasurementLevel, krippendorff_alpha},
};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    matrix::{ObserverMatrix, PairCoefficient},
    ratings::RatingTable,
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InterObserverError {
    #[display("inter-observer agreement needs at least 2 observers, found {found}")]
    TooFewObservers { found: usize },
    #[display(
        "observer {observer_a} has {len_a} responses but observer {observer_b} has {len_b}; \
         Cohen's kappa needs aligned responses of equal length"
    )]
    LengthMismatch {
        observer_a: ObserverId,
        len_a: usize,
        observer_b: ObserverId,
        len_b: usize,
    },
    #[display("{_0}")]
    Stats(StatsError),
}

impl From<StatsError> for InterObserverError {
    fn from(error: StatsError) -> Self {
        Self::Stats(error)
    }
}

/// Pairwise Cohen's kappa.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohenReport {
    pub weighting: KappaWeighting,
    #[serde(rename = "pairwise_observers")]
    pub pairwise: ObserverMatrix,
}

/// Krippendorff's alpha over all observers, and optionally per pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KrippendorffReport {
    pub level: MeasurementLevel,
    #[serde(rename = "all_observers")]
    pub all: f64,
    #[serde(rename = "pairwise_observers", skip_serializing_if = "Option::is_none")]
    pub pairwise: Option<ObserverMatrix>,
}

fn observers_of(table: &RatingTable) -> Result<Vec<ObserverId>, InterObserverError> {
    let observers = table.observers().collect::<Vec<_>>();
    if observers.len() < 2 {
        return Err(InterObserverError::TooFewObservers {
            found: observers.len(),
        });
    }
    Ok(observers)
}

/// Computes Cohen's kappa for every pair of observers.
///
/// Every observer must have the same number of ratings: the `i`-th rating of
/// one observer is compared with the `i`-th rating of the other. A pair for
/// which kappa is undefined yields [`PairCoefficient::Undefined`].
pub fn cohens_kappa_matrix(
    table: &RatingTable,
    weighting: KappaWeighting,
) -> Result<CohenReport, InterObserverError> {
    let observers = observers_of(table)?;
    let values = observers
        .iter()
        .map(|&o| table.original_values(o))
        .collect::<Vec<_>>();
    info!(observers = observers.len(), ?weighting, "computing Cohen's kappa");

    let reference = values[0].len();
    if let Some(i) = values.iter().position(|v| v.len() != reference) {
        return Err(InterObserverError::LengthMismatch {
            observer_a: observers[0],
            len_a: reference,
            observer_b: observers[i],
            len_b: values[i].len(),
        });
    }

    let pairwise = ObserverMatrix::from_pairs(observers.clone(), |i, j| {
        let kappa = PairCoefficient::from_result(cohens_kappa(&values[i], &values[j], weighting))?;
        debug!(a = %observers[i], b = %observers[j], ?kappa, "kappa");
        Ok::<_, InterObserverError>(kappa)
    })?;
    Ok(CohenReport {
        weighting,
        pairwise,
    })
}

/// Computes Krippendorff's alpha over all observers and, when `pairwise` is
/// set, for every pair of observers.
///
/// The global value must be defined; an undefined pair yields
/// [`PairCoefficient::Undefined`].
pub fn krippendorff_report(
    table: &RatingTable,
    level: MeasurementLevel,
    pairwise: bool,
) -> Result<KrippendorffReport, InterObserverError> {
    let observers = observers_of(table)?;
    let items = table.items();
    let data = observers
        .iter()
        .map(|&o| table.aligned_values(o, &items))
        .collect::<Vec<_>>();
    info!(
        observers = observers.len(),
        items = items.len(),
        ?level,
        pairwise,
        "computing Krippendorff's alpha"
    );

    let all = krippendorff_alpha(&data, level)?;
    let pairwise = if pairwise {
        Some(ObserverMatrix::from_pairs(observers.clone(), |i, j| {
            let alpha = PairCoefficient::from_result(krippendorff_alpha(
                &[&data[i][..], &data[j][..]],
                level,
            ))?;
            debug!(a = %observers[i], b = %observers[j], ?alpha, "alpha");
            Ok::<_, InterObserverError>(alpha)
        })?)
    } else {
        None
    };

    Ok(KrippendorffReport {
        level,
        all,
        pairwise,
    })
}
