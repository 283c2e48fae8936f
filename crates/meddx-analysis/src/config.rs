//! Analysis configuration.
//!
//! Every field has a default, so collaborators may supply a partial document:
//!
//! ```json
//! { "kappa_weighting": "quadratic", "confidence_level": 0.9 }
//! ```

use meddx_stats::{kappa::KappaWeighting, krippendorff::MeasurementLevel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("confidence level {value} is outside the open interval (0, 1)")]
    ConfidenceLevel { value: f64 },
    #[display("cross-check tolerance {value} must be a non-negative finite number")]
    CrossCheckTolerance { value: f64 },
    #[display("lambda 4 exhaustive search needs room for at least 2 items, got {value}")]
    Lambda4MaxItems { value: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Disagreement weights for Cohen's kappa.
    pub kappa_weighting: KappaWeighting,
    /// Level of measurement for Krippendorff's alpha.
    pub krippendorff_level: MeasurementLevel,
    /// Also compute Krippendorff's alpha for every pair of observers.
    pub krippendorff_pairwise: bool,
    /// Coverage of the Cronbach and ICC confidence intervals.
    pub confidence_level: f64,
    /// Largest item count for which λ4 enumerates every split.
    pub lambda4_exhaustive_max_items: usize,
    /// Allowed gap between Cronbach's alpha and λ3.
    pub cross_check_tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            kappa_weighting: KappaWeighting::default(),
            krippendorff_level: MeasurementLevel::default(),
            krippendorff_pairwise: true,
            confidence_level: 0.95,
            lambda4_exhaustive_max_items: 12,
            cross_check_tolerance: 1e-6,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ConfigError::ConfidenceLevel {
                value: self.confidence_level,
            });
        }
        if !(self.cross_check_tolerance >= 0.0 && self.cross_check_tolerance.is_finite()) {
            return Err(ConfigError::CrossCheckTolerance {
                value: self.cross_check_tolerance,
            });
        }
        if self.lambda4_exhaustive_max_items < 2 {
            return Err(ConfigError::Lambda4MaxItems {
                value: self.lambda4_exhaustive_max_items,
            });
        }
        Ok(())
    }
}
