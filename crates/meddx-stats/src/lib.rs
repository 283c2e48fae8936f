//! Agreement and reliability statistics for diagnostic reader studies.
//!
//! This crate provides the numeric core of the `meddx` workspace:
//!
//! - **Descriptive statistics**: mean, median, variance and covariance
//! - **Inter-rater agreement**: Cohen's kappa and Krippendorff's alpha
//! - **Internal consistency**: Cronbach's alpha and Guttman's λ1..λ6
//! - **Intraclass correlation**: the six Shrout & Fleiss ICC forms with F
//!   tests and confidence intervals
//!
//! Every function is pure: inputs are borrowed and no state is kept between
//! calls.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing samples
//! - [`matrix`]: Persons-by-items score matrix and its covariance
//! - [`distribution`]: F distribution used for intervals and tests
//! - [`kappa`]: Cohen's kappa with optional weighting
//! - [`krippendorff`]: Krippendorff's alpha with missing data
//! - [`cronbach`]: Cronbach's alpha with a confidence interval
//! - [`guttman`]: Guttman's lower bounds to reliability
//! - [`icc`]: Intraclass correlation table
//!
//! # Examples
//!
//! ## Agreement between two raters
//!
//! ```
//! use meddx_stats::kappa::{cohens_kappa, KappaWeighting};
//!
//! let a = [1.0, 1.0, 2.0, 2.0];
//! let b = [1.0, 2.0, 1.0, 2.0];
//! let kappa = cohens_kappa(&a, &b, KappaWeighting::Unweighted).unwrap();
//! assert_eq!(kappa, 0.0);
//! ```
//!
//! ## Test-retest consistency
//!
//! ```
//! use meddx_stats::{cronbach::cronbach_alpha, guttman::GuttmanLambdas, matrix::ScoreMatrix};
//!
//! let original = [3.0, -2.0, 5.0, 0.0, 1.0];
//! let repeated = [2.0, -2.0, 4.0, 1.0, 1.0];
//! let m = ScoreMatrix::from_columns(&[original, repeated]).unwrap();
//!
//! let alpha = cronbach_alpha(&m, 0.95).unwrap();
//! let lambdas = GuttmanLambdas::new(&m, 12).unwrap();
//! assert!((alpha.alpha - lambdas.lambda3).abs() < 1e-12);
//! ```
//!
//! ## Degenerate data
//!
//! Coefficients that are undefined for the given data report a
//! [`StatsError`] for which [`StatsError::is_degenerate`] holds:
//!
//! ```
//! use meddx_stats::kappa::{cohens_kappa, KappaWeighting};
//!
//! let constant = [1.0; 4];
//! let err = cohens_kappa(&constant, &constant, KappaWeighting::Unweighted).unwrap_err();
//! assert!(err.is_degenerate());
//! ```

pub use self::error::StatsError;

pub mod cronbach;
pub mod descriptive;
pub mod distribution;
mod error;
pub mod guttman;
pub mod icc;
pub mod kappa;
pub mod krippendorff;
pub mod matrix;

#[cfg(test)]
mod testdata;
