//! Analytics core of a medical-image perceptual-quality study.
//!
//! Observers rate diagnostic images and compare pairs of generated images.
//! This crate turns their responses into rankings and reliability metrics.
//!
//! # Overview
//!
//! ## Ranking
//!
//! 1. **Votes** ([`meddx_model::PairwiseVote`]): one per choice response
//! 2. **Copeland ranking** ([`copeland::copeland_ranking`]): one point per
//!    pair of candidates won, half a point per tied pair
//! 3. **Aggregation** ([`copeland::aggregate_scores`]): mean score per model
//!    or per dataset
//!
//! ## Reliability
//!
//! 1. **Ratings** ([`ratings::RatingTable`]): diagnostic scores
//!    ([`diagnostic`]) or chosen candidates, grouped by observer
//! 2. **Inter-observer agreement** ([`interobserver`]): pairwise Cohen's
//!    kappa, global and pairwise Krippendorff's alpha
//! 3. **Intra-observer agreement** ([`intraobserver`]): Cronbach's alpha,
//!    Guttman's λ1..λ6 and the ICC table over repeated measurements
//!
//! [`study::StudyAnalyzer`] wires all of this to one
//! [`meddx_model::StudySnapshot`].
//!
//! # Logging
//!
//! Progress and data-quality warnings are emitted through `tracing`
//! (all-zero-vote candidates, repeats without an original, alpha / λ3
//! disagreement). Installing a subscriber is up to the caller.
//!
//! # Examples
//!
//! ```
//! use meddx_analysis::{config::AnalysisConfig, study::{ResponseKind, StudyAnalyzer}};
//! use meddx_model::{DiagnosticResponse, GroundTruth, ItemId, ObserverId, Response, StudySnapshot};
//!
//! let mut snapshot = StudySnapshot::default();
//! snapshot.ground_truth =
//!     GroundTruth::from_iter([(ItemId(1), vec!["nodule"]), (ItemId(2), vec![])]);
//! for observer in [1, 2] {
//!     for (item, label) in [(1, "nodule"), (2, "nodule")] {
//!         snapshot.responses.push(Response::from(DiagnosticResponse {
//!             observer: ObserverId(observer),
//!             item: ItemId(item),
//!             label: label.to_owned(),
//!             certainty: 3,
//!             repeat_of: None,
//!         }));
//!     }
//! }
//!
//! let analyzer = StudyAnalyzer::new(&snapshot, AnalysisConfig::default()).unwrap();
//! let report = analyzer.cohens_kappa(ResponseKind::Diagnostic).unwrap();
//! let kappa = report.pairwise.get(ObserverId(1), ObserverId(2)).unwrap();
//! assert_eq!(kappa.value(), Some(1.0));
//! ```

pub mod config;
pub mod copeland;
pub mod diagnostic;
pub mod interobserver;
pub mod intraobserver;
pub mod matrix;
pub mod ratings;
pub mod study;
