//! Study-level entry point tying the engines to a [`StudySnapshot`].

use meddx_model::{ObserverId, PairwiseVote, RatingRecord, StudySnapshot};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    config::{AnalysisConfig, ConfigError},
    copeland::{
        AggregateScore, CandidateAttribute, CopelandError, CopelandRanking, aggregate_scores,
        copeland_ranking,
    },
    diagnostic::{DiagnosticScoreError, diagnostic_ratings},
    interobserver::{
        CohenReport, InterObserverError, KrippendorffReport, cohens_kappa_matrix,
        krippendorff_report,
    },
    intraobserver::{IntraObserverError, IntraObserverReport, intra_observer_reports},
    ratings::{RatingTable, RatingTableError},
};

/// Which questions a reliability analysis runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// Diagnostic questions, rated by diagnostic score.
    #[display("diagnostic")]
    Diagnostic,
    /// Pairwise comparison questions, rated by the chosen candidate.
    #[display("choice")]
    Choice,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum StudyError {
    #[display("invalid configuration: {_0}")]
    Config(ConfigError),
    #[display("{_0}")]
    Diagnostic(DiagnosticScoreError),
    #[display("{_0}")]
    Ratings(RatingTableError),
    #[display("{_0}")]
    Copeland(CopelandError),
    #[display("{_0}")]
    InterObserver(InterObserverError),
    #[display("{_0}")]
    IntraObserver(IntraObserverError),
}

/// Runs analyses over one immutable snapshot of a study.
///
/// Every method recomputes its result from the snapshot; nothing is cached.
#[derive(Debug, Clone)]
pub struct StudyAnalyzer<'a> {
    snapshot: &'a StudySnapshot,
    config: AnalysisConfig,
}

impl<'a> StudyAnalyzer<'a> {
    pub fn new(snapshot: &'a StudySnapshot, config: AnalysisConfig) -> Result<Self, StudyError> {
        config.validate()?;
        info!(
            candidates = snapshot.candidates.len(),
            responses = snapshot.responses.len(),
            "study analyzer ready"
        );
        Ok(Self { snapshot, config })
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Diagnostic scores of every diagnostic response.
    pub fn diagnostic_ratings(&self) -> Result<Vec<RatingRecord>, StudyError> {
        let responses = self.snapshot.responses.iter().filter_map(|r| r.as_diagnostic());
        Ok(diagnostic_ratings(responses, &self.snapshot.ground_truth)?)
    }

    /// Chosen candidate of every choice response, as a nominal rating.
    /// Responses without a preference have no value and are left out.
    #[must_use]
    pub fn choice_ratings(&self) -> Vec<RatingRecord> {
        self.snapshot
            .responses
            .iter()
            .filter_map(|r| r.as_choice())
            .filter_map(|r| {
                let choice = r.choice?;
                Some(RatingRecord {
                    observer: r.observer,
                    item: r.question,
                    value: f64::from(choice.get()),
                    certainty: None,
                    repeat_of: r.repeat_of,
                })
            })
            .collect()
    }

    pub fn ratings(&self, kind: ResponseKind) -> Result<RatingTable, StudyError> {
        let records = match kind {
            ResponseKind::Diagnostic => self.diagnostic_ratings()?,
            ResponseKind::Choice => self.choice_ratings(),
        };
        Ok(RatingTable::new(&records)?)
    }

    /// Every choice response as a pairwise vote, repeats included.
    #[must_use]
    pub fn pairwise_votes(&self) -> Vec<PairwiseVote> {
        self.snapshot
            .responses
            .iter()
            .filter_map(|r| r.as_choice())
            .map(PairwiseVote::from)
            .collect()
    }

    pub fn copeland_ranking(&self) -> Result<CopelandRanking, StudyError> {
        Ok(copeland_ranking(
            &self.snapshot.candidates,
            &self.pairwise_votes(),
        )?)
    }

    pub fn aggregate_scores(
        &self,
        attribute: CandidateAttribute,
    ) -> Result<Vec<AggregateScore>, StudyError> {
        let ranking = self.copeland_ranking()?;
        Ok(aggregate_scores(
            &ranking,
            &self.snapshot.candidates,
            attribute,
        ))
    }

    pub fn cohens_kappa(&self, kind: ResponseKind) -> Result<CohenReport, StudyError> {
        info!(%kind, "inter-observer analysis");
        Ok(cohens_kappa_matrix(
            &self.ratings(kind)?,
            self.config.kappa_weighting,
        )?)
    }

    pub fn krippendorff_alpha(&self, kind: ResponseKind) -> Result<KrippendorffReport, StudyError> {
        info!(%kind, "inter-observer analysis");
        Ok(krippendorff_report(
            &self.ratings(kind)?,
            self.config.krippendorff_level,
            self.config.krippendorff_pairwise,
        )?)
    }

    pub fn intra_observer(
        &self,
        kind: ResponseKind,
        observers: &[ObserverId],
    ) -> Result<Vec<IntraObserverReport>, StudyError> {
        info!(%kind, "intra-observer analysis");
        Ok(intra_observer_reports(
            &self.ratings(kind)?,
            observers,
            &self.config,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use meddx_model::{
        Candidate, CandidateId, ChoiceResponse, DiagnosticResponse, GroundTruth, GroupId, ItemId,
        Response,
    };

    use super::*;

    fn snapshot() -> StudySnapshot {
        let choice = |observer, question, choice: Option<u32>| {
            Response::from(ChoiceResponse {
                observer: ObserverId(observer),
                question: ItemId(question),
                group: GroupId(1),
                candidate_a: CandidateId(1),
                candidate_b: CandidateId(2),
                choice: choice.map(CandidateId),
                repeat_of: None,
            })
        };
        StudySnapshot {
            candidates: vec![
                Candidate::new(CandidateId(1), GroupId(1)),
                Candidate::new(CandidateId(2), GroupId(1)),
            ],
            responses: vec![
                choice(1, 100, Some(1)),
                choice(2, 100, None),
                Response::from(DiagnosticResponse {
                    observer: ObserverId(1),
                    item: ItemId(1),
                    label: "none".to_owned(),
                    certainty: 2,
                    repeat_of: None,
                }),
            ],
            ground_truth: GroundTruth::from_iter([(ItemId(1), Vec::<String>::new())]),
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let snapshot = snapshot();
        let config = AnalysisConfig {
            confidence_level: 0.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            StudyAnalyzer::new(&snapshot, config),
            Err(StudyError::Config(_))
        ));
    }

    #[test]
    fn test_ratings_by_kind() {
        let snapshot = snapshot();
        let analyzer = StudyAnalyzer::new(&snapshot, AnalysisConfig::default()).unwrap();
        let diagnostic = analyzer.diagnostic_ratings().unwrap();
        assert_eq!(diagnostic.len(), 1);
        assert_eq!(diagnostic[0].value, 2.0);

        let choices = analyzer.choice_ratings();
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].value, 1.0);

        assert_eq!(analyzer.ratings(ResponseKind::Choice).unwrap().num_observers(), 1);
    }

    #[test]
    fn test_votes_include_ties() {
        let snapshot = snapshot();
        let analyzer = StudyAnalyzer::new(&snapshot, AnalysisConfig::default()).unwrap();
        assert_eq!(analyzer.pairwise_votes().len(), 2);
        let ranking = analyzer.copeland_ranking().unwrap();
        assert_eq!(ranking.get(CandidateId(1)).unwrap().score, 1.0);
    }

    #[test]
    fn test_missing_ground_truth_surfaces() {
        let mut snapshot = snapshot();
        snapshot.ground_truth = GroundTruth::new();
        let analyzer = StudyAnalyzer::new(&snapshot, AnalysisConfig::default()).unwrap();
        assert_eq!(
            analyzer.cohens_kappa(ResponseKind::Diagnostic).unwrap_err(),
            StudyError::Diagnostic(DiagnosticScoreError::MissingGroundTruth { item: ItemId(1) })
        );
    }

    #[test]
    fn test_kind_json() {
        assert_eq!(serde_json::to_string(&ResponseKind::Choice).unwrap(), r#""choice""#);
        assert_eq!(ResponseKind::Diagnostic.to_string(), "diagnostic");
    }
}
