//! Data-access context.
//!
//! The analytics core never reaches for a global connection: a collaborator
//! implements [`StudySource`] over its storage and the core takes one
//! [`StudySnapshot`] of it before computing anything, so a run never sees a
//! data set that changes halfway through.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::{Candidate, GroundTruth, Response};

/// Read access to the tables of one study.
pub trait StudySource {
    type Error;

    fn candidates(&self) -> Result<Vec<Candidate>, Self::Error>;
    fn responses(&self) -> Result<Vec<Response>, Self::Error>;
    fn ground_truth(&self) -> Result<GroundTruth, Self::Error>;
}

/// Immutable copy of a study's tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudySnapshot {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub responses: Vec<Response>,
    #[serde(default)]
    pub ground_truth: GroundTruth,
}

impl StudySnapshot {
    /// Reads every table of `source` once.
    pub fn capture<S>(source: &S) -> Result<Self, S::Error>
    where
        S: StudySource + ?Sized,
    {
        Ok(Self {
            candidates: source.candidates()?,
            responses: source.responses()?,
            ground_truth: source.ground_truth()?,
        })
    }
}

impl StudySource for StudySnapshot {
    type Error = Infallible;

    fn candidates(&self) -> Result<Vec<Candidate>, Self::Error> {
        Ok(self.candidates.clone())
    }

    fn responses(&self) -> Result<Vec<Response>, Self::Error> {
        Ok(self.responses.clone())
    }

    fn ground_truth(&self) -> Result<GroundTruth, Self::Error> {
        Ok(self.ground_truth.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{CandidateId, GroupId, ItemId, ObserverId, response::DiagnosticResponse};

    #[derive(Debug, derive_more::Display, derive_more::Error)]
    #[display("store offline")]
    struct Offline;

    struct CountingSource {
        reads: Cell<usize>,
        fail_responses: bool,
    }

    impl StudySource for CountingSource {
        type Error = Offline;

        fn candidates(&self) -> Result<Vec<Candidate>, Offline> {
            self.reads.set(self.reads.get() + 1);
            Ok(vec![Candidate::new(CandidateId(1), GroupId(1)).with_model("unet")])
        }

        fn responses(&self) -> Result<Vec<Response>, Offline> {
            self.reads.set(self.reads.get() + 1);
            if self.fail_responses {
                return Err(Offline);
            }
            Ok(vec![Response::from(DiagnosticResponse {
                observer: ObserverId(1),
                item: ItemId(1),
                label: "none".to_owned(),
                certainty: 3,
                repeat_of: None,
            })])
        }

        fn ground_truth(&self) -> Result<GroundTruth, Offline> {
            self.reads.set(self.reads.get() + 1);
            Ok(GroundTruth::from_iter([(ItemId(1), Vec::<String>::new())]))
        }
    }

    #[test]
    fn test_capture_reads_each_table_once() {
        let source = CountingSource {
            reads: Cell::new(0),
            fail_responses: false,
        };
        let snapshot = StudySnapshot::capture(&source).unwrap();
        assert_eq!(source.reads.get(), 3);
        assert_eq!(snapshot.candidates.len(), 1);
        assert_eq!(snapshot.responses.len(), 1);
        assert_eq!(snapshot.ground_truth.len(), 1);

        let again = StudySnapshot::capture(&snapshot).unwrap();
        assert_eq!(again, snapshot);
    }

    #[test]
    fn test_capture_propagates_source_error() {
        let source = CountingSource {
            reads: Cell::new(0),
            fail_responses: true,
        };
        assert!(StudySnapshot::capture(&source).is_err());
    }

    #[test]
    fn test_snapshot_json_contract() {
        let json = r#"{
            "candidates": [{"id": 1, "group": 1, "model": "unet", "dataset": "lidc"}],
            "responses": [{"type": "choice", "observer": 1, "question": 1, "group": 1,
                           "candidate_a": 1, "candidate_b": 2, "choice": null}],
            "ground_truth": {}
        }"#;
        let snapshot: StudySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.candidates[0].dataset.as_deref(), Some("lidc"));
        assert!(snapshot.responses[0].is_choice());
        assert!(snapshot.ground_truth.is_empty());
    }
}
