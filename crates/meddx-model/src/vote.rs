use serde::{Deserialize, Serialize};

use crate::{CandidateId, GroupId, ObserverId, response::ChoiceResponse};

/// Result of a single comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    Winner(CandidateId),
    Tie,
}

/// One observer's verdict on a pair of candidates of the same group.
///
/// Several votes may exist for the same unordered pair, in either
/// orientation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairwiseVote {
    pub observer: ObserverId,
    pub group: GroupId,
    pub candidate_a: CandidateId,
    pub candidate_b: CandidateId,
    pub outcome: VoteOutcome,
}

impl PairwiseVote {
    /// The two candidates in ascending id order.
    #[must_use]
    pub fn pair(&self) -> (CandidateId, CandidateId) {
        if self.candidate_a <= self.candidate_b {
            (self.candidate_a, self.candidate_b)
        } else {
            (self.candidate_b, self.candidate_a)
        }
    }

    #[must_use]
    pub fn involves(&self, candidate: CandidateId) -> bool {
        self.candidate_a == candidate || self.candidate_b == candidate
    }
}

impl From<&ChoiceResponse> for PairwiseVote {
    fn from(response: &ChoiceResponse) -> Self {
        Self {
            observer: response.observer,
            group: response.group,
            candidate_a: response.candidate_a,
            candidate_b: response.candidate_b,
            outcome: response
                .choice
                .map_or(VoteOutcome::Tie, VoteOutcome::Winner),
        }
    }
}
