//! Copeland tournament ranking of candidates from pairwise votes.
//!
//! Within each comparison group every unordered pair of candidates is one
//! match, however many votes were cast on it. The candidate with more vote
//! wins on the pair takes the point; equal counts (including no votes at all)
//! split it 0.5 / 0.5. A candidate's Copeland score is the sum of its points,
//! so the scores of a group of `n` candidates always add up to `n(n-1)/2`.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
};

use meddx_model::{Candidate, CandidateId, GroupId, PairwiseVote, VoteOutcome};
use meddx_stats::descriptive::DescriptiveStats;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CopelandError {
    #[display("no candidates to rank")]
    NoCandidates,
    #[display("candidate {candidate} is registered more than once")]
    DuplicateCandidate { candidate: CandidateId },
    #[display("vote references unknown candidate {candidate}")]
    UnknownCandidate { candidate: CandidateId },
    #[display("candidate {candidate} belongs to group {expected}, but was compared in group {found}")]
    GroupMismatch {
        candidate: CandidateId,
        expected: GroupId,
        found: GroupId,
    },
    #[display("candidate {candidate} is compared with itself")]
    SelfComparison { candidate: CandidateId },
    #[display("winner {winner} is neither {candidate_a} nor {candidate_b}")]
    ForeignWinner {
        winner: CandidateId,
        candidate_a: CandidateId,
        candidate_b: CandidateId,
    },
}

/// Vote counts for one unordered pair; `candidate_a < candidate_b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairTally {
    pub group: GroupId,
    pub candidate_a: CandidateId,
    pub candidate_b: CandidateId,
    pub wins_a: usize,
    pub wins_b: usize,
    pub ties: usize,
}

impl PairTally {
    fn new(group: GroupId, a: CandidateId, b: CandidateId) -> Self {
        debug_assert!(a < b);
        Self {
            group,
            candidate_a: a,
            candidate_b: b,
            wins_a: 0,
            wins_b: 0,
            ties: 0,
        }
    }

    #[must_use]
    pub fn votes(&self) -> usize {
        self.wins_a + self.wins_b + self.ties
    }

    /// Points awarded to `(candidate_a, candidate_b)`; always sums to 1.
    #[must_use]
    pub fn points(&self) -> (f64, f64) {
        match self.wins_a.cmp(&self.wins_b) {
            Ordering::Greater => (1.0, 0.0),
            Ordering::Less => (0.0, 1.0),
            Ordering::Equal => (0.5, 0.5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopelandScore {
    pub candidate: CandidateId,
    pub group: GroupId,
    pub score: f64,
    /// Pairs decided in this candidate's favour.
    pub pair_wins: usize,
    pub pair_losses: usize,
    pub pair_ties: usize,
    /// Votes this candidate took part in.
    pub votes: usize,
    /// No vote involved this candidate; its score comes from ties alone and
    /// cannot be told apart from a genuinely tied candidate.
    pub unvoted: bool,
}

/// Scores of every candidate, best first (ties broken by candidate id), and
/// the per-pair tallies they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopelandRanking {
    pub scores: Vec<CopelandScore>,
    pub pairs: Vec<PairTally>,
}

impl CopelandRanking {
    #[must_use]
    pub fn get(&self, candidate: CandidateId) -> Option<&CopelandScore> {
        self.scores.iter().find(|s| s.candidate == candidate)
    }

    pub fn group(&self, group: GroupId) -> impl Iterator<Item = &CopelandScore> {
        self.scores.iter().filter(move |s| s.group == group)
    }

    pub fn unvoted(&self) -> impl Iterator<Item = &CopelandScore> {
        self.scores.iter().filter(|s| s.unvoted)
    }
}

/// Ranks all candidates group by group.
///
/// A group's candidates are those registered to it; every candidate a vote
/// references must be registered to the vote's group.
///
/// # Examples
///
/// ```
/// # use meddx_analysis::copeland::copeland_ranking;
/// # use meddx_model::{Candidate, CandidateId, GroupId, ObserverId, PairwiseVote, VoteOutcome};
/// let (a, b, g) = (CandidateId(1), CandidateId(2), GroupId(1));
/// let candidates = [Candidate::new(a, g), Candidate::new(b, g)];
/// let votes = [PairwiseVote {
///     observer: ObserverId(1),
///     group: g,
///     candidate_a: a,
///     candidate_b: b,
///     outcome: VoteOutcome::Winner(b),
/// }];
/// let ranking = copeland_ranking(&candidates, &votes).unwrap();
/// assert_eq!(ranking.scores[0].candidate, b);
/// assert_eq!(ranking.scores[0].score, 1.0);
/// ```
pub fn copeland_ranking(
    candidates: &[Candidate],
    votes: &[PairwiseVote],
) -> Result<CopelandRanking, CopelandError> {
    if candidates.is_empty() {
        return Err(CopelandError::NoCandidates);
    }
    let mut groups = BTreeMap::<GroupId, BTreeSet<CandidateId>>::new();
    let mut registry = BTreeMap::new();
    for candidate in candidates {
        if registry.insert(candidate.id, candidate.group).is_some() {
            return Err(CopelandError::DuplicateCandidate {
                candidate: candidate.id,
            });
        }
        groups.entry(candidate.group).or_default().insert(candidate.id);
    }
    info!(
        candidates = candidates.len(),
        groups = groups.len(),
        votes = votes.len(),
        "computing Copeland ranking"
    );

    let mut tallies = BTreeMap::new();
    for (&group, members) in &groups {
        let members = members.iter().copied().collect::<Vec<_>>();
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                tallies.insert((a, b), PairTally::new(group, a, b));
            }
        }
    }

    let mut vote_counts = BTreeMap::<CandidateId, usize>::new();
    for vote in votes {
        for candidate in [vote.candidate_a, vote.candidate_b] {
            let expected = *registry
                .get(&candidate)
                .ok_or(CopelandError::UnknownCandidate { candidate })?;
            if expected != vote.group {
                return Err(CopelandError::GroupMismatch {
                    candidate,
                    expected,
                    found: vote.group,
                });
            }
        }
        if vote.candidate_a == vote.candidate_b {
            return Err(CopelandError::SelfComparison {
                candidate: vote.candidate_a,
            });
        }

        let tally = tallies
            .get_mut(&vote.pair())
            .ok_or(CopelandError::UnknownCandidate {
                candidate: vote.candidate_a,
            })?;
        match vote.outcome {
            VoteOutcome::Winner(winner) if winner == tally.candidate_a => tally.wins_a += 1,
            VoteOutcome::Winner(winner) if winner == tally.candidate_b => tally.wins_b += 1,
            VoteOutcome::Winner(winner) => {
                return Err(CopelandError::ForeignWinner {
                    winner,
                    candidate_a: vote.candidate_a,
                    candidate_b: vote.candidate_b,
                });
            }
            VoteOutcome::Tie => tally.ties += 1,
        }
        *vote_counts.entry(vote.candidate_a).or_default() += 1;
        *vote_counts.entry(vote.candidate_b).or_default() += 1;
    }

    let mut scores = registry
        .iter()
        .map(|(&candidate, &group)| {
            let votes = vote_counts.get(&candidate).copied().unwrap_or_default();
            (
                candidate,
                CopelandScore {
                    candidate,
                    group,
                    score: 0.0,
                    pair_wins: 0,
                    pair_losses: 0,
                    pair_ties: 0,
                    votes,
                    unvoted: votes == 0,
                },
            )
        })
        .collect::<BTreeMap<_, _>>();

    for tally in tallies.values() {
        debug!(
            group = %tally.group,
            a = %tally.candidate_a,
            b = %tally.candidate_b,
            wins_a = tally.wins_a,
            wins_b = tally.wins_b,
            "pair resolved"
        );
        let (points_a, points_b) = tally.points();
        let order = tally.wins_a.cmp(&tally.wins_b);
        for (candidate, points, order) in [
            (tally.candidate_a, points_a, order),
            (tally.candidate_b, points_b, order.reverse()),
        ] {
            if let Some(score) = scores.get_mut(&candidate) {
                score.score += points;
                match order {
                    Ordering::Greater => score.pair_wins += 1,
                    Ordering::Less => score.pair_losses += 1,
                    Ordering::Equal => score.pair_ties += 1,
                }
            }
        }
    }

    let mut scores = scores.into_values().collect::<Vec<_>>();
    for score in scores.iter().filter(|s| s.unvoted) {
        warn!(
            candidate = %score.candidate,
            group = %score.group,
            score = score.score,
            "candidate received no votes; its score reflects ties only"
        );
    }
    scores.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.candidate.cmp(&b.candidate))
    });

    Ok(CopelandRanking {
        scores,
        pairs: tallies.into_values().collect(),
    })
}

/// Candidate attribute to aggregate scores by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateAttribute {
    Model,
    Dataset,
}

impl CandidateAttribute {
    fn of(self, candidate: &Candidate) -> Option<&str> {
        match self {
            Self::Model => candidate.model.as_deref(),
            Self::Dataset => candidate.dataset.as_deref(),
        }
    }
}

/// Summary of the Copeland scores sharing one attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateScore {
    pub key: String,
    pub stats: DescriptiveStats,
}

/// Averages scores per model or per dataset, best mean first. Candidates
/// without the attribute (reference images) are left out.
#[must_use]
pub fn aggregate_scores(
    ranking: &CopelandRanking,
    candidates: &[Candidate],
    attribute: CandidateAttribute,
) -> Vec<AggregateScore> {
    let mut by_key = BTreeMap::<&str, Vec<f64>>::new();
    for candidate in candidates {
        let (Some(key), Some(score)) = (attribute.of(candidate), ranking.get(candidate.id)) else {
            continue;
        };
        by_key.entry(key).or_default().push(score.score);
    }

    let mut aggregates = by_key
        .into_iter()
        .filter_map(|(key, scores)| {
            Some(AggregateScore {
                key: key.to_owned(),
                stats: DescriptiveStats::new(scores)?,
            })
        })
        .collect::<Vec<_>>();
    aggregates.sort_by(|a, b| b.stats.mean.total_cmp(&a.stats.mean));
    aggregates
}
