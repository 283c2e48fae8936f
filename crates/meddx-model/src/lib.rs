//! Data contracts between the analytics core and its collaborators.
//!
//! The response store, questionnaire generator and reporting layer live
//! outside this workspace. This crate describes only what the analytics
//! need from them:
//!
//! - [`Candidate`]: an image ranked by pairwise comparison
//! - [`Response`]: an observer's answer, either diagnostic or choice
//! - [`PairwiseVote`]: a comparison derived from a choice response
//! - [`RatingRecord`]: one scalar rating, the input of the reliability engines
//! - [`GroundTruth`]: diagnostic findings per image
//! - [`StudySource`] / [`StudySnapshot`]: the injected data-access context
//!
//! All types are plain data and implement `serde` traits.

pub use self::{
    candidate::Candidate,
    id::{CandidateId, GroupId, ItemId, ObserverId},
    rating::{GroundTruth, RatingRecord},
    response::{ChoiceResponse, DiagnosticResponse, Response},
    source::{StudySnapshot, StudySource},
    vote::{PairwiseVote, VoteOutcome},
};

mod candidate;
mod id;
mod rating;
pub mod response;
pub mod source;
mod vote;
