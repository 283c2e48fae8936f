use serde::{Deserialize, Serialize};

use crate::{CandidateId, GroupId};

/// An image ranked by pairwise comparison.
///
/// Every candidate belongs to exactly one comparison group. Candidate ids are
/// globally unique, so results from different groups can be merged by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub group: GroupId,
    /// Model that produced the image; `None` for reference images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Dataset the input image was taken from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
}

impl Candidate {
    #[must_use]
    pub fn new(id: CandidateId, group: GroupId) -> Self {
        Self {
            id,
            group,
            model: None,
            dataset: None,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }
}
