//! Observer responses.
//!
//! A questionnaire mixes two kinds of questions, so a response is a tagged
//! sum type discriminated by its `type` field:
//!
//! ```json
//! { "type": "diagnostic", "observer": 1, "item": 10, "label": "nodule", "certainty": 4 }
//! { "type": "choice", "observer": 1, "question": 20, "group": 3,
//!   "candidate_a": 7, "candidate_b": 8, "choice": 8 }
//! ```
//!
//! Repeated (control) questions carry `repeat_of`, the question whose answer
//! they repeat.

use serde::{Deserialize, Serialize};

use crate::{CandidateId, GroupId, ItemId, ObserverId};

/// Label meaning "the observer could not judge the image".
pub const NOT_APPLICABLE: &str = "not_applicable";
/// Label meaning "no finding"; correct for every image.
pub const NO_FINDING: &str = "none";

/// Answer to a diagnostic question: which finding the image shows, and how
/// sure the observer is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticResponse {
    pub observer: ObserverId,
    pub item: ItemId,
    pub label: String,
    /// Confidence on a 1..=5 scale.
    pub certainty: u8,
    /// Set on control responses. Diagnostic control questions reuse the
    /// original question, so this equals `item`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_of: Option<ItemId>,
}

/// Answer to a pairwise comparison question: which of two images is better.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceResponse {
    pub observer: ObserverId,
    pub question: ItemId,
    pub group: GroupId,
    pub candidate_a: CandidateId,
    pub candidate_b: CandidateId,
    /// The preferred candidate, or `None` when the observer judged both equal.
    #[serde(default)]
    pub choice: Option<CandidateId>,
    /// Reference question this control question repeats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_of: Option<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Diagnostic(DiagnosticResponse),
    Choice(ChoiceResponse),
}

impl Response {
    #[must_use]
    pub fn observer(&self) -> ObserverId {
        match self {
            Self::Diagnostic(r) => r.observer,
            Self::Choice(r) => r.observer,
        }
    }

    #[must_use]
    pub fn repeat_of(&self) -> Option<ItemId> {
        match self {
            Self::Diagnostic(r) => r.repeat_of,
            Self::Choice(r) => r.repeat_of,
        }
    }

    #[must_use]
    pub fn as_diagnostic(&self) -> Option<&DiagnosticResponse> {
        match self {
            Self::Diagnostic(r) => Some(r),
            Self::Choice(_) => None,
        }
    }

    #[must_use]
    pub fn as_choice(&self) -> Option<&ChoiceResponse> {
        match self {
            Self::Choice(r) => Some(r),
            Self::Diagnostic(_) => None,
        }
    }
}

impl From<DiagnosticResponse> for Response {
    fn from(response: DiagnosticResponse) -> Self {
        Self::Diagnostic(response)
    }
}

impl From<ChoiceResponse> for Response {
    fn from(response: ChoiceResponse) -> Self {
        Self::Choice(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_json_contract() {
        let json = r#"{"type":"diagnostic","observer":1,"item":10,"label":"nodule","certainty":4}"#;
        let response: Response = serde_json::from_str(json).unwrap();
        assert!(response.is_diagnostic());
        assert_eq!(response.observer(), ObserverId(1));
        assert_eq!(response.repeat_of(), None);
        let diagnostic = response.as_diagnostic().unwrap();
        assert_eq!(diagnostic.label, "nodule");
        assert_eq!(serde_json::to_string(&response).unwrap(), json);
    }

    #[test]
    fn test_choice_json_contract() {
        let json = r#"{"type":"choice","observer":2,"question":20,"group":3,"candidate_a":7,"candidate_b":8,"choice":8,"repeat_of":19}"#;
        let response: Response = serde_json::from_str(json).unwrap();
        let choice = response.as_choice().unwrap();
        assert_eq!(choice.choice, Some(CandidateId(8)));
        assert_eq!(response.repeat_of(), Some(ItemId(19)));
        assert_eq!(serde_json::to_string(&response).unwrap(), json);
    }

    #[test]
    fn test_choice_without_preference() {
        let json = r#"{"type":"choice","observer":2,"question":20,"group":3,"candidate_a":7,"candidate_b":8}"#;
        let response: Response = serde_json::from_str(json).unwrap();
        assert_eq!(response.as_choice().unwrap().choice, None);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let json = r#"{"type":"free_text","observer":1}"#;
        assert!(serde_json::from_str::<Response>(json).is_err());
    }
}
