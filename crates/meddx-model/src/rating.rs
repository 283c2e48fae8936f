use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{ItemId, ObserverId};

/// One observer's scalar rating of one item.
///
/// This is the common input of the reliability engines: diagnostic responses
/// become signed diagnostic scores, choice responses become the chosen
/// candidate id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub observer: ObserverId,
    pub item: ItemId,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certainty: Option<u8>,
    /// Original item of a repeated (control) measurement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_of: Option<ItemId>,
}

impl RatingRecord {
    #[must_use]
    pub fn new(observer: ObserverId, item: ItemId, value: f64) -> Self {
        Self {
            observer,
            item,
            value,
            certainty: None,
            repeat_of: None,
        }
    }

    #[must_use]
    pub fn repeating(mut self, original: ItemId) -> Self {
        self.repeat_of = Some(original);
        self
    }

    #[must_use]
    pub fn is_repeat(&self) -> bool {
        self.repeat_of.is_some()
    }
}

/// Diagnostic findings present in each image, keyed by the diagnostic
/// question showing it. An empty set means the image has no finding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroundTruth {
    labels: BTreeMap<ItemId, BTreeSet<String>>,
}

impl GroundTruth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, S>(&mut self, item: ItemId, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels
            .insert(item, labels.into_iter().map(Into::into).collect());
    }

    #[must_use]
    pub fn labels(&self, item: ItemId) -> Option<&BTreeSet<String>> {
        self.labels.get(&item)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<I, S> FromIterator<(ItemId, I)> for GroundTruth
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (ItemId, I)>>(iter: T) -> Self {
        let mut truth = Self::new();
        for (item, labels) in iter {
            truth.insert(item, labels);
        }
        truth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_truth_lookup() {
        let truth = GroundTruth::from_iter([
            (ItemId(1), vec!["nodule", "effusion"]),
            (ItemId(2), vec![]),
        ]);
        assert_eq!(truth.len(), 2);
        assert!(truth.labels(ItemId(1)).unwrap().contains("nodule"));
        assert!(truth.labels(ItemId(2)).unwrap().is_empty());
        assert!(truth.labels(ItemId(3)).is_none());
    }

    #[test]
    fn test_ground_truth_json() {
        let truth: GroundTruth = serde_json::from_str(r#"{"1":["nodule"],"2":[]}"#).unwrap();
        assert!(truth.labels(ItemId(1)).unwrap().contains("nodule"));
        assert!(truth.labels(ItemId(2)).unwrap().is_empty());
    }

    #[test]
    fn test_rating_record_json() {
        let record = RatingRecord::new(ObserverId(1), ItemId(5), -3.0).repeating(ItemId(5));
        assert!(record.is_repeat());
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"observer":1,"item":5,"value":-3.0,"repeat_of":5}"#
        );
    }
}
