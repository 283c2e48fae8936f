//! Rating table: rating records grouped by observer, split into original
//! and repeated measurements.

use std::collections::{BTreeMap, BTreeSet};

use meddx_model::{ItemId, ObserverId, RatingRecord};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RatingTableError {
    #[display("observer {observer} rated item {item} more than once")]
    DuplicateRating { observer: ObserverId, item: ItemId },
    #[display("observer {observer} gave a non-finite rating for item {item}")]
    NonFiniteRating { observer: ObserverId, item: ItemId },
}

/// A repeated measurement matched with the original it repeats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepeatedPair {
    pub item: ItemId,
    pub original: f64,
    pub repeat: f64,
}

#[derive(Debug, Clone, Default)]
struct ObserverRatings {
    /// Non-repeated ratings in input order.
    originals: Vec<(ItemId, f64)>,
    /// Repeated ratings in input order, keyed by the item they repeat.
    repeats: Vec<(ItemId, f64)>,
}

/// Ratings of every observer, ordered by observer id.
#[derive(Debug, Clone, Default)]
pub struct RatingTable {
    observers: BTreeMap<ObserverId, ObserverRatings>,
}

impl RatingTable {
    /// Groups `records` by observer.
    ///
    /// Each observer may rate an item at most once outside of repeated
    /// measurements; repeats may occur any number of times.
    pub fn new<'a, I>(records: I) -> Result<Self, RatingTableError>
    where
        I: IntoIterator<Item = &'a RatingRecord>,
    {
        let mut observers = BTreeMap::<ObserverId, ObserverRatings>::new();
        let mut seen = BTreeSet::new();
        for record in records {
            if !record.value.is_finite() {
                return Err(RatingTableError::NonFiniteRating {
                    observer: record.observer,
                    item: record.item,
                });
            }
            let ratings = observers.entry(record.observer).or_default();
            match record.repeat_of {
                Some(original) => ratings.repeats.push((original, record.value)),
                None => {
                    if !seen.insert((record.observer, record.item)) {
                        return Err(RatingTableError::DuplicateRating {
                            observer: record.observer,
                            item: record.item,
                        });
                    }
                    ratings.originals.push((record.item, record.value));
                }
            }
        }
        debug!(observers = observers.len(), "built rating table");
        Ok(Self { observers })
    }

    pub fn observers(&self) -> impl Iterator<Item = ObserverId> + '_ {
        self.observers.keys().copied()
    }

    #[must_use]
    pub fn num_observers(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Non-repeated ratings of `observer` in input order.
    #[must_use]
    pub fn original_ratings(&self, observer: ObserverId) -> &[(ItemId, f64)] {
        self.observers
            .get(&observer)
            .map_or(&[], |r| r.originals.as_slice())
    }

    /// Values of [`Self::original_ratings`].
    #[must_use]
    pub fn original_values(&self, observer: ObserverId) -> Vec<f64> {
        self.original_ratings(observer)
            .iter()
            .map(|&(_, v)| v)
            .collect()
    }

    /// Every item with a non-repeated rating, ascending.
    #[must_use]
    pub fn items(&self) -> Vec<ItemId> {
        self.observers
            .values()
            .flat_map(|r| r.originals.iter().map(|&(item, _)| item))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Non-repeated ratings of `observer` aligned to `items`, `None` where
    /// the observer did not rate an item.
    #[must_use]
    pub fn aligned_values(&self, observer: ObserverId, items: &[ItemId]) -> Vec<Option<f64>> {
        let ratings = self
            .original_ratings(observer)
            .iter()
            .copied()
            .collect::<BTreeMap<_, _>>();
        items.iter().map(|item| ratings.get(item).copied()).collect()
    }

    /// Matches each repeated rating of `observer` with the observer's
    /// original rating of the same item. Repeats without an original are
    /// skipped with a warning.
    #[must_use]
    pub fn repeated_pairs(&self, observer: ObserverId) -> Vec<RepeatedPair> {
        let Some(ratings) = self.observers.get(&observer) else {
            return vec![];
        };
        let originals = ratings
            .originals
            .iter()
            .copied()
            .collect::<BTreeMap<_, _>>();
        ratings
            .repeats
            .iter()
            .filter_map(|&(item, repeat)| {
                let Some(&original) = originals.get(&item) else {
                    warn!(
                        observer = %observer,
                        item = %item,
                        "repeated rating has no original counterpart; skipped"
                    );
                    return None;
                };
                Some(RepeatedPair {
                    item,
                    original,
                    repeat,
                })
            })
            .collect()
    }
}
