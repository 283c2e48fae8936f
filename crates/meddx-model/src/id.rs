//! Strongly typed identifiers.
//!
//! Ids are assigned by the response store and are opaque to the analytics
//! core; the newtypes only keep observers, questions, images and groups from
//! being mixed up.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            derive_more::Display,
            derive_more::From,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// A study participant.
    ObserverId
);
define_id!(
    /// A question of the questionnaire; for diagnostic questions this is also
    /// the key of the ground-truth table.
    ItemId
);
define_id!(
    /// An image taking part in pairwise comparisons.
    CandidateId
);
define_id!(
    /// A set of mutually comparable candidates.
    GroupId
);
