//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `LedgerId` where a `PostingId` is expected.
//! Ids are assigned sequentially by the store, so ordering by id matches insertion order.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Creates an ID from a raw sequence value.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw sequence value.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

typed_id!(LedgerId, "Unique identifier for a daily ledger.");
typed_id!(JournalEntryId, "Unique identifier for a journal line.");
typed_id!(PettyCashId, "Unique identifier for a petty cash entry.");
typed_id!(PostingId, "Unique identifier for a posting snapshot.");
typed_id!(
    PostingDetailId,
    "Unique identifier for one frozen line of a posting."
);
typed_id!(AccountId, "Unique identifier for a chart of accounts entry.");
typed_id!(UserId, "Unique identifier for a user.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_id_display() {
        assert_eq!(LedgerId::new(42).to_string(), "42");
    }

    #[test]
    fn test_typed_id_from_str() {
        assert_eq!(PostingId::from_str(" 7 ").unwrap(), PostingId(7));
        assert!(PostingId::from_str("seven").is_err());
    }

    #[test]
    fn test_typed_id_ordering_follows_sequence() {
        let mut ids = vec![JournalEntryId(3), JournalEntryId(1), JournalEntryId(2)];
        ids.sort();
        assert_eq!(ids, vec![JournalEntryId(1), JournalEntryId(2), JournalEntryId(3)]);
    }

    #[test]
    fn test_typed_id_serializes_transparently() {
        let json = serde_json::to_string(&AccountId(110)).unwrap();
        assert_eq!(json, "110");
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AccountId(110));
    }
}
