//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `PersonId` where an
//! `AccountId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(AccountId, "Unique identifier for an account.");
typed_id!(PersonId, "Unique identifier for a person.");
typed_id!(CategoryId, "Unique identifier for a category.");
typed_id!(ShopId, "Unique identifier for a shop.");
typed_id!(SubscriptionId, "Unique identifier for a subscription.");
typed_id!(TransactionId, "Unique identifier for a transaction.");
typed_id!(
    CashbackMovementId,
    "Unique identifier for a cashback movement."
);
typed_id!(
    CashbackLedgerId,
    "Unique identifier for a cashback ledger row."
);
typed_id!(DebtMovementId, "Unique identifier for a debt movement.");
typed_id!(DebtLedgerId, "Unique identifier for a debt ledger row.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_ids_are_distinct_types() {
        let account = AccountId::new();
        let person = PersonId::new();
        assert_ne!(account.into_inner(), person.into_inner());
    }

    #[test]
    fn test_id_display_round_trip() {
        let id = TransactionId::new();
        let parsed = TransactionId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = DebtMovementId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_invalid_id_string() {
        assert!(AccountId::from_str("not-a-uuid").is_err());
    }
}
