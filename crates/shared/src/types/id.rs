//! Typed IDs for type-safe row references.
//!
//! Every table in the inventory ledger is keyed by a 64-bit integer. Wrapping
//! them prevents accidentally passing an `ItemId` where a `WarehouseId` is
//! expected, which matters a lot when a stock key is four integers wide.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Creates an ID from a raw row identifier.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw row identifier.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
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
    };
}

typed_id!(InvoiceId, "Identifier of a posted sales invoice.");
typed_id!(InvoiceItemId, "Identifier of a single invoice item line.");
typed_id!(ItemId, "Identifier of a stock item.");
typed_id!(WarehouseId, "Identifier of a warehouse.");
typed_id!(
    ReceiptNoteId,
    "Identifier of a goods received note (the receipt lot)."
);
typed_id!(
    TransferId,
    "Identifier of an inventory transfer (the transfer lot)."
);
typed_id!(StockLineId, "Identifier of a current-stock row.");
typed_id!(AccountId, "Identifier of a chart of accounts entry.");
typed_id!(UserId, "Identifier of a user.");
typed_id!(TransactionId, "Identifier of a financial transaction.");
