//! Reversal error types.
//!
//! Every error aborts the whole reversal. Nothing is retried internally and no
//! partial state survives: the store rolls back all prior writes of the call.

use thiserror::Error;

use revoice_shared::types::{InvoiceId, ItemId, UserId};

use super::types::StockKey;
use crate::ledger::LedgerValidationError;

/// Errors that can occur while reversing an invoice.
#[derive(Debug, Error)]
pub enum ReversalError {
    /// The payload could not be parsed into a reversal request.
    #[error("Malformed reversal request: {0}")]
    MalformedRequest(String),

    /// The invoice has no item lines, or none of the requested items.
    #[error("Could not retrieve items from invoice {0} to be reversed")]
    NoInvoiceItems(InvoiceId),

    /// More was requested back than remains sold for an item.
    #[error(
        "Unable to return {requested} of item {item_id}: {unmet} more than remains sold on the invoice"
    )]
    InsufficientQuantity {
        /// The item that could not be satisfied.
        item_id: ItemId,
        /// Quantity the caller asked to return.
        requested: i32,
        /// Quantity left over after every matching line was exhausted.
        unmet: i32,
    },

    /// The stock row an invoice line was sold from no longer exists.
    #[error("No current stock line for {0}")]
    StockLineNotFound(StockKey),

    /// The user owning the invoice has no cash-in-hand account.
    #[error("No cash account linked to user {user_id} of invoice {invoice_id}")]
    AccountLookupFailed {
        /// The invoice being reversed.
        invoice_id: InvoiceId,
        /// The invoice's owning user.
        user_id: UserId,
    },

    /// The reversing journal failed double-entry validation.
    #[error("Reversal journal rejected: {0}")]
    UnbalancedJournal(#[from] LedgerValidationError),

    /// The underlying store failed to read or write.
    #[error("Store failure: {0}")]
    StoreFailure(String),
}

impl ReversalError {
    /// Returns the error code reported to callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedRequest(_) => "MALFORMED_REQUEST",
            Self::NoInvoiceItems(_) => "NO_INVOICE_ITEMS",
            Self::InsufficientQuantity { .. } => "INSUFFICIENT_QUANTITY",
            Self::StockLineNotFound(_) => "STOCK_LINE_NOT_FOUND",
            Self::AccountLookupFailed { .. } => "ACCOUNT_LOOKUP_FAILED",
            Self::UnbalancedJournal(_) => "UNBALANCED_JOURNAL",
            Self::StoreFailure(_) => "STORE_FAILURE",
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Always false: a failed reversal surfaces immediately. Resubmitting the
    /// same request is the caller's decision.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        false
    }
}
