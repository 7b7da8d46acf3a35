//! Double-entry bookkeeping logic.
//!
//! This module implements the parts of the ledger the reversal engine needs:
//! - Journal lines (debits and credits against an account)
//! - Business rule validation for a set of journal lines

pub mod entry;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use entry::{EntryType, JournalLine};
pub use validation::{LedgerValidationError, validate_entries};
