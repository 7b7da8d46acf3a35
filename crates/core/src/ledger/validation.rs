//! Business rule validation for ledger operations.

use rust_decimal::Decimal;
use thiserror::Error;

use super::entry::{EntryType, JournalLine};

/// Validation errors for ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerValidationError {
    /// Journal lines do not balance.
    #[error("Journal is unbalanced: debits ({debits}) != credits ({credits})")]
    Unbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Journal has no lines.
    #[error("Journal must have at least one line")]
    NoEntries,

    /// Journal has only one side (all debits or all credits).
    #[error("Journal must have both debit and credit lines")]
    SingleSided,

    /// Line amount is zero or negative.
    #[error("Journal line amount must be positive")]
    InvalidAmount,
}

impl LedgerValidationError {
    /// Returns the error code for reporting.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unbalanced { .. } => "UNBALANCED_JOURNAL",
            Self::NoEntries => "NO_JOURNAL_LINES",
            Self::SingleSided => "SINGLE_SIDED_JOURNAL",
            Self::InvalidAmount => "INVALID_JOURNAL_AMOUNT",
        }
    }
}

/// Validates that a set of journal lines is balanced.
///
/// # Errors
///
/// Returns an error if the lines are not balanced or violate business rules.
pub fn validate_entries(entries: &[JournalLine]) -> Result<(), LedgerValidationError> {
    if entries.is_empty() {
        return Err(LedgerValidationError::NoEntries);
    }

    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for entry in entries {
        if entry.amount <= Decimal::ZERO {
            return Err(LedgerValidationError::InvalidAmount);
        }

        match entry.entry_type {
            EntryType::Debit => {
                total_debits += entry.amount;
                has_debit = true;
            }
            EntryType::Credit => {
                total_credits += entry.amount;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(LedgerValidationError::SingleSided);
    }

    if total_debits != total_credits {
        return Err(LedgerValidationError::Unbalanced {
            debits: total_debits,
            credits: total_credits,
        });
    }

    Ok(())
}
