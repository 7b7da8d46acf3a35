//! Property-based tests for journal validation rules.

use proptest::prelude::*;
use revoice_shared::types::AccountId;
use rust_decimal::Decimal;

use super::entry::{EntryType, JournalLine};
use super::validation::{LedgerValidationError, validate_entries};

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // Generate amounts from 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate an entry type.
fn entry_type_strategy() -> impl Strategy<Value = EntryType> {
    prop_oneof![Just(EntryType::Debit), Just(EntryType::Credit)]
}

fn make_line(entry_type: EntryType, amount: Decimal) -> JournalLine {
    JournalLine {
        account_id: AccountId::new(1),
        entry_type,
        amount,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any set of debit/credit pairs with matching amounts validates.
    #[test]
    fn prop_paired_lines_balance(amounts in prop::collection::vec(positive_amount(), 1..8)) {
        let lines: Vec<JournalLine> = amounts
            .iter()
            .flat_map(|amount| {
                [
                    make_line(EntryType::Debit, *amount),
                    make_line(EntryType::Credit, *amount),
                ]
            })
            .collect();

        prop_assert!(validate_entries(&lines).is_ok());
        let net: Decimal = lines.iter().map(JournalLine::signed_amount).sum();
        prop_assert_eq!(net, Decimal::ZERO);
    }

    /// A zero amount anywhere in the journal is rejected.
    #[test]
    fn prop_zero_amount_rejected(
        entry_type in entry_type_strategy(),
        amount in positive_amount(),
    ) {
        let lines = vec![
            make_line(EntryType::Debit, amount),
            make_line(EntryType::Credit, amount),
            make_line(entry_type, Decimal::ZERO),
        ];
        prop_assert_eq!(validate_entries(&lines), Err(LedgerValidationError::InvalidAmount));
    }

    /// Different debit and credit totals are reported with both sums.
    #[test]
    fn prop_mismatched_totals_rejected(
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        prop_assume!(debit != credit);
        let lines = vec![
            make_line(EntryType::Debit, debit),
            make_line(EntryType::Credit, credit),
        ];
        prop_assert_eq!(
            validate_entries(&lines),
            Err(LedgerValidationError::Unbalanced { debits: debit, credits: credit })
        );
    }
}
