//! Property-based tests for the reversing journal.

use proptest::prelude::*;
use revoice_shared::types::{AccountId, round_currency};
use rust_decimal::Decimal;

use super::posting::{PostingAccounts, PostingInput, PostingService};
use crate::ledger::{EntryType, JournalLine};

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn discount() -> impl Strategy<Value = Decimal> {
    // 0.0 % to 100.0 % in tenths
    (0i64..=1000i64).prop_map(|tenths| Decimal::new(tenths, 1))
}

fn input(cost: Decimal, selling: Decimal, discount_pct: Decimal) -> PostingInput {
    PostingInput {
        total_cost_price: cost,
        total_selling_price: selling,
        discount_pct,
        cash_account: AccountId::new(300),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The generated journal always balances and carries only positive lines.
    #[test]
    fn prop_journal_balances(cost in amount(), selling in amount(), pct in discount()) {
        let plan = PostingService::build(
            &input(cost, selling, pct),
            &PostingAccounts::default(),
        ).unwrap();

        let net: Decimal = plan.journal.iter().map(JournalLine::signed_amount).sum();
        prop_assert_eq!(net, Decimal::ZERO);
        prop_assert!(plan.journal.iter().all(|line| line.amount > Decimal::ZERO));
        prop_assert!(plan.journal.len() <= 4);
    }

    /// The final price has at most two decimal places and never exceeds the
    /// undiscounted price.
    #[test]
    fn prop_final_price_is_rounded(selling in amount(), pct in discount()) {
        let plan = PostingService::build(
            &input(Decimal::ZERO, selling, pct),
            &PostingAccounts::default(),
        ).unwrap();

        prop_assert_eq!(plan.final_sold_price, round_currency(plan.final_sold_price));
        prop_assert!(plan.final_sold_price >= Decimal::ZERO);
        prop_assert!(plan.final_sold_price <= selling);
    }

    /// The invoice delta mirrors the journal amounts.
    #[test]
    fn prop_delta_matches_journal(cost in amount(), selling in amount(), pct in discount()) {
        let accounts = PostingAccounts::default();
        let plan = PostingService::build(&input(cost, selling, pct), &accounts).unwrap();

        prop_assert_eq!(plan.invoice_delta.cost_price, cost);
        prop_assert_eq!(plan.invoice_delta.price_before_discount, selling);
        prop_assert_eq!(plan.invoice_delta.price_after_discount, plan.final_sold_price);

        let debited_to = |account: AccountId| -> Decimal {
            plan.journal
                .iter()
                .filter(|l| l.account_id == account && l.entry_type == EntryType::Debit)
                .map(|l| l.amount)
                .sum()
        };
        prop_assert_eq!(debited_to(accounts.sales), plan.final_sold_price);
        prop_assert_eq!(debited_to(accounts.stock), cost);
    }
}
