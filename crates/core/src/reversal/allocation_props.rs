//! Property-based tests for first-fit allocation.

use proptest::prelude::*;
use revoice_shared::types::{InvoiceId, InvoiceItemId, ItemId, ReceiptNoteId, WarehouseId};
use rust_decimal::Decimal;

use super::allocation::AllocationResolver;
use super::error::ReversalError;
use super::request::{ReturnLine, ReturnRequest};
use super::types::{InvoiceItemLine, Lot};

/// Strategy for invoice lines of items 1..=3 with unique ids.
fn lines_strategy() -> impl Strategy<Value = Vec<InvoiceItemLine>> {
    prop::collection::vec((1i64..=3, 0i32..20, 1i64..10_000, 1i64..10_000), 1..8).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(index, (item, quantity, cost, price))| {
                    let id = i64::try_from(index).unwrap_or_default() + 1;
                    InvoiceItemLine {
                        id: InvoiceItemId::new(id),
                        warehouse_id: WarehouseId::new(1),
                        item_id: ItemId::new(item),
                        lot: Lot::DirectReceipt(ReceiptNoteId::new(id)),
                        quantity,
                        unit_cost_price: Decimal::new(cost, 2),
                        unit_selling_price: Decimal::new(price, 2),
                    }
                })
                .collect()
        },
    )
}

fn sold(lines: &[InvoiceItemLine], item: ItemId) -> i32 {
    lines
        .iter()
        .filter(|line| line.item_id == item)
        .map(|line| line.quantity)
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A request within the sold quantity is met exactly and never takes
    /// more from a line than it holds.
    #[test]
    fn prop_allocation_conserves_quantity(
        lines in lines_strategy(),
        item in 1i64..=3,
        fraction in 1i32..=100,
    ) {
        let item_id = ItemId::new(item);
        let available = sold(&lines, item_id);
        prop_assume!(available > 0);
        let qty = (available * fraction / 100).max(1);

        let request = ReturnRequest::partial(
            InvoiceId::new(1),
            vec![ReturnLine { item_id, qty }],
        );
        let allocation = AllocationResolver::resolve(&request, &lines).unwrap();

        prop_assert_eq!(allocation.quantity_for(item_id), qty);
        for portion in &allocation.portions {
            prop_assert!(portion.quantity > 0);
            prop_assert!(portion.quantity <= portion.line.quantity);
            prop_assert_eq!(portion.line.item_id, item_id);
        }
    }

    /// Portions for one item are taken in ascending line id, and every line
    /// before the last touched one is drained.
    #[test]
    fn prop_allocation_is_first_fit(
        lines in lines_strategy(),
        item in 1i64..=3,
        fraction in 1i32..=100,
    ) {
        let item_id = ItemId::new(item);
        let available = sold(&lines, item_id);
        prop_assume!(available > 0);
        let qty = (available * fraction / 100).max(1);

        let request = ReturnRequest::partial(
            InvoiceId::new(1),
            vec![ReturnLine { item_id, qty }],
        );
        let allocation = AllocationResolver::resolve(&request, &lines).unwrap();

        let ids: Vec<InvoiceItemId> = allocation.portions.iter().map(|p| p.line.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        prop_assert_eq!(&ids, &sorted);

        let (last, drained) = allocation.portions.split_last().unwrap();
        for portion in drained {
            prop_assert_eq!(portion.quantity, portion.line.quantity);
        }
        prop_assert!(last.quantity <= last.line.quantity);
    }

    /// Asking for more than was sold always fails with the exact shortfall.
    #[test]
    fn prop_overdraw_reports_shortfall(
        lines in lines_strategy(),
        item in 1i64..=3,
        extra in 1i32..50,
    ) {
        let item_id = ItemId::new(item);
        let available = sold(&lines, item_id);
        prop_assume!(available > 0);

        let request = ReturnRequest::partial(
            InvoiceId::new(1),
            vec![ReturnLine { item_id, qty: available + extra }],
        );
        let err = AllocationResolver::resolve(&request, &lines).unwrap_err();

        prop_assert!(
            matches!(err, ReversalError::InsufficientQuantity { unmet, .. } if unmet == extra),
            "unexpected error: {err:?}"
        );
    }

    /// Totals are the sums of the portions' prices.
    #[test]
    fn prop_totals_match_portions(lines in lines_strategy()) {
        let allocation = AllocationResolver::allocate_all(&lines);

        let cost: Decimal = allocation.portions.iter().map(|p| p.cost_price()).sum();
        let selling: Decimal = allocation.portions.iter().map(|p| p.selling_price()).sum();
        prop_assert_eq!(allocation.total_cost_price, cost);
        prop_assert_eq!(allocation.total_selling_price, selling);

        let units: i32 = allocation.portions.iter().map(|p| p.quantity).sum();
        let sold_units: i32 = lines.iter().map(|l| l.quantity).sum();
        prop_assert_eq!(units, sold_units);
    }

    /// The same input always yields the same allocation.
    #[test]
    fn prop_allocation_is_deterministic(lines in lines_strategy(), item in 1i64..=3) {
        let item_id = ItemId::new(item);
        prop_assume!(sold(&lines, item_id) > 0);

        let request = ReturnRequest::partial(
            InvoiceId::new(1),
            vec![ReturnLine { item_id, qty: 1 }],
        );
        let first = AllocationResolver::resolve(&request, &lines).unwrap();
        let second = AllocationResolver::resolve(&request, &lines).unwrap();
        prop_assert_eq!(first, second);
    }
}
