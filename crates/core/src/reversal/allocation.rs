//! Allocation of requested return quantities to invoice lines.
//!
//! The resolver is pure. It decides which lines give back how many units and
//! accumulates the money involved; the orchestrator applies the result.
//!
//! Allocation is first-fit and order-preserving: for each requested item the
//! item's lines are consumed in ascending line id, skipping exhausted lines,
//! until the requested quantity is met. It does not try to pick the cheapest
//! or most expensive lot.

use rust_decimal::Decimal;
use serde::Serialize;

use revoice_shared::types::ItemId;

use super::error::ReversalError;
use super::request::{ReturnLine, ReturnRequest, ReversalMode};
use super::types::InvoiceItemLine;

/// A quantity taken back from one invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocatedPortion {
    /// The invoice line, as loaded before the reversal.
    pub line: InvoiceItemLine,
    /// Units reversed from this line.
    pub quantity: i32,
}

impl AllocatedPortion {
    /// Cost price of the reversed units.
    #[must_use]
    pub fn cost_price(&self) -> Decimal {
        self.line.unit_cost_price * Decimal::from(self.quantity)
    }

    /// Selling price of the reversed units before discount.
    #[must_use]
    pub fn selling_price(&self) -> Decimal {
        self.line.unit_selling_price * Decimal::from(self.quantity)
    }
}

/// Resolved allocation with running totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Portions in the order they must be applied.
    pub portions: Vec<AllocatedPortion>,
    /// Σ unit cost × quantity over all portions.
    pub total_cost_price: Decimal,
    /// Σ unit selling price × quantity over all portions.
    pub total_selling_price: Decimal,
}

impl Allocation {
    fn push(&mut self, line: &InvoiceItemLine, quantity: i32) {
        let portion = AllocatedPortion {
            line: line.clone(),
            quantity,
        };
        self.total_cost_price += portion.cost_price();
        self.total_selling_price += portion.selling_price();
        self.portions.push(portion);
    }

    /// Total units allocated for an item across all of its lines.
    #[must_use]
    pub fn quantity_for(&self, item_id: ItemId) -> i32 {
        self.portions
            .iter()
            .filter(|portion| portion.line.item_id == item_id)
            .map(|portion| portion.quantity)
            .sum()
    }

    /// Returns true if nothing was allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.portions.is_empty()
    }
}

/// Stateless allocation resolver.
pub struct AllocationResolver;

impl AllocationResolver {
    /// Resolves a request against the invoice's lines.
    ///
    /// # Errors
    ///
    /// - `NoInvoiceItems` if there are no lines, or none for the requested items
    /// - `InsufficientQuantity` if a requested item cannot be fully satisfied
    pub fn resolve(
        request: &ReturnRequest,
        lines: &[InvoiceItemLine],
    ) -> Result<Allocation, ReversalError> {
        if lines.is_empty() {
            return Err(ReversalError::NoInvoiceItems(request.invoice_id));
        }

        match request.mode() {
            ReversalMode::Full => Ok(Self::allocate_all(lines)),
            ReversalMode::Partial(requested) => {
                let matches_any = lines
                    .iter()
                    .any(|line| requested.iter().any(|r| r.item_id == line.item_id));
                if !matches_any {
                    return Err(ReversalError::NoInvoiceItems(request.invoice_id));
                }
                Self::allocate_requested(requested, lines)
            }
        }
    }

    /// Allocates every line at its full remaining quantity.
    ///
    /// Lines with nothing left sold are skipped.
    #[must_use]
    pub fn allocate_all(lines: &[InvoiceItemLine]) -> Allocation {
        let mut allocation = Allocation::default();
        for index in stable_order(lines) {
            let line = &lines[index];
            if line.quantity > 0 {
                allocation.push(line, line.quantity);
            }
        }
        allocation
    }

    /// Allocates the requested quantities first-fit over the lines.
    ///
    /// Remaining quantity is tracked per line for the whole request, so an
    /// item listed twice never takes the same units twice.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientQuantity` for the first item whose lines run out.
    pub fn allocate_requested(
        requested: &[ReturnLine],
        lines: &[InvoiceItemLine],
    ) -> Result<Allocation, ReversalError> {
        let order = stable_order(lines);
        let mut remaining: Vec<i32> = lines.iter().map(|line| line.quantity.max(0)).collect();
        let mut allocation = Allocation::default();

        for request in requested {
            let mut needed = request.qty;

            for &index in &order {
                if needed == 0 {
                    break;
                }
                let line = &lines[index];
                if line.item_id != request.item_id || remaining[index] == 0 {
                    continue;
                }

                let take = remaining[index].min(needed);
                remaining[index] -= take;
                needed -= take;
                allocation.push(line, take);
            }

            if needed != 0 {
                tracing::debug!(
                    item_id = %request.item_id,
                    requested = request.qty,
                    unmet = needed,
                    "requested return exceeds remaining sold quantity"
                );
                return Err(ReversalError::InsufficientQuantity {
                    item_id: request.item_id,
                    requested: request.qty,
                    unmet: needed,
                });
            }
        }

        Ok(allocation)
    }
}

/// Line indices sorted by line id; ties keep retrieval order.
fn stable_order(lines: &[InvoiceItemLine]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..lines.len()).collect();
    order.sort_by_key(|&index| lines[index].id);
    order
}
