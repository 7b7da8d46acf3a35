//! Reversal domain types.
//!
//! These are transient views over persistent rows: the store loads them, the
//! pure phases reason about them, and the store writes the resulting deltas.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use revoice_shared::types::{
    InvoiceId, InvoiceItemId, ItemId, ReceiptNoteId, StockLineId, TransactionId, TransferId,
    UserId, WarehouseId,
};

use super::allocation::AllocatedPortion;

/// The stock lot an invoice line was sold from.
///
/// Every lot starts with a goods received note. Stock that has since moved
/// between warehouses is additionally tracked per inventory transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lot {
    /// Stock received directly into the warehouse.
    DirectReceipt(ReceiptNoteId),
    /// Stock that arrived through an inventory transfer.
    Transfer {
        /// The originating goods received note.
        receipt: ReceiptNoteId,
        /// The inventory transfer that moved it.
        transfer: TransferId,
    },
}

impl Lot {
    /// Builds a lot from the nullable column pair used in storage.
    #[must_use]
    pub const fn from_columns(receipt: ReceiptNoteId, transfer: Option<TransferId>) -> Self {
        match transfer {
            Some(transfer) => Self::Transfer { receipt, transfer },
            None => Self::DirectReceipt(receipt),
        }
    }

    /// The goods received note of this lot.
    #[must_use]
    pub const fn receipt(&self) -> ReceiptNoteId {
        match self {
            Self::DirectReceipt(receipt) | Self::Transfer { receipt, .. } => *receipt,
        }
    }

    /// The inventory transfer, if the lot came through one.
    #[must_use]
    pub const fn transfer(&self) -> Option<TransferId> {
        match self {
            Self::DirectReceipt(_) => None,
            Self::Transfer { transfer, .. } => Some(*transfer),
        }
    }
}

impl std::fmt::Display for Lot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectReceipt(receipt) => write!(f, "GRN {receipt}"),
            Self::Transfer { receipt, transfer } => {
                write!(f, "GRN {receipt} via transfer {transfer}")
            }
        }
    }
}

/// Exact identity of a current-stock row.
///
/// A return may only restock into the lot it was sold from, so all four
/// parts must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockKey {
    /// Warehouse holding the stock.
    pub warehouse_id: WarehouseId,
    /// Stocked item.
    pub item_id: ItemId,
    /// Lot of the stock.
    pub lot: Lot,
}

impl std::fmt::Display for StockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "warehouse {} / item {} / {}",
            self.warehouse_id, self.item_id, self.lot
        )
    }
}

/// One line of a posted invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItemLine {
    /// Row identifier; also the stable allocation order.
    pub id: InvoiceItemId,
    /// Warehouse the invoice sold from.
    pub warehouse_id: WarehouseId,
    /// Sold item.
    pub item_id: ItemId,
    /// Lot the goods were taken from.
    pub lot: Lot,
    /// Quantity that currently remains sold on this line.
    pub quantity: i32,
    /// Unit cost price.
    pub unit_cost_price: Decimal,
    /// Unit selling price before invoice discount.
    pub unit_selling_price: Decimal,
}

impl InvoiceItemLine {
    /// The stock row this line was sold from.
    #[must_use]
    pub const fn stock_key(&self) -> StockKey {
        StockKey {
            warehouse_id: self.warehouse_id,
            item_id: self.item_id,
            lot: self.lot,
        }
    }
}

/// Current on-hand quantity for one stock key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLine {
    /// Row identifier.
    pub id: StockLineId,
    /// Identity of the row.
    pub key: StockKey,
    /// Quantity on hand (never negative).
    pub quantity: i32,
    /// Unit price of the lot.
    pub price: Decimal,
}

/// Header of a posted invoice with its running totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Invoice identifier.
    pub id: InvoiceId,
    /// User that issued the invoice; owns the cash-in-hand account.
    pub user_id: UserId,
    /// Warehouse the goods left from.
    pub warehouse_id: WarehouseId,
    /// Discount percentage applied to the selling price (0-100).
    pub discount: Decimal,
    /// Total cost price of the remaining lines.
    pub cost_price: Decimal,
    /// Total selling price before discount.
    pub price_before_discount: Decimal,
    /// Total selling price after discount.
    pub price_after_discount: Decimal,
}

/// Summary of a completed reversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReversalOutcome {
    /// The invoice and its original transaction were removed.
    Full {
        /// The reversed invoice.
        invoice_id: InvoiceId,
        /// Lines whose stock was restored.
        restocked: Vec<AllocatedPortion>,
        /// Number of invoice lines deleted.
        deleted_lines: u64,
        /// The original sale transaction, if one was found and deleted.
        deleted_transaction_id: Option<TransactionId>,
    },
    /// Part of the invoice was returned and a reversing posting was written.
    Partial {
        /// The reduced invoice.
        invoice_id: InvoiceId,
        /// Returned portions in allocation order.
        returned: Vec<AllocatedPortion>,
        /// Cost of the returned goods.
        total_cost_price: Decimal,
        /// Selling price of the returned goods before discount.
        total_selling_price: Decimal,
        /// Selling price after the invoice discount, rounded to cents.
        final_sold_price: Decimal,
        /// The reversing transaction, absent when every amount was zero.
        transaction_id: Option<TransactionId>,
    },
}

impl ReversalOutcome {
    /// The invoice this outcome refers to.
    #[must_use]
    pub const fn invoice_id(&self) -> InvoiceId {
        match self {
            Self::Full { invoice_id, .. } | Self::Partial { invoice_id, .. } => *invoice_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lot_from_columns() {
        let direct = Lot::from_columns(ReceiptNoteId::new(11), None);
        assert_eq!(direct, Lot::DirectReceipt(ReceiptNoteId::new(11)));
        assert_eq!(direct.transfer(), None);

        let moved = Lot::from_columns(ReceiptNoteId::new(11), Some(TransferId::new(4)));
        assert_eq!(moved.receipt(), ReceiptNoteId::new(11));
        assert_eq!(moved.transfer(), Some(TransferId::new(4)));
    }

    #[test]
    fn test_direct_and_transfer_lots_differ() {
        let direct = Lot::DirectReceipt(ReceiptNoteId::new(11));
        let moved = Lot::Transfer {
            receipt: ReceiptNoteId::new(11),
            transfer: TransferId::new(4),
        };
        assert_ne!(direct, moved);
    }

    #[test]
    fn test_stock_key_display() {
        let key = StockKey {
            warehouse_id: WarehouseId::new(1),
            item_id: ItemId::new(5),
            lot: Lot::Transfer {
                receipt: ReceiptNoteId::new(11),
                transfer: TransferId::new(4),
            },
        };
        assert_eq!(
            key.to_string(),
            "warehouse 1 / item 5 / GRN 11 via transfer 4"
        );
    }
}
