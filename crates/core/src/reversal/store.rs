//! Persistence seam for the reversal orchestrator.
//!
//! One `ReversalStore` value wraps one open database transaction. The
//! orchestrator passes it to every step and finally consumes it with
//! [`ReversalStore::commit`] or [`ReversalStore::rollback`]. Implementations
//! must roll back if the value is dropped without either call.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use revoice_shared::types::{
    AccountId, InvoiceId, InvoiceItemId, ItemId, TransactionId, UserId,
};

use super::error::ReversalError;
use super::posting::InvoiceTotalsDelta;
use super::types::{InvoiceHeader, InvoiceItemLine, StockKey, StockLine};
use crate::ledger::JournalLine;

/// Header of the financial transaction written by a partial reversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransactionRecord {
    /// User recorded as the author.
    pub user_id: UserId,
    /// Invoice the transaction belongs to.
    pub invoice_id: InvoiceId,
    /// Wall-clock time of the reversal.
    pub datetime: NaiveDateTime,
    /// Accounting date of the reversal.
    pub posting_date: NaiveDate,
    /// Free-text remark, see [`super::ReturnRequest::reversal_remark`].
    pub remark: String,
}

/// Prefix of the remark on every transaction written by a partial reversal.
pub const REVERSAL_REMARK_PREFIX: &str = "INVOICE REVERSAL";

/// Remark carried by the transaction of an original sale.
///
/// Only used to find sale transactions written before they were linked to
/// their invoice by id.
#[must_use]
pub fn legacy_sale_remark(invoice_id: InvoiceId) -> String {
    format!("INVOICE {invoice_id}")
}

/// Transactional access to invoices, stock and the journal.
///
/// Every `lock_*` read takes a row lock that is held until commit, so a
/// concurrent sale or reversal touching the same rows waits instead of
/// interleaving.
#[async_trait]
pub trait ReversalStore: Send {
    /// Locks and reads the invoice header.
    async fn lock_invoice(
        &mut self,
        invoice_id: InvoiceId,
    ) -> Result<Option<InvoiceHeader>, ReversalError>;

    /// Locks and reads the invoice's lines in ascending line id.
    ///
    /// With `items`, only lines for those items are returned.
    async fn lock_invoice_lines(
        &mut self,
        header: &InvoiceHeader,
        items: Option<&[ItemId]>,
    ) -> Result<Vec<InvoiceItemLine>, ReversalError>;

    /// Locks and reads the stock row with exactly this key.
    async fn lock_stock_line(&mut self, key: &StockKey)
    -> Result<Option<StockLine>, ReversalError>;

    /// Adds `quantity` to a locked stock row and returns the updated row.
    async fn add_stock(
        &mut self,
        stock: &StockLine,
        quantity: i32,
    ) -> Result<StockLine, ReversalError>;

    /// Subtracts `quantity` from an invoice line.
    async fn decrement_invoice_line(
        &mut self,
        line_id: InvoiceItemId,
        quantity: i32,
    ) -> Result<(), ReversalError>;

    /// The cash-in-hand account linked to a user, if any.
    async fn cash_account_of(&mut self, user_id: UserId)
    -> Result<Option<AccountId>, ReversalError>;

    /// Subtracts the delta from the invoice's running totals.
    async fn apply_invoice_delta(
        &mut self,
        header: &InvoiceHeader,
        delta: &InvoiceTotalsDelta,
    ) -> Result<(), ReversalError>;

    /// Inserts a financial transaction header and returns its id.
    async fn insert_transaction(
        &mut self,
        record: &NewTransactionRecord,
    ) -> Result<TransactionId, ReversalError>;

    /// Persists journal lines against a transaction.
    async fn issue_journal_entries(
        &mut self,
        transaction_id: TransactionId,
        lines: &[JournalLine],
    ) -> Result<(), ReversalError>;

    /// Finds the transaction of the original sale.
    ///
    /// Transactions linked to the invoice are preferred, lowest id first,
    /// skipping those written by earlier partial reversals. Only when none is
    /// linked is the [`legacy_sale_remark`] tried.
    async fn find_sale_transaction(
        &mut self,
        invoice_id: InvoiceId,
    ) -> Result<Option<TransactionId>, ReversalError>;

    /// Deletes a transaction's journal lines, returning how many were removed.
    async fn delete_journal_entries(
        &mut self,
        transaction_id: TransactionId,
    ) -> Result<u64, ReversalError>;

    /// Deletes a transaction header.
    async fn delete_transaction(&mut self, transaction_id: TransactionId)
    -> Result<(), ReversalError>;

    /// Deletes the invoice and all of its lines, returning the line count.
    async fn delete_invoice(&mut self, invoice_id: InvoiceId) -> Result<u64, ReversalError>;

    /// Makes every write of this store durable.
    async fn commit(self) -> Result<(), ReversalError>
    where
        Self: Sized;

    /// Discards every write of this store.
    async fn rollback(self) -> Result<(), ReversalError>
    where
        Self: Sized;
}
