//! Reversal orchestrator.
//!
//! Picks full or partial mode, runs allocation, mutation and posting against
//! one [`ReversalStore`], then commits. Any error rolls the store back.

use chrono::Utc;

use revoice_shared::types::UserId;

use super::allocation::{Allocation, AllocationResolver};
use super::error::ReversalError;
use super::posting::{PostingAccounts, PostingInput, PostingService};
use super::request::{ReturnRequest, ReversalMode};
use super::store::{NewTransactionRecord, ReversalStore};
use super::types::{InvoiceHeader, ReversalOutcome};

/// Sequences a reversal inside one unit of work.
#[derive(Debug, Clone, Copy)]
pub struct ReversalEngine {
    accounts: PostingAccounts,
    posted_by: UserId,
}

impl ReversalEngine {
    /// Creates an engine posting to `accounts` on behalf of `posted_by`.
    #[must_use]
    pub const fn new(accounts: PostingAccounts, posted_by: UserId) -> Self {
        Self {
            accounts,
            posted_by,
        }
    }

    /// Reverses an invoice and commits, or rolls back on any error.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any step. By then every write made
    /// through `store` has been rolled back.
    pub async fn reverse<S: ReversalStore>(
        &self,
        mut store: S,
        request: &ReturnRequest,
    ) -> Result<ReversalOutcome, ReversalError> {
        match self.run(&mut store, request).await {
            Ok(outcome) => {
                store.commit().await?;
                tracing::info!(invoice_id = %request.invoice_id, "invoice reversal committed");
                Ok(outcome)
            }
            Err(err) => {
                if let Err(rollback_err) = store.rollback().await {
                    tracing::error!(
                        invoice_id = %request.invoice_id,
                        error = %rollback_err,
                        "rollback failed"
                    );
                }
                tracing::warn!(
                    invoice_id = %request.invoice_id,
                    error_code = err.error_code(),
                    error = %err,
                    "invoice reversal rolled back"
                );
                Err(err)
            }
        }
    }

    async fn run<S: ReversalStore>(
        &self,
        store: &mut S,
        request: &ReturnRequest,
    ) -> Result<ReversalOutcome, ReversalError> {
        request.validate()?;

        let header = store
            .lock_invoice(request.invoice_id)
            .await?
            .ok_or(ReversalError::NoInvoiceItems(request.invoice_id))?;

        match request.mode() {
            ReversalMode::Full => Self::reverse_full(store, request, &header).await,
            ReversalMode::Partial(_) => self.reverse_partial(store, request, &header).await,
        }
    }

    async fn reverse_full<S: ReversalStore>(
        store: &mut S,
        request: &ReturnRequest,
        header: &InvoiceHeader,
    ) -> Result<ReversalOutcome, ReversalError> {
        let lines = store.lock_invoice_lines(header, None).await?;
        let allocation = AllocationResolver::resolve(request, &lines)?;

        restock(store, &allocation, false).await?;

        let sale_transaction = store.find_sale_transaction(header.id).await?;
        let deleted_lines = store.delete_invoice(header.id).await?;

        match sale_transaction {
            Some(transaction_id) => {
                let journal_lines = store.delete_journal_entries(transaction_id).await?;
                store.delete_transaction(transaction_id).await?;
                tracing::info!(
                    invoice_id = %header.id,
                    transaction_id = %transaction_id,
                    journal_lines,
                    "deleted original sale transaction"
                );
            }
            None => {
                tracing::warn!(
                    invoice_id = %header.id,
                    "no sale transaction found for invoice, nothing to unpost"
                );
            }
        }

        Ok(ReversalOutcome::Full {
            invoice_id: header.id,
            restocked: allocation.portions,
            deleted_lines,
            deleted_transaction_id: sale_transaction,
        })
    }

    async fn reverse_partial<S: ReversalStore>(
        &self,
        store: &mut S,
        request: &ReturnRequest,
        header: &InvoiceHeader,
    ) -> Result<ReversalOutcome, ReversalError> {
        let items = request.requested_items();
        let lines = store.lock_invoice_lines(header, Some(&items)).await?;
        let allocation = AllocationResolver::resolve(request, &lines)?;

        let cash_account = store.cash_account_of(header.user_id).await?.ok_or(
            ReversalError::AccountLookupFailed {
                invoice_id: header.id,
                user_id: header.user_id,
            },
        )?;

        restock(store, &allocation, true).await?;

        let plan = PostingService::build(
            &PostingInput {
                total_cost_price: allocation.total_cost_price,
                total_selling_price: allocation.total_selling_price,
                discount_pct: header.discount,
                cash_account,
            },
            &self.accounts,
        )?;
        tracing::debug!(
            invoice_id = %header.id,
            cost_price = %allocation.total_cost_price,
            selling_price = %allocation.total_selling_price,
            final_sold_price = %plan.final_sold_price,
            "computed reversal totals"
        );

        store.apply_invoice_delta(header, &plan.invoice_delta).await?;

        let transaction_id = if plan.journal.is_empty() {
            None
        } else {
            let now = Utc::now().naive_utc();
            let record = NewTransactionRecord {
                user_id: self.posted_by,
                invoice_id: header.id,
                datetime: now,
                posting_date: now.date(),
                remark: request.reversal_remark(),
            };
            let transaction_id = store.insert_transaction(&record).await?;
            store
                .issue_journal_entries(transaction_id, &plan.journal)
                .await?;
            Some(transaction_id)
        };

        Ok(ReversalOutcome::Partial {
            invoice_id: header.id,
            returned: allocation.portions,
            total_cost_price: allocation.total_cost_price,
            total_selling_price: allocation.total_selling_price,
            final_sold_price: plan.final_sold_price,
            transaction_id,
        })
    }
}

/// Returns every allocated portion to the lot it was sold from.
///
/// With `decrement_lines`, the invoice line is reduced by the same amount;
/// a full reversal deletes the lines instead.
async fn restock<S: ReversalStore>(
    store: &mut S,
    allocation: &Allocation,
    decrement_lines: bool,
) -> Result<(), ReversalError> {
    for portion in &allocation.portions {
        let key = portion.line.stock_key();
        let stock = store
            .lock_stock_line(&key)
            .await?
            .ok_or(ReversalError::StockLineNotFound(key))?;

        let updated = store.add_stock(&stock, portion.quantity).await?;
        tracing::debug!(
            stock_key = %key,
            before = stock.quantity,
            after = updated.quantity,
            "restocked"
        );

        if decrement_lines {
            store
                .decrement_invoice_line(portion.line.id, portion.quantity)
                .await?;
        }
    }
    Ok(())
}
