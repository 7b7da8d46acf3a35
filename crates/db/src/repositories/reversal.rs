//! Reversal store backed by one database transaction.
//!
//! [`SeaOrmReversalStore`] adapts the stock, invoice and journal repositories
//! to the engine's [`ReversalStore`] seam. Every call runs on the same
//! `DatabaseTransaction`, so the row locks taken by the `lock_*` reads are
//! held until the engine commits or rolls back. Dropping the store without
//! either rolls the transaction back.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

use revoice_core::ledger::JournalLine;
use revoice_core::reversal::{
    InvoiceHeader, InvoiceItemLine, InvoiceTotalsDelta, NewTransactionRecord, PostingAccounts,
    ReturnRequest, ReversalEngine, ReversalError, ReversalMode, ReversalOutcome, ReversalStore,
    StockKey, StockLine,
};
use revoice_shared::AppConfig;
use revoice_shared::types::{
    AccountId, InvoiceId, InvoiceItemId, ItemId, TransactionId, UserId,
};

use super::invoice::InvoiceRepository;
use super::journal::JournalRepository;
use super::stock::StockRepository;

#[allow(clippy::needless_pass_by_value)]
fn store_failure(err: DbErr) -> ReversalError {
    ReversalError::StoreFailure(err.to_string())
}

/// One open database transaction seen through the [`ReversalStore`] seam.
pub struct SeaOrmReversalStore {
    txn: DatabaseTransaction,
}

impl SeaOrmReversalStore {
    /// Begins a new database transaction.
    ///
    /// # Errors
    ///
    /// Returns `StoreFailure` if the transaction cannot be started.
    pub async fn begin(db: &DatabaseConnection) -> Result<Self, ReversalError> {
        let txn = db.begin().await.map_err(store_failure)?;
        Ok(Self { txn })
    }
}

#[async_trait]
impl ReversalStore for SeaOrmReversalStore {
    async fn lock_invoice(
        &mut self,
        invoice_id: InvoiceId,
    ) -> Result<Option<InvoiceHeader>, ReversalError> {
        InvoiceRepository::lock_header(&self.txn, invoice_id)
            .await
            .map_err(store_failure)
    }

    async fn lock_invoice_lines(
        &mut self,
        header: &InvoiceHeader,
        items: Option<&[ItemId]>,
    ) -> Result<Vec<InvoiceItemLine>, ReversalError> {
        InvoiceRepository::lock_lines(&self.txn, header, items)
            .await
            .map_err(store_failure)
    }

    async fn lock_stock_line(
        &mut self,
        key: &StockKey,
    ) -> Result<Option<StockLine>, ReversalError> {
        StockRepository::lock_by_key(&self.txn, key)
            .await
            .map_err(store_failure)
    }

    async fn add_stock(
        &mut self,
        stock: &StockLine,
        quantity: i32,
    ) -> Result<StockLine, ReversalError> {
        StockRepository::add_quantity(&self.txn, stock.id, quantity)
            .await
            .map_err(store_failure)
    }

    async fn decrement_invoice_line(
        &mut self,
        line_id: InvoiceItemId,
        quantity: i32,
    ) -> Result<(), ReversalError> {
        InvoiceRepository::decrement_line(&self.txn, line_id, quantity)
            .await
            .map_err(store_failure)
    }

    async fn cash_account_of(
        &mut self,
        user_id: UserId,
    ) -> Result<Option<AccountId>, ReversalError> {
        JournalRepository::cash_account_of(&self.txn, user_id)
            .await
            .map_err(store_failure)
    }

    async fn apply_invoice_delta(
        &mut self,
        header: &InvoiceHeader,
        delta: &InvoiceTotalsDelta,
    ) -> Result<(), ReversalError> {
        InvoiceRepository::apply_totals(&self.txn, header, delta)
            .await
            .map_err(store_failure)
    }

    async fn insert_transaction(
        &mut self,
        record: &NewTransactionRecord,
    ) -> Result<TransactionId, ReversalError> {
        JournalRepository::insert_transaction(&self.txn, record)
            .await
            .map_err(store_failure)
    }

    async fn issue_journal_entries(
        &mut self,
        transaction_id: TransactionId,
        lines: &[JournalLine],
    ) -> Result<(), ReversalError> {
        JournalRepository::insert_lines(&self.txn, transaction_id, lines)
            .await
            .map_err(store_failure)
    }

    async fn find_sale_transaction(
        &mut self,
        invoice_id: InvoiceId,
    ) -> Result<Option<TransactionId>, ReversalError> {
        JournalRepository::find_sale_transaction(&self.txn, invoice_id)
            .await
            .map_err(store_failure)
    }

    async fn delete_journal_entries(
        &mut self,
        transaction_id: TransactionId,
    ) -> Result<u64, ReversalError> {
        JournalRepository::delete_lines(&self.txn, transaction_id)
            .await
            .map_err(store_failure)
    }

    async fn delete_transaction(
        &mut self,
        transaction_id: TransactionId,
    ) -> Result<(), ReversalError> {
        JournalRepository::delete_transaction(&self.txn, transaction_id)
            .await
            .map_err(store_failure)
    }

    async fn delete_invoice(&mut self, invoice_id: InvoiceId) -> Result<u64, ReversalError> {
        InvoiceRepository::delete_with_lines(&self.txn, invoice_id)
            .await
            .map_err(store_failure)
    }

    async fn commit(self) -> Result<(), ReversalError> {
        self.txn.commit().await.map_err(store_failure)
    }

    async fn rollback(self) -> Result<(), ReversalError> {
        self.txn.rollback().await.map_err(store_failure)
    }
}

/// Runs invoice reversals against a connection pool.
#[derive(Debug, Clone)]
pub struct ReversalRepository {
    db: DatabaseConnection,
    engine: ReversalEngine,
}

impl ReversalRepository {
    /// Creates a repository posting to `accounts` on behalf of `posted_by`.
    #[must_use]
    pub const fn new(db: DatabaseConnection, accounts: PostingAccounts, posted_by: UserId) -> Self {
        Self {
            db,
            engine: ReversalEngine::new(accounts, posted_by),
        }
    }

    /// Creates a repository with accounts and posting user from configuration.
    #[must_use]
    pub fn from_config(db: DatabaseConnection, config: &AppConfig) -> Self {
        Self::new(
            db,
            PostingAccounts::from(config.accounts),
            UserId::new(config.reversal.posted_by_user_id),
        )
    }

    /// Reverses an invoice inside one database transaction.
    ///
    /// # Errors
    ///
    /// Returns the reversal error; the database is left as it was before the call.
    pub async fn reverse_invoice(
        &self,
        request: &ReturnRequest,
    ) -> Result<ReversalOutcome, ReversalError> {
        let mode = match request.mode() {
            ReversalMode::Full => "full",
            ReversalMode::Partial(_) => "partial",
        };
        tracing::info!(invoice_id = %request.invoice_id, mode, "reversing invoice");

        let store = SeaOrmReversalStore::begin(&self.db).await?;
        self.engine.reverse(store, request).await
    }
}
