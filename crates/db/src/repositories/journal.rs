//! Financial transactions and their journal lines.

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};

use revoice_core::ledger::JournalLine;
use revoice_core::reversal::{NewTransactionRecord, REVERSAL_REMARK_PREFIX, legacy_sale_remark};
use revoice_shared::types::{AccountId, InvoiceId, TransactionId, UserId};

use crate::entities::{account_transactions, transactions, users};

/// Reads and writes `transactions` and `account_transactions`.
pub struct JournalRepository;

impl JournalRepository {
    /// The cash-in-hand account linked to a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn cash_account_of<C: ConnectionTrait>(
        db: &C,
        user_id: UserId,
    ) -> Result<Option<AccountId>, DbErr> {
        let user = users::Entity::find_by_id(user_id.into_inner()).one(db).await?;
        Ok(user.and_then(|user| user.account_id).map(AccountId::new))
    }

    /// Inserts a transaction header and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn insert_transaction<C: ConnectionTrait>(
        db: &C,
        record: &NewTransactionRecord,
    ) -> Result<TransactionId, DbErr> {
        let inserted = transactions::ActiveModel {
            id: NotSet,
            user_id: Set(record.user_id.into_inner()),
            invoice_id: Set(Some(record.invoice_id.into_inner())),
            datetime: Set(record.datetime),
            posting_date: Set(record.posting_date),
            remark: Set(record.remark.clone()),
        }
        .insert(db)
        .await?;

        Ok(TransactionId::new(inserted.id))
    }

    /// Inserts journal lines against a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn insert_lines<C: ConnectionTrait>(
        db: &C,
        transaction_id: TransactionId,
        lines: &[JournalLine],
    ) -> Result<(), DbErr> {
        if lines.is_empty() {
            return Ok(());
        }

        let rows = lines.iter().map(|line| account_transactions::ActiveModel {
            id: NotSet,
            transaction_id: Set(transaction_id.into_inner()),
            account_id: Set(line.account_id.into_inner()),
            entry_type: Set(line.entry_type.code().to_string()),
            amount: Set(line.amount),
        });

        account_transactions::Entity::insert_many(rows)
            .exec(db)
            .await?;

        Ok(())
    }

    /// Finds the transaction of the original sale of an invoice.
    ///
    /// Prefers the lowest linked transaction that is not itself a reversal,
    /// then falls back to the legacy remark.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_sale_transaction<C: ConnectionTrait>(
        db: &C,
        invoice_id: InvoiceId,
    ) -> Result<Option<TransactionId>, DbErr> {
        let linked = transactions::Entity::find()
            .filter(transactions::Column::InvoiceId.eq(invoice_id.into_inner()))
            .filter(transactions::Column::Remark.not_like(format!("{REVERSAL_REMARK_PREFIX}%")))
            .order_by_asc(transactions::Column::Id)
            .one(db)
            .await?;

        if let Some(found) = linked {
            return Ok(Some(TransactionId::new(found.id)));
        }

        let legacy = transactions::Entity::find()
            .filter(transactions::Column::Remark.eq(legacy_sale_remark(invoice_id)))
            .order_by_asc(transactions::Column::Id)
            .one(db)
            .await?;

        Ok(legacy.map(|found| TransactionId::new(found.id)))
    }

    /// Deletes the journal lines of a transaction, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_lines<C: ConnectionTrait>(
        db: &C,
        transaction_id: TransactionId,
    ) -> Result<u64, DbErr> {
        let result = account_transactions::Entity::delete_many()
            .filter(account_transactions::Column::TransactionId.eq(transaction_id.into_inner()))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Deletes a transaction header.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_transaction<C: ConnectionTrait>(
        db: &C,
        transaction_id: TransactionId,
    ) -> Result<(), DbErr> {
        transactions::Entity::delete_by_id(transaction_id.into_inner())
            .exec(db)
            .await?;
        Ok(())
    }
}
