//! Invoice and invoice line access.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use revoice_core::reversal::{InvoiceHeader, InvoiceItemLine, InvoiceTotalsDelta, Lot};
use revoice_shared::types::{
    InvoiceId, InvoiceItemId, ItemId, ReceiptNoteId, TransferId, UserId, WarehouseId,
};

use crate::entities::{invoice_items, invoices};

/// Reads and updates `invoices` and `invoice_items`.
pub struct InvoiceRepository;

impl InvoiceRepository {
    /// Locks and reads an invoice header.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn lock_header<C: ConnectionTrait>(
        db: &C,
        invoice_id: InvoiceId,
    ) -> Result<Option<InvoiceHeader>, DbErr> {
        let row = invoices::Entity::find_by_id(invoice_id.into_inner())
            .lock_exclusive()
            .one(db)
            .await?;

        Ok(row.map(|row| InvoiceHeader {
            id: InvoiceId::new(row.id),
            user_id: UserId::new(row.user_id),
            warehouse_id: WarehouseId::new(row.warehouse_id),
            discount: row.discount,
            cost_price: row.cost_price,
            price_before_discount: row.price_before_discount,
            price_after_discount: row.price_after_discount,
        }))
    }

    /// Locks and reads the invoice's lines in ascending line id.
    ///
    /// With `items`, only lines of those items are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn lock_lines<C: ConnectionTrait>(
        db: &C,
        header: &InvoiceHeader,
        items: Option<&[ItemId]>,
    ) -> Result<Vec<InvoiceItemLine>, DbErr> {
        let mut query = invoice_items::Entity::find()
            .filter(invoice_items::Column::InvoiceId.eq(header.id.into_inner()));

        if let Some(items) = items {
            query = query.filter(
                invoice_items::Column::ItemId.is_in(items.iter().map(|item| item.into_inner())),
            );
        }

        let rows = query
            .order_by_asc(invoice_items::Column::Id)
            .lock_exclusive()
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| InvoiceItemLine {
                id: InvoiceItemId::new(row.id),
                warehouse_id: header.warehouse_id,
                item_id: ItemId::new(row.item_id),
                lot: Lot::from_columns(
                    ReceiptNoteId::new(row.goods_received_note_id),
                    row.inventory_transfer_id.map(TransferId::new),
                ),
                quantity: row.qty,
                unit_cost_price: row.cost_price,
                unit_selling_price: row.price,
            })
            .collect())
    }

    /// Subtracts `quantity` from one invoice line.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if the line does not exist, or any query error.
    pub async fn decrement_line<C: ConnectionTrait>(
        db: &C,
        line_id: InvoiceItemId,
        quantity: i32,
    ) -> Result<(), DbErr> {
        let result = invoice_items::Entity::update_many()
            .col_expr(
                invoice_items::Column::Qty,
                Expr::col(invoice_items::Column::Qty).sub(quantity),
            )
            .filter(invoice_items::Column::Id.eq(line_id.into_inner()))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!("invoice_items {line_id}")));
        }
        Ok(())
    }

    /// Writes the header's totals reduced by `delta`.
    ///
    /// The header must have been read under lock in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn apply_totals<C: ConnectionTrait>(
        db: &C,
        header: &InvoiceHeader,
        delta: &InvoiceTotalsDelta,
    ) -> Result<(), DbErr> {
        let updated = delta.applied_to(header);

        invoices::ActiveModel {
            id: Unchanged(header.id.into_inner()),
            cost_price: Set(updated.cost_price),
            price_before_discount: Set(updated.price_before_discount),
            price_after_discount: Set(updated.price_after_discount),
            ..Default::default()
        }
        .update(db)
        .await?;

        Ok(())
    }

    /// Deletes an invoice and its lines, returning the number of lines removed.
    ///
    /// # Errors
    ///
    /// Returns an error if a delete fails.
    pub async fn delete_with_lines<C: ConnectionTrait>(
        db: &C,
        invoice_id: InvoiceId,
    ) -> Result<u64, DbErr> {
        let lines = invoice_items::Entity::delete_many()
            .filter(invoice_items::Column::InvoiceId.eq(invoice_id.into_inner()))
            .exec(db)
            .await?;

        invoices::Entity::delete_by_id(invoice_id.into_inner())
            .exec(db)
            .await?;

        Ok(lines.rows_affected)
    }
}
