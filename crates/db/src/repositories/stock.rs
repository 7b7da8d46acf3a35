//! Stock ledger access.
//!
//! A current-stock row is identified by warehouse, item and lot. Lookups
//! match the lot exactly: a direct receipt only matches rows whose transfer
//! column is NULL.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use revoice_core::reversal::{Lot, StockKey, StockLine};
use revoice_shared::types::{ItemId, ReceiptNoteId, StockLineId, TransferId, WarehouseId};

use crate::entities::current_stock;

/// Reads and updates `current_stock` rows.
pub struct StockRepository;

impl StockRepository {
    /// Locks and reads the stock row with exactly this key.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn lock_by_key<C: ConnectionTrait>(
        db: &C,
        key: &StockKey,
    ) -> Result<Option<StockLine>, DbErr> {
        let query = current_stock::Entity::find()
            .filter(current_stock::Column::WarehouseId.eq(key.warehouse_id.into_inner()))
            .filter(current_stock::Column::ItemId.eq(key.item_id.into_inner()))
            .filter(current_stock::Column::GoodsReceivedNoteId.eq(key.lot.receipt().into_inner()));

        let query = match key.lot.transfer() {
            Some(transfer) => query
                .filter(current_stock::Column::InventoryTransferId.eq(transfer.into_inner())),
            None => query.filter(current_stock::Column::InventoryTransferId.is_null()),
        };

        let row = query
            .order_by_asc(current_stock::Column::Id)
            .lock_exclusive()
            .one(db)
            .await?;

        Ok(row.map(to_domain))
    }

    /// Adds `quantity` to a stock row and returns the row as updated.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if the row does not exist, or any query error.
    pub async fn add_quantity<C: ConnectionTrait>(
        db: &C,
        id: StockLineId,
        quantity: i32,
    ) -> Result<StockLine, DbErr> {
        current_stock::Entity::update_many()
            .col_expr(
                current_stock::Column::Qty,
                Expr::col(current_stock::Column::Qty).add(quantity),
            )
            .filter(current_stock::Column::Id.eq(id.into_inner()))
            .exec(db)
            .await?;

        current_stock::Entity::find_by_id(id.into_inner())
            .one(db)
            .await?
            .map(to_domain)
            .ok_or_else(|| DbErr::RecordNotFound(format!("current_stock {id}")))
    }
}

fn to_domain(row: current_stock::Model) -> StockLine {
    StockLine {
        id: StockLineId::new(row.id),
        key: StockKey {
            warehouse_id: WarehouseId::new(row.warehouse_id),
            item_id: ItemId::new(row.item_id),
            lot: Lot::from_columns(
                ReceiptNoteId::new(row.goods_received_note_id),
                row.inventory_transfer_id.map(TransferId::new),
            ),
        },
        quantity: row.qty,
        price: row.price,
    }
}
