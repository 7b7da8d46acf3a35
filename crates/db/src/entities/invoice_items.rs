//! `SeaORM` Entity for invoice_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub invoice_id: i64,
    pub item_id: i64,
    pub goods_received_note_id: i64,
    /// Set when the goods arrived through an inventory transfer.
    pub inventory_transfer_id: Option<i64>,
    pub qty: i32,
    /// Unit cost price.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub cost_price: Decimal,
    /// Unit selling price before discount.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::invoices::Column::Id"
    )]
    Invoices,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
