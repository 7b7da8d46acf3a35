//! Initial database migration.
//!
//! Creates the inventory ledger tables the reversal engine reads and writes:
//! users, invoices with their item lines, current stock per lot, and the
//! financial transactions with their journal lines.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(CURRENT_STOCK_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const USERS_SQL: &str = r"
CREATE TABLE users (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    -- Cash-in-hand account credited when a sale is reversed
    account_id BIGINT
);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id),
    warehouse_id BIGINT NOT NULL,
    discount NUMERIC(5, 2) NOT NULL DEFAULT 0,
    cost_price NUMERIC(15, 2) NOT NULL DEFAULT 0,
    price_before_discount NUMERIC(15, 2) NOT NULL DEFAULT 0,
    price_after_discount NUMERIC(15, 2) NOT NULL DEFAULT 0,
    CONSTRAINT chk_invoice_discount CHECK (discount >= 0 AND discount <= 100)
);

CREATE TABLE invoice_items (
    id BIGSERIAL PRIMARY KEY,
    invoice_id BIGINT NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    item_id BIGINT NOT NULL,
    goods_received_note_id BIGINT NOT NULL,
    inventory_transfer_id BIGINT,
    qty INTEGER NOT NULL,
    cost_price NUMERIC(15, 2) NOT NULL,
    price NUMERIC(15, 2) NOT NULL,
    CONSTRAINT chk_invoice_item_qty CHECK (qty >= 0)
);

CREATE INDEX idx_invoice_items_invoice ON invoice_items(invoice_id, item_id);
";

const CURRENT_STOCK_SQL: &str = r"
CREATE TABLE current_stock (
    id BIGSERIAL PRIMARY KEY,
    warehouse_id BIGINT NOT NULL,
    item_id BIGINT NOT NULL,
    goods_received_note_id BIGINT NOT NULL,
    inventory_transfer_id BIGINT,
    qty INTEGER NOT NULL DEFAULT 0,
    price NUMERIC(15, 2) NOT NULL DEFAULT 0,
    CONSTRAINT chk_current_stock_qty CHECK (qty >= 0)
);

-- One row per lot; direct receipts and transfers are distinct lots
CREATE UNIQUE INDEX idx_current_stock_lot
    ON current_stock(warehouse_id, item_id, goods_received_note_id, COALESCE(inventory_transfer_id, 0));
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id),
    invoice_id BIGINT REFERENCES invoices(id) ON DELETE SET NULL,
    datetime TIMESTAMP NOT NULL DEFAULT now(),
    posting_date DATE NOT NULL DEFAULT CURRENT_DATE,
    remark TEXT NOT NULL DEFAULT ''
);

CREATE INDEX idx_transactions_invoice ON transactions(invoice_id, id);
CREATE INDEX idx_transactions_remark ON transactions(remark);

CREATE TABLE account_transactions (
    id BIGSERIAL PRIMARY KEY,
    transaction_id BIGINT NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
    account_id BIGINT NOT NULL,
    entry_type VARCHAR(2) NOT NULL,
    amount NUMERIC(15, 2) NOT NULL,
    CONSTRAINT chk_entry_type CHECK (entry_type IN ('DR', 'CR')),
    CONSTRAINT chk_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_account_transactions_transaction ON account_transactions(transaction_id);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS account_transactions CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS current_stock CASCADE;
DROP TABLE IF EXISTS invoice_items CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS users CASCADE;
";
