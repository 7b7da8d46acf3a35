//! `SeaORM` entity definitions.
//!
//! One module per table of the inventory ledger. All identifiers are
//! `BIGINT`; money columns are `NUMERIC` mapped to `rust_decimal::Decimal`.

pub mod account_transactions;
pub mod current_stock;
pub mod invoice_items;
pub mod invoices;
pub mod transactions;
pub mod users;

pub mod prelude {
    //! Entity re-exports.

    pub use super::account_transactions::Entity as AccountTransactions;
    pub use super::current_stock::Entity as CurrentStock;
    pub use super::invoice_items::Entity as InvoiceItems;
    pub use super::invoices::Entity as Invoices;
    pub use super::transactions::Entity as Transactions;
    pub use super::users::Entity as Users;
}
