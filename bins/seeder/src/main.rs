//! Database seeder for Revoice development and testing.
//!
//! Seeds a cashier with a cash-in-hand account, one posted invoice with three
//! lines over two items and three lots, the matching current stock, and the
//! original sale transaction. Try it with:
//!
//! ```text
//! revoice ri --payload '{"invoice_id": 10, "include_item_list": [{"item_id": 7, "qty": 4}]}'
//! ```
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use revoice_db::entities::{
    account_transactions, current_stock, invoice_items, invoices, transactions, users,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Set};

/// User that posts reversal transactions.
const POSTING_USER_ID: i64 = 1;
/// Cashier who issued the demo invoice.
const CASHIER_ID: i64 = 2;
/// Cashier's cash-in-hand account.
const CASH_ACCOUNT_ID: i64 = 300;
/// Demo invoice.
const INVOICE_ID: i64 = 10;
const WAREHOUSE_ID: i64 = 1;

/// (line id, item, GRN, transfer, qty, unit cost, unit price)
const LINES: [(i64, i64, i64, Option<i64>, i32, Decimal, Decimal); 3] = [
    (1, 5, 11, None, 10, dec!(4.00), dec!(6.00)),
    (2, 7, 11, None, 3, dec!(1.00), dec!(2.00)),
    (3, 7, 12, Some(4), 5, dec!(2.00), dec!(3.00)),
];

/// (stock id, item, GRN, transfer, qty)
const STOCK: [(i64, i64, i64, Option<i64>, i32); 3] = [
    (1, 5, 11, None, 20),
    (2, 7, 11, None, 0),
    (3, 7, 12, Some(4), 1),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = revoice_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding users...");
    seed_users(&db).await;

    if invoices::Entity::find_by_id(INVOICE_ID)
        .one(&db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Invoice {INVOICE_ID} already exists, skipping...");
    } else {
        println!("Seeding invoice {INVOICE_ID}...");
        if let Err(e) = seed_invoice(&db).await {
            eprintln!("Failed to seed invoice: {e}");
        }
    }

    println!("Resetting id sequences...");
    if let Err(e) = reset_sequences(&db).await {
        eprintln!("Failed to reset sequences: {e}");
    }

    println!("Seeding complete!");
}

/// Seeds the posting user and the cashier.
async fn seed_users(db: &DatabaseConnection) {
    for (id, name, account_id) in [
        (POSTING_USER_ID, "Back office", None),
        (CASHIER_ID, "Counter cashier", Some(CASH_ACCOUNT_ID)),
    ] {
        if users::Entity::find_by_id(id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  User {id} already exists, skipping...");
            continue;
        }

        let user = users::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            account_id: Set(account_id),
        };

        if let Err(e) = user.insert(db).await {
            eprintln!("Failed to insert user {id}: {e}");
        } else {
            println!("  Created user: {name}");
        }
    }
}

/// Seeds the invoice, its lines, the stock it was sold from and the sale posting.
async fn seed_invoice(db: &DatabaseConnection) -> Result<(), DbErr> {
    let cost_price: Decimal = LINES
        .iter()
        .map(|line| line.5 * Decimal::from(line.4))
        .sum();
    let price: Decimal = LINES
        .iter()
        .map(|line| line.6 * Decimal::from(line.4))
        .sum();

    invoices::ActiveModel {
        id: Set(INVOICE_ID),
        user_id: Set(CASHIER_ID),
        warehouse_id: Set(WAREHOUSE_ID),
        discount: Set(Decimal::ZERO),
        cost_price: Set(cost_price),
        price_before_discount: Set(price),
        price_after_discount: Set(price),
    }
    .insert(db)
    .await?;

    for (id, item_id, grn, transfer, qty, cost, unit_price) in LINES {
        invoice_items::ActiveModel {
            id: Set(id),
            invoice_id: Set(INVOICE_ID),
            item_id: Set(item_id),
            goods_received_note_id: Set(grn),
            inventory_transfer_id: Set(transfer),
            qty: Set(qty),
            cost_price: Set(cost),
            price: Set(unit_price),
        }
        .insert(db)
        .await?;
    }
    println!("  Created {} invoice lines", LINES.len());

    for (id, item_id, grn, transfer, qty) in STOCK {
        current_stock::ActiveModel {
            id: Set(id),
            warehouse_id: Set(WAREHOUSE_ID),
            item_id: Set(item_id),
            goods_received_note_id: Set(grn),
            inventory_transfer_id: Set(transfer),
            qty: Set(qty),
            price: Set(Decimal::ZERO),
        }
        .insert(db)
        .await?;
    }
    println!("  Created {} stock lines", STOCK.len());

    let now = Utc::now().naive_utc();
    let sale = transactions::ActiveModel {
        id: Set(1),
        user_id: Set(CASHIER_ID),
        invoice_id: Set(Some(INVOICE_ID)),
        datetime: Set(now),
        posting_date: Set(now.date()),
        remark: Set(format!("INVOICE {INVOICE_ID}")),
    }
    .insert(db)
    .await?;

    // Dr cash / Cr sales, Dr cost of sales / Cr stock
    let journal = [
        (CASH_ACCOUNT_ID, "DR", price),
        (200, "CR", price),
        (202, "DR", cost_price),
        (183, "CR", cost_price),
    ];
    for (account_id, entry_type, amount) in journal {
        account_transactions::ActiveModel {
            transaction_id: Set(sale.id),
            account_id: Set(account_id),
            entry_type: Set(entry_type.to_string()),
            amount: Set(amount),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    println!("  Created sale transaction {} (cost {cost_price}, price {price})", sale.id);

    Ok(())
}

/// Moves every BIGSERIAL sequence past the explicitly seeded ids.
async fn reset_sequences(db: &DatabaseConnection) -> Result<(), DbErr> {
    for table in [
        "users",
        "invoices",
        "invoice_items",
        "current_stock",
        "transactions",
        "account_transactions",
    ] {
        db.execute_unprepared(&format!(
            "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
             COALESCE((SELECT MAX(id) FROM {table}), 0) + 1, false)"
        ))
        .await?;
    }
    Ok(())
}
