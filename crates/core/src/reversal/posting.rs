//! Financial posting for partial reversals.
//!
//! A partial return reduces the invoice's running totals and posts the
//! original sale in reverse:
//!
//! | Account | Debit | Credit |
//! |---|---|---|
//! | Sales | final sold price | |
//! | Cash in hand (customer) | | final sold price |
//! | Stock | cost price | |
//! | Cost of sales | | cost price |

use rust_decimal::Decimal;

use revoice_shared::config::AccountsConfig;
use revoice_shared::types::{AccountId, apply_discount};

use super::error::ReversalError;
use super::types::InvoiceHeader;
use crate::ledger::{JournalLine, validate_entries};

/// Fixed accounts used by the reversing journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingAccounts {
    /// Sales (revenue) account, debited.
    pub sales: AccountId,
    /// Cost of sales account, credited.
    pub cost_of_sales: AccountId,
    /// Stock account, debited.
    pub stock: AccountId,
}

impl From<AccountsConfig> for PostingAccounts {
    fn from(config: AccountsConfig) -> Self {
        Self {
            sales: AccountId::new(config.sales_account_id),
            cost_of_sales: AccountId::new(config.cost_of_sales_account_id),
            stock: AccountId::new(config.stock_account_id),
        }
    }
}

impl Default for PostingAccounts {
    fn default() -> Self {
        AccountsConfig::default().into()
    }
}

/// Money involved in a partial reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingInput {
    /// Cost price of the returned goods.
    pub total_cost_price: Decimal,
    /// Selling price of the returned goods before discount.
    pub total_selling_price: Decimal,
    /// The invoice's discount percentage.
    pub discount_pct: Decimal,
    /// The customer's cash-in-hand account.
    pub cash_account: AccountId,
}

/// Amounts to subtract from the invoice's running totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotalsDelta {
    /// Subtracted from `cost_price`.
    pub cost_price: Decimal,
    /// Subtracted from `price_before_discount`.
    pub price_before_discount: Decimal,
    /// Subtracted from `price_after_discount`.
    pub price_after_discount: Decimal,
}

impl InvoiceTotalsDelta {
    /// Returns the header with this delta subtracted.
    #[must_use]
    pub fn applied_to(&self, header: &InvoiceHeader) -> InvoiceHeader {
        InvoiceHeader {
            cost_price: header.cost_price - self.cost_price,
            price_before_discount: header.price_before_discount - self.price_before_discount,
            price_after_discount: header.price_after_discount - self.price_after_discount,
            ..header.clone()
        }
    }
}

/// Everything a partial reversal writes besides quantities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingPlan {
    /// Selling price after discount, rounded to cents.
    pub final_sold_price: Decimal,
    /// Reduction of the invoice totals.
    pub invoice_delta: InvoiceTotalsDelta,
    /// Balanced journal lines; empty when every amount is zero.
    pub journal: Vec<JournalLine>,
}

/// Stateless posting generator.
pub struct PostingService;

impl PostingService {
    /// Builds the invoice delta and reversing journal.
    ///
    /// Pairs with a zero amount are left out because a ledger line must be
    /// positive. A 100 % discount therefore only reverses the cost side.
    ///
    /// # Errors
    ///
    /// Returns `UnbalancedJournal` if the generated lines fail double-entry
    /// validation (for example a negative amount).
    pub fn build(
        input: &PostingInput,
        accounts: &PostingAccounts,
    ) -> Result<PostingPlan, ReversalError> {
        let final_sold_price = apply_discount(input.total_selling_price, input.discount_pct);

        let mut journal = Vec::with_capacity(4);
        if !final_sold_price.is_zero() {
            journal.push(JournalLine::debit(accounts.sales, final_sold_price));
            journal.push(JournalLine::credit(input.cash_account, final_sold_price));
        }
        if !input.total_cost_price.is_zero() {
            journal.push(JournalLine::debit(accounts.stock, input.total_cost_price));
            journal.push(JournalLine::credit(
                accounts.cost_of_sales,
                input.total_cost_price,
            ));
        }

        if !journal.is_empty() {
            validate_entries(&journal)?;
        }

        Ok(PostingPlan {
            final_sold_price,
            invoice_delta: InvoiceTotalsDelta {
                cost_price: input.total_cost_price,
                price_before_discount: input.total_selling_price,
                price_after_discount: final_sold_price,
            },
            journal,
        })
    }
}
