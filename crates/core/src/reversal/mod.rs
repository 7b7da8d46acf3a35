//! Sales invoice reversal.
//!
//! A reversal undoes some or all of a posted sale. The work is split into
//! pure phases that can be tested without a database, and one orchestrator
//! that runs them against a [`ReversalStore`] holding a single transaction.
//!
//! # Modules
//!
//! - `types` - Invoice lines, lots, stock keys and outcome types
//! - `error` - Reversal error kinds
//! - `request` - Parsing and validation of the caller's payload
//! - `allocation` - First-fit allocation of requested quantities to invoice lines
//! - `posting` - Reversed totals and the balanced journal for partial returns
//! - `store` - The persistence seam (one instance = one open transaction)
//! - `engine` - Orchestrator that sequences the phases inside the store

pub mod allocation;
pub mod engine;
pub mod error;
pub mod posting;
pub mod request;
pub mod store;
pub mod types;

#[cfg(test)]
mod allocation_props;
#[cfg(test)]
mod posting_props;

pub use allocation::{AllocatedPortion, Allocation, AllocationResolver};
pub use engine::ReversalEngine;
pub use error::ReversalError;
pub use posting::{InvoiceTotalsDelta, PostingAccounts, PostingInput, PostingPlan, PostingService};
pub use request::{ReturnLine, ReturnRequest, ReversalMode};
pub use store::{
    NewTransactionRecord, REVERSAL_REMARK_PREFIX, ReversalStore, legacy_sale_remark,
};
pub use types::{InvoiceHeader, InvoiceItemLine, Lot, ReversalOutcome, StockKey, StockLine};
