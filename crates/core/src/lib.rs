//! Core business logic for Revoice.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! The reversal engine talks to persistence only through the
//! [`reversal::ReversalStore`] trait, which the `revoice-db` crate implements.
//!
//! # Modules
//!
//! - `ledger` - Journal lines and double-entry validation
//! - `reversal` - Invoice reversal: request parsing, allocation, posting, orchestration

pub mod ledger;
pub mod reversal;
