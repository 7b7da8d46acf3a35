//! Shared types and configuration for Revoice.
//!
//! This crate provides common types used across all other crates:
//! - Typed integer IDs for type-safe row references
//! - Currency rounding helpers
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
