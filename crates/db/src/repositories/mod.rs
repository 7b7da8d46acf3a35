//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! The stock, invoice and journal repositories are stateless and run on any
//! connection or transaction; [`ReversalRepository`] ties them together.

pub mod invoice;
pub mod journal;
pub mod reversal;
pub mod stock;

pub use invoice::InvoiceRepository;
pub use journal::JournalRepository;
pub use reversal::{ReversalRepository, SeaOrmReversalStore};
pub use stock::StockRepository;
