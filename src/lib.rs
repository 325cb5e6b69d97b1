//! Rent ledger library
//!
//! Payment records for a residential property back office: status
//! derivation, incoming payment recording, monthly rent invoice generation
//! and per-period collection reporting.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use app::Services;
pub use modules::invoices;
pub use modules::payments;
pub use modules::reports;
pub use modules::residents;
