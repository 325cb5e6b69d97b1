// Invoices module
//
// Monthly rent invoice generation on top of the payments ledger.

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{BillingPeriod, GenerateInvoicesRequest, InvoiceFailure, InvoiceRun};
pub use services::InvoiceGenerator;
