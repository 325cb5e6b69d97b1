// Payments module
//
// The ledger proper: payment records, status derivation, and incoming
// payment recording.

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{
    derive_status, recompute_status, NewCharge, Payment, PaymentFilter, PaymentMethod,
    PaymentReceipt, PaymentResponse, PaymentStatus, PaymentType,
};
pub use repositories::{InMemoryPaymentStore, PaymentRepository, PaymentStore};
pub use services::LedgerService;
