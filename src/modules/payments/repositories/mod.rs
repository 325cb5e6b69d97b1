mod memory;
mod payment_repository;

pub use memory::InMemoryPaymentStore;
pub use payment_repository::{PaymentRepository, PaymentStore};
