mod filter;
mod payment;

pub use filter::PaymentFilter;
pub use payment::{
    derive_status, recompute_status, NewCharge, Payment, PaymentMethod, PaymentReceipt,
    PaymentResponse, PaymentStatus, PaymentType,
};
