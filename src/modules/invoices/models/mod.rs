mod billing_period;
mod invoice_run;

pub use billing_period::BillingPeriod;
pub use invoice_run::{GenerateInvoicesRequest, InvoiceFailure, InvoiceRun};
