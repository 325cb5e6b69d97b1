pub mod invoice_generator;

pub use invoice_generator::InvoiceGenerator;
