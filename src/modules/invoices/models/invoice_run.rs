use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of one invoice generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRun {
    pub period: String,
    pub due_date: NaiveDate,
    /// Residents handed to the run
    pub considered: usize,
    /// Rent payments created by this run
    pub created: usize,
    /// Residents that already had rent for the period
    pub skipped: usize,
    /// Residents passed in that are not active
    pub ineligible: usize,
    pub failures: Vec<InvoiceFailure>,
}

impl InvoiceRun {
    pub fn new(period: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            period: period.into(),
            due_date,
            considered: 0,
            created: 0,
            skipped: 0,
            ineligible: 0,
            failures: Vec::new(),
        }
    }

    /// True when no resident failed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A resident whose invoice could not be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceFailure {
    pub resident_id: String,
    pub reason: String,
}

/// Request body for `POST /invoices/generate`.
///
/// Both fields are optional. Without a period the next calendar month is
/// invoiced; without a due date the configured due day of that month is used,
/// which requires the period to be a parseable label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateInvoicesRequest {
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}
