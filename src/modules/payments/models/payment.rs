// A payment is one billing obligation for one resident for one period.
//
// `status` and `is_paid` are derived from `amount`, `amount_paid` and
// `due_date`. Both are private and recomputed by `recompute_status` at
// construction and after every mutation of the amounts.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{money, AppError, Result};

/// Settlement state of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// amount_paid >= amount
    Paid,
    /// Something received, balance remains
    Partial,
    /// Nothing received, not yet due
    Pending,
    /// Nothing received and the due date has passed
    Overdue,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Paid,
        PaymentStatus::Partial,
        PaymentStatus::Pending,
        PaymentStatus::Overdue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "paid" => Ok(PaymentStatus::Paid),
            "partial" => Ok(PaymentStatus::Partial),
            "pending" => Ok(PaymentStatus::Pending),
            "overdue" => Ok(PaymentStatus::Overdue),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

/// What the obligation is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Rent,
    /// Additional services
    Additional,
    Maintenance,
    Debt,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Rent => "rent",
            PaymentType::Additional => "additional",
            PaymentType::Maintenance => "maintenance",
            PaymentType::Debt => "debt",
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "rent" => Ok(PaymentType::Rent),
            "additional" => Ok(PaymentType::Additional),
            "maintenance" => Ok(PaymentType::Maintenance),
            "debt" => Ok(PaymentType::Debt),
            _ => Err(format!("Invalid payment type: {}", s)),
        }
    }
}

/// How money was received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    MobileMoney,
    BankTransfer,
    Cash,
    Cheque,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::MobileMoney => "mobile_money",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Cheque => "cheque",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "mobile_money" => Ok(PaymentMethod::MobileMoney),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "cash" => Ok(PaymentMethod::Cash),
            "cheque" => Ok(PaymentMethod::Cheque),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

/// Derive `(status, fully_paid)` from raw amounts.
///
/// Rules apply in priority order:
/// 1. `amount_paid >= amount` is paid
/// 2. any money received is partial
/// 3. nothing received and `today` is past `due_date` is overdue
/// 4. otherwise pending
pub fn derive_status(
    amount: Decimal,
    amount_paid: Decimal,
    due_date: NaiveDate,
    today: NaiveDate,
) -> (PaymentStatus, bool) {
    if amount_paid >= amount {
        (PaymentStatus::Paid, true)
    } else if amount_paid > Decimal::ZERO {
        (PaymentStatus::Partial, false)
    } else if today > due_date {
        (PaymentStatus::Overdue, false)
    } else {
        (PaymentStatus::Pending, false)
    }
}

/// Derive the status a payment should carry on `today`
pub fn recompute_status(payment: &Payment, today: NaiveDate) -> (PaymentStatus, bool) {
    derive_status(payment.amount, payment.amount_paid, payment.due_date, today)
}

/// A validated incoming payment, applied with [`Payment::apply_receipt`]
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    amount: Decimal,
    method: PaymentMethod,
    reference: Option<String>,
    paid_on: NaiveDate,
    notes: String,
}

impl PaymentReceipt {
    /// Validate a receipt. `amount` must be positive with at most two decimals.
    pub fn new(
        amount: Decimal,
        method: PaymentMethod,
        reference: Option<String>,
        paid_on: NaiveDate,
        notes: Option<String>,
    ) -> Result<Self> {
        money::validate_positive("amount_received", amount)?;

        let reference = reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        if let Some(reference) = &reference {
            if reference.len() > 100 {
                return Err(AppError::invalid_input(
                    "Transaction reference cannot exceed 100 characters",
                ));
            }
        }

        Ok(Self {
            amount,
            method,
            reference,
            paid_on,
            notes: notes.unwrap_or_default(),
        })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn paid_on(&self) -> NaiveDate {
        self.paid_on
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

/// Request body for a manually created charge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCharge {
    pub resident_id: String,
    pub period: String,
    pub amount: Decimal,
    pub payment_type: PaymentType,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One billing obligation for one resident for one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    id: String,
    resident_id: String,
    period: String,
    amount: Decimal,
    amount_paid: Decimal,
    payment_type: PaymentType,
    method: Option<PaymentMethod>,
    transaction_reference: Option<String>,
    due_date: NaiveDate,
    paid_date: Option<NaiveDate>,
    status: PaymentStatus,
    is_paid: bool,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Payment {
    /// Create a new obligation with nothing paid yet
    pub fn new(charge: NewCharge, today: NaiveDate, now: DateTime<Utc>) -> Result<Self> {
        Self::validate_resident_id(&charge.resident_id)?;
        Self::validate_period(&charge.period)?;
        money::validate_amount("amount", charge.amount)?;

        let mut payment = Self {
            id: Uuid::new_v4().to_string(),
            resident_id: charge.resident_id,
            period: charge.period.trim().to_string(),
            amount: charge.amount,
            amount_paid: Decimal::ZERO,
            payment_type: charge.payment_type,
            method: None,
            transaction_reference: None,
            due_date: charge.due_date,
            paid_date: None,
            status: PaymentStatus::Pending,
            is_paid: false,
            notes: charge.notes.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        payment.refresh_status(today);
        Ok(payment)
    }

    /// Monthly rent invoice for a resident
    pub fn rent_invoice(
        resident_id: &str,
        period: &str,
        monthly_rent: Decimal,
        due_date: NaiveDate,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        Self::new(
            NewCharge {
                resident_id: resident_id.to_string(),
                period: period.to_string(),
                amount: monthly_rent,
                payment_type: PaymentType::Rent,
                due_date,
                notes: None,
            },
            today,
            now,
        )
    }

    /// Rebuild a payment from persisted columns, keeping the stored status
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_storage(
        id: String,
        resident_id: String,
        period: String,
        amount: Decimal,
        amount_paid: Decimal,
        payment_type: PaymentType,
        method: Option<PaymentMethod>,
        transaction_reference: Option<String>,
        due_date: NaiveDate,
        paid_date: Option<NaiveDate>,
        status: PaymentStatus,
        is_paid: bool,
        notes: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            resident_id,
            period,
            amount,
            amount_paid,
            payment_type,
            method,
            transaction_reference,
            due_date,
            paid_date,
            status,
            is_paid,
            notes,
            created_at,
            updated_at,
        }
    }

    /// Add a received amount and overwrite the settlement details.
    ///
    /// `amount_paid` accumulates; method, reference, paid date and notes are
    /// last-write-wins.
    pub fn apply_receipt(
        &mut self,
        receipt: &PaymentReceipt,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let new_total = self.amount_paid + receipt.amount;
        money::validate_amount("amount_paid", new_total)?;

        self.amount_paid = new_total;
        self.method = Some(receipt.method);
        self.transaction_reference = receipt.reference.clone();
        self.paid_date = Some(receipt.paid_on);
        self.notes = receipt.notes.clone();
        self.updated_at = now;

        self.refresh_status(today);
        Ok(())
    }

    /// Re-derive status for `today`, returning whether it changed
    pub fn refresh_status(&mut self, today: NaiveDate) -> bool {
        let (status, is_paid) = recompute_status(self, today);
        let changed = status != self.status || is_paid != self.is_paid;

        self.status = status;
        self.is_paid = is_paid;
        changed
    }

    /// Whether the stored status still matches the derivation on `today`
    pub fn is_status_current(&self, today: NaiveDate) -> bool {
        recompute_status(self, today) == (self.status, self.is_paid)
    }

    /// amount - amount_paid; negative when overpaid
    pub fn balance(&self) -> Decimal {
        self.amount - self.amount_paid
    }

    /// Uniqueness key for rent invoices, `None` for other payment types
    pub fn rent_invoice_key(&self) -> Option<(&str, &str)> {
        match self.payment_type {
            PaymentType::Rent => Some((self.resident_id.as_str(), self.period.as_str())),
            _ => None,
        }
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn resident_id(&self) -> &str {
        &self.resident_id
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn amount_paid(&self) -> Decimal {
        self.amount_paid
    }

    pub fn payment_type(&self) -> PaymentType {
        self.payment_type
    }

    pub fn method(&self) -> Option<PaymentMethod> {
        self.method
    }

    pub fn transaction_reference(&self) -> Option<&str> {
        self.transaction_reference.as_deref()
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn paid_date(&self) -> Option<NaiveDate> {
        self.paid_date
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn is_paid(&self) -> bool {
        self.is_paid
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn validate_resident_id(resident_id: &str) -> Result<()> {
        if resident_id.trim().is_empty() {
            return Err(AppError::invalid_input("Resident ID cannot be empty"));
        }

        Ok(())
    }

    /// Period labels are non-empty and at most 50 characters
    pub fn validate_period(period: &str) -> Result<()> {
        if period.trim().is_empty() {
            return Err(AppError::invalid_input("Billing period cannot be empty"));
        }

        if period.len() > 50 {
            return Err(AppError::invalid_input(
                "Billing period cannot exceed 50 characters",
            ));
        }

        Ok(())
    }
}

/// API representation of a payment, with its balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: String,
    pub resident_id: String,
    pub period: String,
    pub amount: Decimal,
    pub amount_paid: Decimal,
    pub balance: Decimal,
    pub payment_type: PaymentType,
    pub method: Option<PaymentMethod>,
    pub transaction_reference: Option<String>,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: PaymentStatus,
    pub is_paid: bool,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        let balance = payment.balance();

        Self {
            id: payment.id,
            resident_id: payment.resident_id,
            period: payment.period,
            amount: payment.amount,
            amount_paid: payment.amount_paid,
            balance,
            payment_type: payment.payment_type,
            method: payment.method,
            transaction_reference: payment.transaction_reference,
            due_date: payment.due_date,
            paid_date: payment.paid_date,
            status: payment.status,
            is_paid: payment.is_paid,
            notes: payment.notes,
            created_at: payment.created_at.to_rfc3339(),
            updated_at: payment.updated_at.to_rfc3339(),
        }
    }
}
