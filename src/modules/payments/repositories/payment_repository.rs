// Payment persistence.
//
// `PaymentStore` is the record-store seam the ledger services depend on.
// `PaymentRepository` implements it on MySQL:
// - insert, mapping the unique `rent_invoice_key` violation to Conflict
// - locked read-modify-write for incoming payments (SELECT ... FOR UPDATE)
// - overdue refresh for pending payments past their due date
// - filtered listing with pagination
// - per-period collection totals aggregated in SQL

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlConnection, MySqlPool, QueryBuilder};

use crate::core::{AppError, Result};
use crate::modules::payments::models::{
    Payment, PaymentFilter, PaymentMethod, PaymentReceipt, PaymentStatus, PaymentType,
};
use crate::modules::reports::models::CollectionSummary;

/// Record store for payments
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Persist a new payment.
    ///
    /// Fails with `AppError::Conflict` when a rent payment already exists for
    /// the same resident and period. The check and the insert are atomic.
    async fn insert(&self, payment: &Payment) -> Result<Payment>;

    /// Find a payment by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Payment>>;

    /// Does a rent payment exist for (resident, period)?
    async fn rent_invoice_exists(&self, resident_id: &str, period: &str) -> Result<bool>;

    /// Apply a receipt to a payment as one atomic read-modify-write.
    ///
    /// Fails with `AppError::NotFound` when `id` does not resolve.
    async fn apply_receipt(
        &self,
        id: &str,
        receipt: &PaymentReceipt,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Payment>;

    /// Re-derive status of unsettled payments whose due date is before
    /// `today`. Returns how many payments changed.
    async fn refresh_statuses(&self, today: NaiveDate, now: DateTime<Utc>) -> Result<u64>;

    /// List payments matching `filter`, most recent due date first
    async fn list(&self, filter: &PaymentFilter) -> Result<Vec<Payment>>;

    /// Collection totals and status counts for one period
    async fn summarize_period(&self, period: &str) -> Result<CollectionSummary> {
        let payments = self.list(&PaymentFilter::for_period(period)).await?;
        Ok(CollectionSummary::from_payments(period, &payments))
    }

    /// Check that the store is reachable
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// MySQL implementation of [`PaymentStore`]
#[derive(Clone)]
pub struct PaymentRepository {
    pool: MySqlPool,
}

impl PaymentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn write_settlement(conn: &mut MySqlConnection, payment: &Payment) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE payments
            SET
                amount_paid = ?,
                method = ?,
                transaction_reference = ?,
                paid_date = ?,
                notes = ?,
                status = ?,
                is_paid = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(payment.amount_paid())
        .bind(payment.method().map(|m| m.as_str()))
        .bind(payment.transaction_reference())
        .bind(payment.paid_date())
        .bind(payment.notes())
        .bind(payment.status().as_str())
        .bind(payment.is_paid())
        .bind(payment.updated_at())
        .bind(payment.id())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update payment: {}", e)))?;

        Ok(())
    }

    async fn write_status(conn: &mut MySqlConnection, payment: &Payment) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE payments
            SET status = ?, is_paid = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(payment.status().as_str())
        .bind(payment.is_paid())
        .bind(payment.updated_at())
        .bind(payment.id())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update payment status: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl PaymentStore for PaymentRepository {
    async fn insert(&self, payment: &Payment) -> Result<Payment> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, resident_id, period, amount, amount_paid, payment_type,
                method, transaction_reference, due_date, paid_date, status,
                is_paid, notes, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(payment.id())
        .bind(payment.resident_id())
        .bind(payment.period())
        .bind(payment.amount())
        .bind(payment.amount_paid())
        .bind(payment.payment_type().as_str())
        .bind(payment.method().map(|m| m.as_str()))
        .bind(payment.transaction_reference())
        .bind(payment.due_date())
        .bind(payment.paid_date())
        .bind(payment.status().as_str())
        .bind(payment.is_paid())
        .bind(payment.notes())
        .bind(payment.created_at())
        .bind(payment.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict(format!(
                        "Resident '{}' already has a {} payment for '{}'",
                        payment.resident_id(),
                        payment.payment_type(),
                        payment.period()
                    ));
                }
            }
            AppError::Internal(format!("Failed to create payment: {}", e))
        })?;

        Ok(payment.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT
                id, resident_id, period, amount, amount_paid, payment_type,
                method, transaction_reference, due_date, paid_date, status,
                is_paid, notes, created_at, updated_at
            FROM payments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch payment: {}", e)))?;

        match row {
            Some(r) => Ok(Some(r.try_into()?)),
            None => Ok(None),
        }
    }

    async fn rent_invoice_exists(&self, resident_id: &str, period: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM payments
            WHERE resident_id = ? AND period = ? AND payment_type = 'rent'
            "#,
        )
        .bind(resident_id)
        .bind(period)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to check rent invoice: {}", e)))?;

        Ok(count > 0)
    }

    async fn apply_receipt(
        &self,
        id: &str,
        receipt: &PaymentReceipt,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Payment> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT
                id, resident_id, period, amount, amount_paid, payment_type,
                method, transaction_reference, due_date, paid_date, status,
                is_paid, notes, created_at, updated_at
            FROM payments
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to lock payment: {}", e)))?;

        let mut payment: Payment = row
            .ok_or_else(|| AppError::not_found(format!("Payment '{}' not found", id)))?
            .try_into()?;

        payment.apply_receipt(receipt, today, now)?;
        Self::write_settlement(&mut tx, &payment).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to commit transaction: {}", e)))?;

        Ok(payment)
    }

    async fn refresh_statuses(&self, today: NaiveDate, now: DateTime<Utc>) -> Result<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT
                id, resident_id, period, amount, amount_paid, payment_type,
                method, transaction_reference, due_date, paid_date, status,
                is_paid, notes, created_at, updated_at
            FROM payments
            WHERE status = 'pending' AND due_date < ?
            FOR UPDATE
            "#,
        )
        .bind(today)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch pending payments: {}", e)))?;

        let mut changed = 0;
        for row in rows {
            let mut payment: Payment = row.try_into()?;
            if payment.refresh_status(today) {
                payment.touch(now);
                Self::write_status(&mut tx, &payment).await?;
                changed += 1;
            }
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to commit transaction: {}", e)))?;

        Ok(changed)
    }

    async fn list(&self, filter: &PaymentFilter) -> Result<Vec<Payment>> {
        let mut query = QueryBuilder::<MySql>::new(
            r#"
            SELECT
                id, resident_id, period, amount, amount_paid, payment_type,
                method, transaction_reference, due_date, paid_date, status,
                is_paid, notes, created_at, updated_at
            FROM payments
            WHERE 1 = 1
            "#,
        );

        if let Some(resident_id) = &filter.resident_id {
            query.push(" AND resident_id = ").push_bind(resident_id.clone());
        }
        if let Some(period) = &filter.period {
            query.push(" AND period = ").push_bind(period.clone());
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(payment_type) = filter.payment_type {
            query.push(" AND payment_type = ").push_bind(payment_type.as_str());
        }

        query.push(" ORDER BY due_date DESC, created_at DESC");

        match filter.limit {
            Some(limit) => {
                query.push(" LIMIT ").push_bind(i64::from(limit));
                query.push(" OFFSET ").push_bind(i64::from(filter.offset));
            }
            // MySQL has no OFFSET without LIMIT
            None if filter.offset > 0 => {
                query.push(" LIMIT 18446744073709551615 OFFSET ");
                query.push_bind(i64::from(filter.offset));
            }
            None => {}
        }

        let rows = query
            .build_query_as::<PaymentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to list payments: {}", e)))?;

        rows.into_iter().map(|row| row.try_into()).collect()
    }

    async fn summarize_period(&self, period: &str) -> Result<CollectionSummary> {
        let rows = sqlx::query_as::<_, StatusTotalsRow>(
            r#"
            SELECT
                status,
                COUNT(*) AS payment_count,
                COALESCE(SUM(amount), 0) AS billed,
                COALESCE(SUM(amount_paid), 0) AS collected,
                COALESCE(SUM(GREATEST(amount - amount_paid, 0)), 0) AS outstanding,
                COALESCE(SUM(GREATEST(amount_paid - amount, 0)), 0) AS overpaid
            FROM payments
            WHERE period = ?
            GROUP BY status
            "#,
        )
        .bind(period)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to summarize period: {}", e)))?;

        let mut summary = CollectionSummary::from_payments(period, &[]);
        for row in rows {
            let count = usize::try_from(row.payment_count).unwrap_or_default();
            summary.payment_count += count;
            summary.total_billed += row.billed;
            summary.total_collected += row.collected;
            summary.total_outstanding += row.outstanding;
            summary.total_overpaid += row.overpaid;

            match row.status.parse::<PaymentStatus>().map_err(AppError::Internal)? {
                PaymentStatus::Paid => summary.by_status.paid += count,
                PaymentStatus::Partial => summary.by_status.partial += count,
                PaymentStatus::Pending => summary.by_status.pending += count,
                PaymentStatus::Overdue => summary.by_status.overdue += count,
            }
        }

        Ok(summary)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Per-status aggregate row for [`PaymentStore::summarize_period`]
#[derive(sqlx::FromRow)]
struct StatusTotalsRow {
    status: String,
    payment_count: i64,
    billed: Decimal,
    collected: Decimal,
    outstanding: Decimal,
    overpaid: Decimal,
}

/// Database row representation for the payments table
#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: String,
    resident_id: String,
    period: String,
    amount: Decimal,
    amount_paid: Decimal,
    payment_type: String,
    method: Option<String>,
    transaction_reference: Option<String>,
    due_date: NaiveDate,
    paid_date: Option<NaiveDate>,
    status: String,
    is_paid: bool,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = AppError;

    fn try_from(row: PaymentRow) -> Result<Self> {
        let invalid = |e: String| AppError::Internal(format!("Invalid payment row: {}", e));

        let payment_type: PaymentType = row.payment_type.parse().map_err(invalid)?;
        let status: PaymentStatus = row.status.parse().map_err(invalid)?;
        let method = row
            .method
            .map(|m| m.parse::<PaymentMethod>())
            .transpose()
            .map_err(invalid)?;

        Ok(Payment::from_storage(
            row.id,
            row.resident_id,
            row.period,
            row.amount,
            row.amount_paid,
            payment_type,
            method,
            row.transaction_reference,
            row.due_date,
            row.paid_date,
            status,
            row.is_paid,
            row.notes,
            row.created_at,
            row.updated_at,
        ))
    }
}
