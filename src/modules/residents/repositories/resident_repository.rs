// Resident directory backed by the `residents` table.
//
// The table belongs to the surrounding back office; the ledger only reads it.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::residents::models::{Resident, ResidentStatus};

/// Read access to residents
#[async_trait]
pub trait ResidentDirectory: Send + Sync {
    /// Residents currently eligible for rent invoices
    async fn active_residents(&self) -> Result<Vec<Resident>>;

    /// Find a resident by ID regardless of status
    async fn find_by_id(&self, id: &str) -> Result<Option<Resident>>;
}

/// MySQL implementation of [`ResidentDirectory`]
#[derive(Clone)]
pub struct ResidentRepository {
    pool: MySqlPool,
}

impl ResidentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResidentDirectory for ResidentRepository {
    async fn active_residents(&self) -> Result<Vec<Resident>> {
        let rows = sqlx::query_as::<_, ResidentRow>(
            r#"
            SELECT id, name, unit_number, status, monthly_rent
            FROM residents
            WHERE status = 'active'
            ORDER BY unit_number ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch active residents: {}", e)))?;

        rows.into_iter().map(|row| row.try_into()).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Resident>> {
        let row = sqlx::query_as::<_, ResidentRow>(
            r#"
            SELECT id, name, unit_number, status, monthly_rent
            FROM residents
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch resident: {}", e)))?;

        match row {
            Some(r) => Ok(Some(r.try_into()?)),
            None => Ok(None),
        }
    }
}

/// Database row representation for the residents table
#[derive(sqlx::FromRow)]
struct ResidentRow {
    id: String,
    name: String,
    unit_number: String,
    status: String,
    monthly_rent: Decimal,
}

impl TryFrom<ResidentRow> for Resident {
    type Error = AppError;

    fn try_from(row: ResidentRow) -> Result<Self> {
        let status: ResidentStatus = row
            .status
            .parse()
            .map_err(|e: String| AppError::Internal(format!("Invalid resident row: {}", e)))?;

        Ok(Resident {
            id: row.id,
            name: row.name,
            unit_number: row.unit_number,
            status,
            monthly_rent: row.monthly_rent,
        })
    }
}
