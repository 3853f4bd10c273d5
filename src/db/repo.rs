//! SQLite-backed calculation store.
//!
//! Decimals are stored as canonical strings so they round-trip exactly;
//! timestamps as RFC 3339 text with a fixed precision so that lexical order
//! matches chronological order.

use crate::domain::{CalculationId, CalculationStatus, CommissionCalculation, Decimal};
use crate::store::{insurer_key, CalculationFilter, CalculationStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::warn;

const SELECT_COLUMNS: &str = r#"
    SELECT id, project_id, insurer, monthly_premium, salesperson,
           first_year_commission, recurring_commission, effective_rate,
           created_at, status, message
    FROM calculations
"#;

/// Calculation store over an SQLite connection pool.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }
}

#[async_trait]
impl CalculationStore for Repository {
    async fn insert(&self, calculation: &CommissionCalculation) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO calculations (
                id, project_id, insurer, insurer_key, monthly_premium, salesperson,
                first_year_commission, recurring_commission, effective_rate,
                created_at, status, message
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(calculation.id.as_str())
        .bind(calculation.project_id)
        .bind(&calculation.insurer)
        .bind(insurer_key(&calculation.insurer))
        .bind(calculation.monthly_premium.to_canonical_string())
        .bind(calculation.salesperson.as_deref())
        .bind(calculation.first_year_commission.to_canonical_string())
        .bind(calculation.recurring_commission.to_canonical_string())
        .bind(calculation.effective_rate.to_canonical_string())
        .bind(format_timestamp(&calculation.created_at))
        .bind(calculation.status.as_str())
        .bind(calculation.message.as_deref())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Duplicate(calculation.id.to_string()));
        }
        Ok(())
    }

    async fn get(&self, id: &CalculationId) -> Result<Option<CommissionCalculation>, StoreError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_calculation).transpose()
    }

    async fn list(
        &self,
        filter: &CalculationFilter,
    ) -> Result<Vec<CommissionCalculation>, StoreError> {
        let rows = sqlx::query(&format!(
            r#"{}
            WHERE (?1 IS NULL OR insurer_key = ?1)
              AND (?2 IS NULL OR salesperson = ?2)
              AND (?3 IS NULL OR status = ?3)
            ORDER BY created_at ASC, id ASC
            "#,
            SELECT_COLUMNS
        ))
        .bind(filter.insurer.as_deref().map(insurer_key))
        .bind(filter.salesperson.as_deref())
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_calculation).collect()
    }

    async fn update_status(
        &self,
        id: &CalculationId,
        status: CalculationStatus,
        message: Option<String>,
    ) -> Result<CommissionCalculation, StoreError> {
        let result = sqlx::query("UPDATE calculations SET status = ?, message = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(message.as_deref())
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        self.get(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &CalculationId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM calculations WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_calculation(row: &SqliteRow) -> Result<CommissionCalculation, StoreError> {
    let id: String = row.get("id");
    let corrupt = |message: String| {
        warn!(id = %id, %message, "Malformed stored calculation");
        StoreError::Corrupt {
            id: id.clone(),
            message,
        }
    };

    let decimal = |column: &str| -> Result<Decimal, StoreError> {
        let raw: String = row.get(column);
        Decimal::from_str(&raw).map_err(|e| corrupt(format!("{} {:?}: {}", column, raw, e)))
    };

    let created_at_raw: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| corrupt(format!("created_at {:?}: {}", created_at_raw, e)))?;

    let status_raw: String = row.get("status");
    let status = CalculationStatus::from_str(&status_raw).map_err(corrupt)?;

    Ok(CommissionCalculation {
        id: CalculationId::new(id.clone()),
        project_id: row.get("project_id"),
        insurer: row.get("insurer"),
        monthly_premium: decimal("monthly_premium")?,
        salesperson: row.get("salesperson"),
        first_year_commission: decimal("first_year_commission")?,
        recurring_commission: decimal("recurring_commission")?,
        effective_rate: decimal("effective_rate")?,
        created_at,
        status,
        message: row.get("message"),
    })
}
