//! Record store abstraction for persisted commission calculations.
//!
//! The engine never persists anything itself; callers hand finished records to
//! a `CalculationStore` and read them back for display or re-aggregation.

use crate::domain::{CalculationId, CalculationStatus, CommissionCalculation};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod memory;

pub use memory::MemoryStore;

/// Create/read/update/delete access to calculation records.
#[async_trait]
pub trait CalculationStore: Send + Sync + fmt::Debug {
    /// Store a new record. Fails with `Duplicate` if the id is already taken.
    async fn insert(&self, calculation: &CommissionCalculation) -> Result<(), StoreError>;

    /// Fetch a record by id.
    async fn get(&self, id: &CalculationId) -> Result<Option<CommissionCalculation>, StoreError>;

    /// Records matching the filter, oldest first (ties broken by id).
    async fn list(
        &self,
        filter: &CalculationFilter,
    ) -> Result<Vec<CommissionCalculation>, StoreError>;

    /// Set the caller-side status and message of a record and return it.
    async fn update_status(
        &self,
        id: &CalculationId,
        status: CalculationStatus,
        message: Option<String>,
    ) -> Result<CommissionCalculation, StoreError>;

    /// Remove a record. Fails with `NotFound` if it does not exist.
    async fn delete(&self, id: &CalculationId) -> Result<(), StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("calculation {0} already exists")]
    Duplicate(String),
    #[error("calculation {0} not found")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("corrupt record {id}: {message}")]
    Corrupt { id: String, message: String },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Optional criteria for listing records. Empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationFilter {
    /// Case-insensitive insurer match.
    pub insurer: Option<String>,
    /// Exact salesperson match.
    pub salesperson: Option<String>,
    pub status: Option<CalculationStatus>,
}

impl CalculationFilter {
    pub fn matches(&self, calculation: &CommissionCalculation) -> bool {
        let insurer_ok = self
            .insurer
            .as_deref()
            .map_or(true, |i| insurer_key(i) == insurer_key(&calculation.insurer));
        let salesperson_ok = self
            .salesperson
            .as_deref()
            .map_or(true, |s| calculation.salesperson.as_deref() == Some(s));
        let status_ok = self.status.map_or(true, |s| calculation.status == s);

        insurer_ok && salesperson_ok && status_ok
    }
}

/// Normalized insurer name used for case-insensitive filtering.
pub fn insurer_key(insurer: &str) -> String {
    insurer.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Decimal;
    use chrono::Utc;

    fn calc(insurer: &str, salesperson: Option<&str>, status: CalculationStatus) -> CommissionCalculation {
        CommissionCalculation {
            id: CalculationId::generate(),
            project_id: None,
            insurer: insurer.to_string(),
            monthly_premium: Decimal::from(100),
            salesperson: salesperson.map(str::to_string),
            first_year_commission: Decimal::from(315),
            recurring_commission: Decimal::from_scaled(1575, 1),
            effective_rate: Decimal::from_scaled(30, 2),
            created_at: Utc::now(),
            status,
            message: None,
        }
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = CalculationFilter::default();
        assert!(filter.matches(&calc("SPVIE", None, CalculationStatus::Success)));
        assert!(filter.matches(&calc("APRIL", Some("X"), CalculationStatus::Error)));
    }

    #[test]
    fn test_filter_insurer_is_case_insensitive() {
        let filter = CalculationFilter {
            insurer: Some("néoliane".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&calc("NÉOLIANE", None, CalculationStatus::Success)));
        assert!(!filter.matches(&calc("SPVIE", None, CalculationStatus::Success)));
    }

    #[test]
    fn test_filter_salesperson_and_status() {
        let filter = CalculationFilter {
            salesperson: Some("HADIR SFAR".to_string()),
            status: Some(CalculationStatus::Pending),
            ..Default::default()
        };
        assert!(filter.matches(&calc("SPVIE", Some("HADIR SFAR"), CalculationStatus::Pending)));
        assert!(!filter.matches(&calc("SPVIE", Some("hadir sfar"), CalculationStatus::Pending)));
        assert!(!filter.matches(&calc("SPVIE", Some("HADIR SFAR"), CalculationStatus::Success)));
        assert!(!filter.matches(&calc("SPVIE", None, CalculationStatus::Pending)));
    }

    #[test]
    fn test_store_error_display() {
        assert_eq!(
            StoreError::NotFound("calc_1".to_string()).to_string(),
            "calculation calc_1 not found"
        );
        assert_eq!(
            StoreError::Duplicate("calc_1".to_string()).to_string(),
            "calculation calc_1 already exists"
        );
    }
}
