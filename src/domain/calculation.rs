//! Commission calculation record.

use crate::domain::{CalculationId, CalculationStatus, Decimal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of one commission calculation.
///
/// Amounts are annualized: `first_year_commission` is what the contract pays
/// over its first twelve months, `recurring_commission` what each renewal
/// year pays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionCalculation {
    pub id: CalculationId,
    /// Sales project this contract belongs to, when the caller links one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    pub insurer: String,
    pub monthly_premium: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salesperson: Option<String>,
    pub first_year_commission: Decimal,
    pub recurring_commission: Decimal,
    /// First-year rate actually applied (salesperson override or insurer default).
    pub effective_rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub status: CalculationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommissionCalculation {
    /// Attach the record to a sales project.
    pub fn with_project(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == CalculationStatus::Success
    }
}
