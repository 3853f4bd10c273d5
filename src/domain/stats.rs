//! Aggregate statistics over commission calculations.

use crate::domain::Decimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Totals over a collection of calculations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_first_year: Decimal,
    pub total_recurring: Decimal,
    /// `total_first_year / count`, or zero for an empty collection.
    pub average_per_contract: Decimal,
    pub count: u64,
}

/// Commission figures for one insurer or one salesperson.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    /// First-year commission per month (annual / 12).
    pub monthly_commission: Decimal,
    /// First-year commission over the year.
    pub annual_commission: Decimal,
    pub contract_count: u64,
    /// Mean effective first-year rate across the group's contracts.
    pub average_rate: Decimal,
    pub total_monthly_premium: Decimal,
    pub total_annual_premium: Decimal,
}

/// Detailed breakdown of a collection of calculations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionStats {
    pub total_monthly_commission: Decimal,
    pub total_annual_commission: Decimal,
    pub total_recurring_commission: Decimal,
    pub by_insurer: BTreeMap<String, GroupStats>,
    /// Records without a salesperson do not appear here.
    pub by_salesperson: BTreeMap<String, GroupStats>,
    /// First-year commission per calendar month, keyed `YYYY-MM`.
    pub monthly_evolution: BTreeMap<String, Decimal>,
    /// Share of records whose status is `success`, in [0, 1].
    pub success_rate: Decimal,
    pub contract_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}
