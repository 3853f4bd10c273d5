use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::api::calculations::{parse_filter, CalculationsQuery};
use crate::api::{AmountDto, AppState};
use crate::domain::{CommissionCalculation, CommissionStats, GlobalStats, GroupStats};
use crate::engine::{aggregate, breakdown};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStatsDto {
    pub total_first_year: AmountDto,
    pub total_recurring: AmountDto,
    pub average_per_contract: AmountDto,
    pub count: u64,
}

impl From<GlobalStats> for GlobalStatsDto {
    fn from(stats: GlobalStats) -> Self {
        GlobalStatsDto {
            total_first_year: stats.total_first_year.into(),
            total_recurring: stats.total_recurring.into(),
            average_per_contract: stats.average_per_contract.into(),
            count: stats.count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStatsDto {
    pub monthly_commission: AmountDto,
    pub annual_commission: AmountDto,
    pub contract_count: u64,
    pub average_rate: String,
    pub total_monthly_premium: AmountDto,
    pub total_annual_premium: AmountDto,
}

impl From<GroupStats> for GroupStatsDto {
    fn from(group: GroupStats) -> Self {
        GroupStatsDto {
            monthly_commission: group.monthly_commission.into(),
            annual_commission: group.annual_commission.into(),
            contract_count: group.contract_count,
            average_rate: group.average_rate.to_canonical_string(),
            total_monthly_premium: group.total_monthly_premium.into(),
            total_annual_premium: group.total_annual_premium.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownDto {
    pub total_monthly_commission: AmountDto,
    pub total_annual_commission: AmountDto,
    pub total_recurring_commission: AmountDto,
    pub by_insurer: BTreeMap<String, GroupStatsDto>,
    pub by_salesperson: BTreeMap<String, GroupStatsDto>,
    pub monthly_evolution: BTreeMap<String, AmountDto>,
    pub success_rate: String,
    pub contract_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl From<CommissionStats> for BreakdownDto {
    fn from(stats: CommissionStats) -> Self {
        fn groups(map: BTreeMap<String, GroupStats>) -> BTreeMap<String, GroupStatsDto> {
            map.into_iter().map(|(k, v)| (k, v.into())).collect()
        }

        BreakdownDto {
            total_monthly_commission: stats.total_monthly_commission.into(),
            total_annual_commission: stats.total_annual_commission.into(),
            total_recurring_commission: stats.total_recurring_commission.into(),
            by_insurer: groups(stats.by_insurer),
            by_salesperson: groups(stats.by_salesperson),
            monthly_evolution: stats
                .monthly_evolution
                .into_iter()
                .map(|(month, amount)| (month, amount.into()))
                .collect(),
            success_rate: stats.success_rate.to_canonical_string(),
            contract_count: stats.contract_count,
            last_updated: stats.last_updated.map(|ts| ts.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub global: GlobalStatsDto,
    pub breakdown: BreakdownDto,
}

/// Statistics over stored records matching the query filters.
pub async fn get_stats(
    Query(params): Query<CalculationsQuery>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let filter = parse_filter(params)?;
    let calculations = state.store.list(&filter).await?;

    Ok(Json(StatsResponse {
        global: aggregate(&calculations).into(),
        breakdown: breakdown(&calculations).into(),
    }))
}

/// Statistics over records supplied by the caller; nothing is read or stored.
pub async fn aggregate_supplied(
    Json(calculations): Json<Vec<CommissionCalculation>>,
) -> Json<GlobalStatsDto> {
    Json(aggregate(&calculations).into())
}
