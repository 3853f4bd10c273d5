pub mod calculations;
pub mod health;
pub mod rates;
pub mod stats;

use crate::domain::{CommissionCalculation, Decimal};
use crate::engine::{format_currency, CommissionEngine};
use crate::store::CalculationStore;
use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub engine: CommissionEngine,
    pub store: Arc<dyn CalculationStore>,
}

impl AppState {
    pub fn new(engine: CommissionEngine, store: Arc<dyn CalculationStore>) -> Self {
        Self { engine, store }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/insurers", get(rates::list_insurers))
        .route("/v1/insurers/:name", get(rates::get_insurer))
        .route("/v1/salespersons", get(rates::list_salespersons))
        .route("/v1/salespersons/:name/rate", get(rates::get_salesperson_rate))
        .route(
            "/v1/calculations",
            post(calculations::create_calculation).get(calculations::list_calculations),
        )
        .route(
            "/v1/calculations/:id",
            get(calculations::get_calculation)
                .patch(calculations::update_calculation)
                .delete(calculations::delete_calculation),
        )
        .route("/v1/stats", get(stats::get_stats))
        .route("/v1/stats/aggregate", post(stats::aggregate_supplied))
        .layer(cors)
        .with_state(state)
}

/// A monetary amount as an exact string plus its euro rendering.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountDto {
    pub value: String,
    pub formatted: String,
}

impl From<Decimal> for AmountDto {
    fn from(amount: Decimal) -> Self {
        AmountDto {
            value: amount.to_canonical_string(),
            formatted: format_currency(amount),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationDto {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    pub insurer: String,
    pub monthly_premium: AmountDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salesperson: Option<String>,
    pub first_year_commission: AmountDto,
    pub recurring_commission: AmountDto,
    pub effective_rate: String,
    pub created_at: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<CommissionCalculation> for CalculationDto {
    fn from(calc: CommissionCalculation) -> Self {
        CalculationDto {
            id: calc.id.0,
            project_id: calc.project_id,
            insurer: calc.insurer,
            monthly_premium: calc.monthly_premium.into(),
            salesperson: calc.salesperson,
            first_year_commission: calc.first_year_commission.into(),
            recurring_commission: calc.recurring_commission.into(),
            effective_rate: calc.effective_rate.to_canonical_string(),
            created_at: calc.created_at.to_rfc3339(),
            status: calc.status.to_string(),
            message: calc.message,
        }
    }
}
