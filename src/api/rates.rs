use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::AppState;
use crate::domain::RateConfig;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsurerDto {
    pub insurer_id: String,
    pub insurer_name: String,
    pub first_year_rate: String,
    pub recurring_rate: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_premium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_premium: Option<String>,
}

impl From<&RateConfig> for InsurerDto {
    fn from(config: &RateConfig) -> Self {
        InsurerDto {
            insurer_id: config.insurer_id.clone(),
            insurer_name: config.insurer_name.clone(),
            first_year_rate: config.first_year_rate.to_canonical_string(),
            recurring_rate: config.recurring_rate.to_canonical_string(),
            created_at: config.created_at.to_rfc3339(),
            min_premium: config.min_premium.map(|d| d.to_canonical_string()),
            max_premium: config.max_premium.map(|d| d.to_canonical_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalespersonRateDto {
    pub salesperson: String,
    pub rate: String,
    /// False when the default fallback rate applies.
    pub is_override: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalespersonsResponse {
    pub default_rate: String,
    pub overrides: Vec<SalespersonRateDto>,
}

pub async fn list_insurers(State(state): State<AppState>) -> Json<Vec<InsurerDto>> {
    let insurers = state
        .engine
        .registry()
        .list_active_configs()
        .map(InsurerDto::from)
        .collect();
    Json(insurers)
}

pub async fn get_insurer(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<InsurerDto>, AppError> {
    state
        .engine
        .registry()
        .lookup_insurer_config(&name)
        .map(|config| Json(InsurerDto::from(config)))
        .ok_or_else(|| AppError::NotFound(format!("no active rate config for insurer {}", name)))
}

pub async fn list_salespersons(State(state): State<AppState>) -> Json<SalespersonsResponse> {
    let registry = state.engine.registry();
    let overrides = registry
        .list_salesperson_overrides()
        .map(|(name, rate)| SalespersonRateDto {
            salesperson: name.to_string(),
            rate: rate.to_canonical_string(),
            is_override: true,
        })
        .collect();

    Json(SalespersonsResponse {
        default_rate: registry.default_salesperson_rate().to_canonical_string(),
        overrides,
    })
}

pub async fn get_salesperson_rate(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> Json<SalespersonRateDto> {
    let registry = state.engine.registry();
    Json(SalespersonRateDto {
        rate: registry.lookup_salesperson_rate(&name).to_canonical_string(),
        is_override: registry.salesperson_override(&name).is_some(),
        salesperson: name,
    })
}
