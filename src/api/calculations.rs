use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::str::FromStr;

use crate::api::{AppState, CalculationDto};
use crate::domain::{CalculationId, CalculationStatus, Decimal};
use crate::engine::is_valid_premium;
use crate::error::AppError;
use crate::store::CalculationFilter;

/// Single message for every not-applicable outcome; the reason is only logged.
const NOT_APPLICABLE_MESSAGE: &str = "commission cannot be computed for these inputs";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCalculationRequest {
    pub insurer: String,
    pub monthly_premium: Decimal,
    pub salesperson: Option<String>,
    pub project_id: Option<i64>,
    /// Store the record (default true).
    pub persist: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationsQuery {
    pub insurer: Option<String>,
    pub salesperson: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCalculationRequest {
    pub status: String,
    pub message: Option<String>,
}

pub async fn create_calculation(
    State(state): State<AppState>,
    Json(req): Json<CreateCalculationRequest>,
) -> Result<(StatusCode, Json<CalculationDto>), AppError> {
    if !is_valid_premium(req.monthly_premium) {
        return Err(AppError::BadRequest(
            "monthlyPremium must be greater than 0 and at most 10000".to_string(),
        ));
    }

    // A blank salesperson counts as none, so the insurer's own rate applies.
    let salesperson = req
        .salesperson
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let mut calculation = state
        .engine
        .calculate(&req.insurer, req.monthly_premium, salesperson)
        .ok_or_else(|| AppError::Unprocessable(NOT_APPLICABLE_MESSAGE.to_string()))?;

    if let Some(project_id) = req.project_id {
        calculation = calculation.with_project(project_id);
    }

    if !req.persist.unwrap_or(true) {
        return Ok((StatusCode::OK, Json(calculation.into())));
    }

    state.store.insert(&calculation).await?;
    tracing::info!(
        id = %calculation.id,
        insurer = %calculation.insurer,
        first_year = %calculation.first_year_commission,
        "Stored commission calculation"
    );

    Ok((StatusCode::CREATED, Json(calculation.into())))
}

pub async fn list_calculations(
    Query(params): Query<CalculationsQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CalculationDto>>, AppError> {
    let filter = parse_filter(params)?;
    let calculations = state.store.list(&filter).await?;
    Ok(Json(calculations.into_iter().map(CalculationDto::from).collect()))
}

pub async fn get_calculation(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<CalculationDto>, AppError> {
    state
        .store
        .get(&CalculationId::new(id.clone()))
        .await?
        .map(|calc| Json(calc.into()))
        .ok_or_else(|| AppError::NotFound(format!("calculation {}", id)))
}

pub async fn update_calculation(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<UpdateCalculationRequest>,
) -> Result<Json<CalculationDto>, AppError> {
    let status = CalculationStatus::from_str(&req.status).map_err(AppError::BadRequest)?;
    let updated = state
        .store
        .update_status(&CalculationId::new(id), status, req.message)
        .await?;
    Ok(Json(updated.into()))
}

pub async fn delete_calculation(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.store.delete(&CalculationId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Turn query parameters into a store filter. Blank values are ignored.
pub(crate) fn parse_filter(params: CalculationsQuery) -> Result<CalculationFilter, AppError> {
    fn non_blank(value: Option<String>) -> Option<String> {
        value
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    let status = non_blank(params.status)
        .map(|s| CalculationStatus::from_str(&s))
        .transpose()
        .map_err(AppError::BadRequest)?;

    Ok(CalculationFilter {
        insurer: non_blank(params.insurer),
        salesperson: non_blank(params.salesperson),
        status,
    })
}
