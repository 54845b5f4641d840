//! HTTP handlers for material remaining endpoints

use axum::{extract::State, Json};
use validator::Validate;

use crate::error::AppResult;
use crate::models::{MaterialRemainingRequest, MaterialRemainingSummaryResponse};
use crate::services::CalculationService;
use crate::AppState;
use shared::MaterialRemainingData;

/// Allocation status of every manure source in a planning year
pub async fn calculate_material_remaining(
    State(state): State<AppState>,
    Json(input): Json<MaterialRemainingRequest>,
) -> AppResult<Json<MaterialRemainingData>> {
    input.validate()?;
    let service = CalculationService::new(state.reference);
    Ok(Json(service.material_remaining(&input)))
}

/// Totals and warnings across every manure source in a planning year
pub async fn get_material_remaining_summary(
    State(state): State<AppState>,
    Json(input): Json<MaterialRemainingRequest>,
) -> AppResult<Json<MaterialRemainingSummaryResponse>> {
    input.validate()?;
    let service = CalculationService::new(state.reference);
    let data = service.material_remaining(&input);
    Ok(Json(data.into()))
}
