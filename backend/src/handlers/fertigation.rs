//! HTTP handler for the liquid fertigation calculator

use axum::{extract::State, Json};
use validator::Validate;

use crate::error::AppResult;
use crate::models::{FertigationRequest, FertigationResult};
use crate::services::CalculationService;
use crate::AppState;

/// Volumes, injection time and applied nutrients of a liquid fertigation
pub async fn calculate_fertigation(
    State(state): State<AppState>,
    Json(input): Json<FertigationRequest>,
) -> AppResult<Json<FertigationResult>> {
    input.validate()?;
    let service = CalculationService::new(state.reference);
    Ok(Json(service.fertigation(&input)?))
}
