//! HTTP handlers for soil test endpoints

use axum::{extract::State, Json};
use validator::Validate;

use crate::error::AppResult;
use crate::models::{SoilTestConversionRequest, SoilTestConversionResponse};
use crate::services::CalculationService;
use crate::AppState;

/// Convert a lab soil test onto the Kelowna scale
pub async fn convert_soil_test(
    State(state): State<AppState>,
    Json(input): Json<SoilTestConversionRequest>,
) -> AppResult<Json<SoilTestConversionResponse>> {
    input.validate()?;
    let service = CalculationService::new(state.reference);
    let converted = service.convert_soil_test(&input)?;
    Ok(Json(converted))
}
