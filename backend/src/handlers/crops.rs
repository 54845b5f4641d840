//! HTTP handlers for crop nutrient endpoints

use axum::{extract::State, Json};
use validator::Validate;

use crate::error::AppResult;
use crate::models::{CropNutrientsRequest, CropNutrientsResponse};
use crate::services::CalculationService;
use crate::AppState;

/// Calculate requirement and removal for a field crop
pub async fn calculate_crop_nutrients(
    State(state): State<AppState>,
    Json(input): Json<CropNutrientsRequest>,
) -> AppResult<Json<CropNutrientsResponse>> {
    input.validate()?;
    let service = CalculationService::new(state.reference);
    let response = service.crop_nutrients(input)?;
    Ok(Json(response))
}
