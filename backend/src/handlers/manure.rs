//! HTTP handlers for manure nutrient and density endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::error::AppResult;
use crate::models::{DensityResponse, ManureNutrientsRequest, NutrientInputs};
use crate::services::CalculationService;
use crate::AppState;

/// Calculate plant-available nutrients of a manure application
pub async fn calculate_manure_nutrients(
    State(state): State<AppState>,
    Json(input): Json<ManureNutrientsRequest>,
) -> AppResult<Json<NutrientInputs>> {
    input.validate()?;
    let service = CalculationService::new(state.reference);
    Ok(Json(service.manure_nutrients(&input)))
}

/// Bulk density of solid manure at the given moisture percent
pub async fn get_density(
    State(state): State<AppState>,
    Path(moisture): Path<f64>,
) -> AppResult<Json<DensityResponse>> {
    let service = CalculationService::new(state.reference);
    let density = service.density(moisture)?;
    Ok(Json(density))
}
