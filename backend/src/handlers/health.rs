//! Health check handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub reference_data: ReferenceDataStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ReferenceDataStatus {
    pub crops: usize,
    pub regions: usize,
    pub manures: usize,
    pub range_order_issues: Vec<String>,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let reference = &state.reference;

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        reference_data: ReferenceDataStatus {
            crops: reference.crops.len(),
            regions: reference.regions.len(),
            manures: reference.manures.len(),
            range_order_issues: reference.range_order_issues(),
        },
        timestamp: Utc::now(),
    })
}
