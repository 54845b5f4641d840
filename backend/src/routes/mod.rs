//! Route definitions for the nutrient calculation server

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/calculations", calculation_routes())
}

/// Calculator routes
fn calculation_routes() -> Router<AppState> {
    Router::new()
        .route("/crops", post(handlers::calculate_crop_nutrients))
        .route("/manure", post(handlers::calculate_manure_nutrients))
        .route("/fertigation", post(handlers::calculate_fertigation))
        .route(
            "/material-remaining",
            post(handlers::calculate_material_remaining),
        )
        .route(
            "/material-remaining/summary",
            post(handlers::get_material_remaining_summary),
        )
        .route("/soil-tests/convert", post(handlers::convert_soil_test))
        .route("/density/:moisture", get(handlers::get_density))
}
