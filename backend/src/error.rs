//! Error handling for the nutrient calculation server
//!
//! Calculation integrity failures are blocking: the client must stop and
//! surface the message instead of showing partial numbers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::CalculationError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Calculation errors
    #[error("Calculation integrity error: {0}")]
    Calculation(#[from] CalculationError),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Reference data error: {0}")]
    ReferenceData(String),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    /// The client must halt the calculation flow
    pub blocking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Calculation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Validation { .. } | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_)
            | AppError::ReferenceData(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> ErrorDetail {
        let plain = |code: &str, message: String| ErrorDetail {
            code: code.to_string(),
            message,
            blocking: false,
            field: None,
        };

        match self {
            AppError::Calculation(err) => ErrorDetail {
                code: "CALCULATION_INTEGRITY_ERROR".to_string(),
                message: err.to_string(),
                blocking: true,
                field: None,
            },
            AppError::Validation { field, message } => ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message: message.clone(),
                blocking: false,
                field: Some(field.clone()),
            },
            AppError::ValidationError(msg) => plain("VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(resource) => plain("NOT_FOUND", format!("{} not found", resource)),
            AppError::Configuration(msg) => {
                plain("CONFIGURATION_ERROR", format!("Configuration error: {}", msg))
            }
            AppError::ReferenceData(msg) => {
                plain("REFERENCE_DATA_ERROR", format!("Reference data error: {}", msg))
            }
            AppError::InternalError(_) => plain(
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_detail = self.detail();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!(code = %error_detail.code, "Request failed: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::SoilNutrient;

    #[test]
    fn test_calculation_errors_are_blocking_422() {
        let err = AppError::from(CalculationError::EmptyRangeTable {
            nutrient: SoilNutrient::Phosphorous,
        });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let detail = err.detail();
        assert_eq!(detail.code, "CALCULATION_INTEGRITY_ERROR");
        assert!(detail.blocking);
        assert_eq!(detail.message, "phosphorous Kelowna range table is empty");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::ValidationError("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound("source".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::ReferenceData("missing".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(!AppError::NotFound("source".into()).detail().blocking);
    }
}
