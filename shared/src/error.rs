//! Error types for the fail-fast calculators
//!
//! Every variant describes a data-integrity violation: the caller handed the
//! calculator an entry and reference records that do not belong together, or
//! the reference snapshot is missing a row it must contain.

use thiserror::Error;

use crate::types::SoilNutrient;

/// Calculation error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    #[error("Crop mismatch: entry references crop {entry_crop_id} but resolved crop is {resolved_crop_id}")]
    CropMismatch {
        entry_crop_id: i32,
        resolved_crop_id: i32,
    },

    #[error("Crop type mismatch: entry references crop type {entry_crop_type_id} but resolved crop type is {resolved_crop_type_id}")]
    CropTypeMismatch {
        entry_crop_type_id: i32,
        resolved_crop_type_id: i32,
    },

    #[error("{table} not found: id {id}")]
    NotFound { table: &'static str, id: i32 },

    #[error("No {nutrient} soil test region for crop {crop_id} in region code {soil_test_region_code}")]
    MissingCropSoilTestRegion {
        nutrient: SoilNutrient,
        crop_id: i32,
        soil_test_region_code: i32,
    },

    #[error("No {nutrient} recommendation for Kelowna range {kelowna_range_id}, soil test region {soil_test_region_code}, crop group region {crop_group_region_code}")]
    MissingRecommendation {
        nutrient: SoilNutrient,
        kelowna_range_id: i32,
        soil_test_region_code: i32,
        crop_group_region_code: i32,
    },

    #[error("{count} {nutrient} recommendations match Kelowna range {kelowna_range_id}, soil test region {soil_test_region_code}, crop group region {crop_group_region_code}")]
    AmbiguousRecommendation {
        nutrient: SoilNutrient,
        kelowna_range_id: i32,
        soil_test_region_code: i32,
        crop_group_region_code: i32,
        count: usize,
    },

    #[error("{nutrient} Kelowna range table is empty")]
    EmptyRangeTable { nutrient: SoilNutrient },

    #[error("Unable to convert soil test to Kelowna scale: {0}")]
    SoilTestConversion(String),

    #[error("Conversion factors are missing from the reference data")]
    MissingConversionFactors,

    #[error("Invalid reference data: {0}")]
    InvalidReferenceData(String),
}

/// Result type alias for fail-fast calculations
pub type CalculationResult<T> = Result<T, CalculationError>;
