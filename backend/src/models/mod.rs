//! Request and response bodies for the calculation endpoints
//!
//! Records themselves come from the shared crate; this module adds the
//! request envelopes and their input validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub use shared::models::*;
use shared::{
    validate_application_rate, validate_field_area, validate_percentage, validate_yield,
    ManureType, MaterialRemainingData, MaterialRemainingSummary,
};

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn validate_crop_entry(entry: &FieldCropEntry) -> Result<(), ValidationError> {
    validate_yield(entry.yield_amount).map_err(|m| invalid("yield", m))?;
    if entry.n_credit < 0.0 || !entry.n_credit.is_finite() {
        return Err(invalid("nCredit", "N credit cannot be negative"));
    }
    if let Some(crude_protein) = entry.crude_protein {
        validate_percentage(crude_protein).map_err(|m| invalid("crudeProtein", m))?;
    }
    Ok(())
}

fn validate_application(application: &AppliedManure) -> Result<(), ValidationError> {
    validate_application_rate(application.application_rate)
        .map_err(|m| invalid("applicationRate", m))?;
    validate_percentage(application.nh4_retention).map_err(|m| invalid("nh4Retention", m))?;
    validate_percentage(application.n_available).map_err(|m| invalid("nAvailable", m))?;
    Ok(())
}

fn validate_soil_test(reading: &SoilTestReading) -> Result<(), ValidationError> {
    if !(0.0..=14.0).contains(&reading.val_ph) {
        return Err(invalid("valPH", "pH must be between 0 and 14"));
    }
    if reading.val_p < 0.0 || reading.val_k < 0.0 || reading.val_no3h < 0.0 {
        return Err(invalid("soilTest", "Soil test values cannot be negative"));
    }
    Ok(())
}

fn validate_planning_year(year: &PlanningYear) -> Result<(), ValidationError> {
    for field in &year.fields {
        validate_field_area(field.area).map_err(|m| invalid("area", m))?;
        for application in &field.manures {
            validate_application_rate(application.application_rate)
                .map_err(|m| invalid("applicationRate", m))?;
        }
    }
    let sources = year.manure_storage_systems.iter().chain(&year.imported_manures);
    for source in sources {
        if source.total_annual_amount_to_apply < 0.0 {
            return Err(invalid("annualAmount", "Annual amount cannot be negative"));
        }
    }
    Ok(())
}

// ============================================================================
// Crops
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CropNutrientsRequest {
    #[validate(range(min = 1))]
    pub region_id: i32,
    #[validate(custom = "validate_crop_entry")]
    pub crop: FieldCropEntry,
    #[validate(custom = "validate_soil_test")]
    pub soil_test: Option<SoilTestReading>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropNutrientsResponse {
    pub nutrients: CropNutrients,
    /// The submitted entry with its six nutrient columns filled in
    pub crop: FieldCropEntry,
}

// ============================================================================
// Manure
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ManureNutrientsRequest {
    #[validate(range(min = 1))]
    pub region_id: i32,
    pub analysis: ManureNutrientAnalysis,
    #[validate(custom = "validate_application")]
    pub application: AppliedManure,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityResponse {
    pub moisture_percent: f64,
    /// tonnes/m³
    pub density: f64,
}

// ============================================================================
// Material remaining
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRemainingRequest {
    #[validate(custom = "validate_planning_year")]
    #[serde(alias = "planningYear")]
    pub year: PlanningYear,
    /// Restrict the per-source lists to one material type
    #[serde(default)]
    pub material_type: Option<ManureType>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRemainingSummaryResponse {
    pub summary: MaterialRemainingSummary,
    pub warnings: Vec<String>,
}

impl From<MaterialRemainingData> for MaterialRemainingSummaryResponse {
    fn from(data: MaterialRemainingData) -> Self {
        Self {
            summary: data.summary(),
            warnings: data.materials_remaining_warnings,
        }
    }
}

// ============================================================================
// Fertigation
// ============================================================================

fn validate_fertigation(fertigation: &LiquidFertigation) -> Result<(), ValidationError> {
    validate_application_rate(fertigation.application_rate)
        .map_err(|m| invalid("applicationRate", m))?;
    if !fertigation.density.is_finite() || fertigation.density < 0.0 {
        return Err(invalid("density", "Density cannot be negative"));
    }
    if !fertigation.injection_rate.is_finite() || fertigation.injection_rate < 0.0 {
        return Err(invalid("injectionRate", "Injection rate cannot be negative"));
    }
    let nutrients = fertigation.nutrients;
    for percent in [nutrients.n, nutrients.p2o5, nutrients.k2o] {
        validate_percentage(percent).map_err(|m| invalid("nutrients", m))?;
    }
    Ok(())
}

fn validate_fertigation_area(request: &FertigationRequest) -> Result<(), ValidationError> {
    validate_field_area(request.field_area).map_err(|m| invalid("fieldArea", m))
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_fertigation_area"))]
pub struct FertigationRequest {
    /// Acres
    #[serde(alias = "area")]
    pub field_area: f64,
    #[validate(custom = "validate_fertigation")]
    pub fertigation: LiquidFertigation,
}

// ============================================================================
// Soil tests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SoilTestConversionRequest {
    #[validate(range(min = 1))]
    pub soil_test_method_id: i32,
    #[validate(custom = "validate_soil_test")]
    pub reading: SoilTestReading,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilTestConversionResponse {
    pub converted_kelowna_p: f64,
    pub converted_kelowna_k: f64,
    pub phosphorous_rating: Option<String>,
    pub potassium_rating: Option<String>,
}
