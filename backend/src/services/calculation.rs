//! Calculation service over the shared reference snapshot

use std::sync::Arc;

use shared::{
    density_factor, validate_moisture, CalculationError, MaterialRemainingData, ReferenceTables,
    SoilNutrient,
};

use crate::error::{AppError, AppResult};
use crate::models::{
    CropNutrientsRequest, CropNutrientsResponse, DensityResponse, FertigationRequest,
    FertigationResult, ManureNutrientsRequest, MaterialRemainingRequest, NutrientInputs,
    SoilTestConversionRequest, SoilTestConversionResponse,
};

/// Runs the shared calculators against one immutable snapshot
#[derive(Clone)]
pub struct CalculationService {
    reference: Arc<ReferenceTables>,
}

impl CalculationService {
    /// Create a new CalculationService instance
    pub fn new(reference: Arc<ReferenceTables>) -> Self {
        Self { reference }
    }

    /// Requirement and removal for one crop entry
    pub fn crop_nutrients(&self, input: CropNutrientsRequest) -> AppResult<CropNutrientsResponse> {
        let nutrients = self.reference.crop_nutrients(
            &input.crop,
            input.soil_test.as_ref(),
            input.region_id,
        )?;

        let mut crop = input.crop;
        crop.apply_nutrients(&nutrients);
        Ok(CropNutrientsResponse { nutrients, crop })
    }

    /// Plant-available nutrients of one manure application
    pub fn manure_nutrients(&self, input: &ManureNutrientsRequest) -> NutrientInputs {
        self.reference
            .manure_nutrient_inputs(&input.analysis, &input.application, input.region_id)
    }

    /// Allocation status of every source, optionally narrowed to one material type
    pub fn material_remaining(&self, input: &MaterialRemainingRequest) -> MaterialRemainingData {
        let mut data = self.reference.material_remaining(&input.year);
        if let Some(material_type) = input.material_type {
            data.retain_material_type(material_type);
        }
        data
    }

    /// Convert a lab reading onto the Kelowna scale and rate the result
    pub fn convert_soil_test(
        &self,
        input: &SoilTestConversionRequest,
    ) -> AppResult<SoilTestConversionResponse> {
        let converted = self
            .reference
            .convert_soil_test(input.soil_test_method_id, &input.reading)
            .map_err(lookup_error)?;

        let rating = |nutrient, value| {
            self.reference
                .soil_test_rating(nutrient, value)
                .map(|r| r.rating.clone())
        };

        Ok(SoilTestConversionResponse {
            converted_kelowna_p: converted.converted_kelowna_p,
            converted_kelowna_k: converted.converted_kelowna_k,
            phosphorous_rating: rating(SoilNutrient::Phosphorous, converted.converted_kelowna_p),
            potassium_rating: rating(SoilNutrient::Potassium, converted.converted_kelowna_k),
        })
    }

    /// Volumes, injection time and applied nutrients of a liquid fertigation
    pub fn fertigation(&self, input: &FertigationRequest) -> AppResult<FertigationResult> {
        self.reference
            .liquid_fertigation(&input.fertigation, input.field_area)
            .map_err(lookup_error)
    }

    /// Bulk density of solid manure at a moisture percentage
    pub fn density(&self, moisture_percent: f64) -> AppResult<DensityResponse> {
        validate_moisture(moisture_percent).map_err(|message| AppError::Validation {
            field: "moisture".to_string(),
            message: message.to_string(),
        })?;
        Ok(DensityResponse {
            moisture_percent,
            density: density_factor(moisture_percent),
        })
    }
}

/// Unknown reference ids requested by the caller are a 404, not a calculation failure
fn lookup_error(error: CalculationError) -> AppError {
    match error {
        CalculationError::NotFound { table, id } => AppError::NotFound(format!("{} {}", table, id)),
        other => other.into(),
    }
}
