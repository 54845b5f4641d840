//! WebAssembly module for Nutrient Management Planning
//!
//! Provides client-side computation for:
//! - Crop requirement and removal
//! - Manure nutrient availability
//! - Material remaining per manure source
//! - Liquid fertigation
//! - Solid manure density
//!
//! Records cross the boundary as JSON strings in the same shape the
//! planning file stores them.

use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;

use shared::{
    AppliedManure, FieldCropEntry, LiquidFertigation, ManureNutrientAnalysis, ManureType,
    PlanningYear, ReferenceTables, SoilTestReading,
};

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn parse<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Unable to serialize result: {}", e))
}

/// Log to the browser console and hand the message back to the caller
fn to_js_error(message: String) -> JsValue {
    web_sys::console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

/// Calculators bound to one reference table snapshot
#[wasm_bindgen]
pub struct NutrientCalculator {
    tables: ReferenceTables,
}

impl NutrientCalculator {
    fn from_json(reference_json: &str) -> Result<Self, String> {
        let tables = ReferenceTables::from_json_str(reference_json).map_err(|e| e.to_string())?;
        tables.validate(false).map_err(|e| e.to_string())?;
        Ok(Self { tables })
    }

    fn crop_nutrients_json(
        &self,
        entry_json: &str,
        soil_test_json: Option<String>,
        region_id: i32,
    ) -> Result<String, String> {
        let mut entry: FieldCropEntry = parse("crop entry", entry_json)?;
        let soil_test: Option<SoilTestReading> = soil_test_json
            .as_deref()
            .map(|json| parse("soil test", json))
            .transpose()?;

        let nutrients = self
            .tables
            .crop_nutrients(&entry, soil_test.as_ref(), region_id)
            .map_err(|e| e.to_string())?;
        entry.apply_nutrients(&nutrients);
        to_json(&entry)
    }

    fn manure_nutrients_json(
        &self,
        analysis_json: &str,
        application_json: &str,
        region_id: i32,
    ) -> Result<String, String> {
        let analysis: ManureNutrientAnalysis = parse("manure analysis", analysis_json)?;
        let application: AppliedManure = parse("manure application", application_json)?;
        to_json(&self.tables.manure_nutrient_inputs(&analysis, &application, region_id))
    }

    fn material_remaining_json(&self, year_json: &str) -> Result<String, String> {
        let year: PlanningYear = parse("planning year", year_json)?;
        to_json(&self.tables.material_remaining(&year))
    }

    fn material_remaining_summary_json(&self, year_json: &str) -> Result<String, String> {
        let year: PlanningYear = parse("planning year", year_json)?;
        to_json(&self.tables.material_remaining(&year).summary())
    }

    fn sources_of_type_json(&self, year_json: &str, material_type: &str) -> Result<String, String> {
        let year: PlanningYear = parse("planning year", year_json)?;
        let material_type = ManureType::from_label(material_type)
            .ok_or_else(|| format!("Unknown material type: {}", material_type))?;
        let data = self.tables.material_remaining(&year);
        to_json(&data.filter_by_material_type(material_type))
    }

    fn liquid_fertigation_json(&self, fertigation_json: &str, area: f64) -> Result<String, String> {
        let fertigation: LiquidFertigation = parse("fertigation", fertigation_json)?;
        validate_field_area(area).map_err(str::to_string)?;
        let result = self
            .tables
            .liquid_fertigation(&fertigation, area)
            .map_err(|e| e.to_string())?;
        to_json(&result)
    }
}

#[wasm_bindgen]
impl NutrientCalculator {
    /// Parse the reference table snapshot
    #[wasm_bindgen(constructor)]
    pub fn new(reference_json: &str) -> Result<NutrientCalculator, JsValue> {
        Self::from_json(reference_json).map_err(to_js_error)
    }

    /// Crop entry with its requirement and removal columns filled in
    #[wasm_bindgen(js_name = cropNutrients)]
    pub fn crop_nutrients(
        &self,
        entry_json: &str,
        soil_test_json: Option<String>,
        region_id: i32,
    ) -> Result<String, JsValue> {
        self.crop_nutrients_json(entry_json, soil_test_json, region_id)
            .map_err(to_js_error)
    }

    /// First-year and long-term nutrients of one manure application
    #[wasm_bindgen(js_name = manureNutrients)]
    pub fn manure_nutrients(
        &self,
        analysis_json: &str,
        application_json: &str,
        region_id: i32,
    ) -> Result<String, JsValue> {
        self.manure_nutrients_json(analysis_json, application_json, region_id)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = materialRemaining)]
    pub fn material_remaining(&self, year_json: &str) -> Result<String, JsValue> {
        self.material_remaining_json(year_json).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = materialRemainingSummary)]
    pub fn material_remaining_summary(&self, year_json: &str) -> Result<String, JsValue> {
        self.material_remaining_summary_json(year_json)
            .map_err(to_js_error)
    }

    /// Material remaining for sources of one type ("Solid" or "Liquid")
    #[wasm_bindgen(js_name = sourcesOfType)]
    pub fn sources_of_type(&self, year_json: &str, material_type: &str) -> Result<String, JsValue> {
        self.sources_of_type_json(year_json, material_type)
            .map_err(to_js_error)
    }

    /// Volumes, injection time and lb/acre nutrients of a liquid fertigation
    #[wasm_bindgen(js_name = liquidFertigation)]
    pub fn liquid_fertigation(&self, fertigation_json: &str, area: f64) -> Result<String, JsValue> {
        self.liquid_fertigation_json(fertigation_json, area)
            .map_err(to_js_error)
    }
}

/// Solid manure density (tonnes/m³) at a moisture percentage
#[wasm_bindgen(js_name = densityFactor)]
pub fn density_factor(moisture_percent: f64) -> f64 {
    shared::density_factor(moisture_percent)
}

/// Percentage input check used by the application rate form
#[wasm_bindgen(js_name = isValidPercentage)]
pub fn is_valid_percentage(percent: f64) -> bool {
    validate_percentage(percent).is_ok()
}
