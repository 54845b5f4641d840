//! Manure reference records, nutrient analyses and application-rate conversions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{optional_manure_type, parse_numeric_text, ManureType};

/// Unit id of cubic yards/acre; solid manure in this unit is converted by the manure's bulk density
pub const CUBIC_YARDS_PER_ACRE_UNIT_ID: i32 = 6;

/// Manure reference record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manure {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "manureclass", default)]
    pub manure_class: String,
    #[serde(rename = "solidliquid", deserialize_with = "optional_manure_type", default)]
    pub solid_liquid: Option<ManureType>,
    #[serde(default)]
    pub moisture: Option<String>,
    #[serde(default)]
    pub nitrogen: f64,
    #[serde(default)]
    pub ammonia: f64,
    #[serde(default)]
    pub phosphorous: f64,
    #[serde(default)]
    pub potassium: f64,
    #[serde(rename = "nmineralizationid", alias = "nminerizationid", default)]
    pub n_mineralization_id: i32,
    /// Tons per cubic yard
    #[serde(rename = "cubicyardconversion", default)]
    pub cubic_yard_conversion: f64,
}

/// Application or nutrient-content unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Unit {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "solidliquid", deserialize_with = "optional_manure_type", default)]
    pub solid_liquid: Option<ManureType>,
    /// Multiplier into lb/ton terms; 0 means no conversion
    #[serde(rename = "conversionlbton", default)]
    pub conversion_lb_ton: f64,
}

/// Organic N mineralization rates for a manure class at a location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NitrogenMineralization {
    #[serde(default)]
    pub id: i32,
    #[serde(rename = "nmineralizationid")]
    pub n_mineralization_id: i32,
    #[serde(rename = "locationid")]
    pub location_id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "firstyearvalue", default)]
    pub first_year_value: f64,
    #[serde(rename = "longtermvalue", default)]
    pub long_term_value: f64,
}

/// Previous-year manure application frequency and its default N credits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviousYearManureApplication {
    #[serde(default)]
    pub id: i32,
    #[serde(rename = "fieldmanureapplicationhistory", default)]
    pub field_manure_application_history: i32,
    /// Array literal such as `{22,30,45}`
    #[serde(rename = "defaultnitrogencredit", default)]
    pub default_nitrogen_credit: String,
    #[serde(rename = "previousyearmanureaplicationfrequency")]
    pub frequency: i32,
}

/// Lab or book nutrient analysis of a manure source
///
/// `N`, `P` and `K` are percentages of the material; `NH4N` is ppm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ManureNutrientAnalysis {
    #[serde(rename = "manureId", default)]
    pub manure_id: i32,
    #[serde(rename = "manureName", default)]
    pub manure_name: String,
    #[serde(rename = "solidLiquid", deserialize_with = "optional_manure_type", default)]
    pub solid_liquid: Option<ManureType>,
    #[serde(rename = "N", default)]
    pub n: f64,
    #[serde(rename = "P", default)]
    pub p: f64,
    #[serde(rename = "K", default)]
    pub k: f64,
    #[serde(rename = "NH4N", default)]
    pub nh4n: f64,
    #[serde(rename = "nMineralizationId", default)]
    pub n_mineralization_id: Option<i32>,
    #[serde(rename = "Moisture", default)]
    pub moisture: Option<String>,
    #[serde(rename = "sourceUuid", default)]
    pub source_uuid: Option<Uuid>,
}

impl ManureNutrientAnalysis {
    /// Moisture percent when the analysis carries a numeric value
    pub fn moisture_percent(&self) -> Option<f64> {
        self.moisture.as_deref().and_then(parse_numeric_text)
    }
}

/// Plant-available nutrients from one manure application, lb/acre
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NutrientInputs {
    #[serde(rename = "N_FirstYear")]
    pub n_first_year: i32,
    #[serde(rename = "N_LongTerm")]
    pub n_long_term: i32,
    #[serde(rename = "P2O5_FirstYear")]
    pub p2o5_first_year: i32,
    #[serde(rename = "P2O5_LongTerm")]
    pub p2o5_long_term: i32,
    #[serde(rename = "K2O_FirstYear")]
    pub k2o_first_year: i32,
    #[serde(rename = "K2O_LongTerm")]
    pub k2o_long_term: i32,
}

/// Closed-form conversion of a solid application rate into tons/acre
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SolidConversion {
    TonsPerAcre,
    CubicYardsPerAcre,
    TonnesPerHectare,
    CubicMetersPerHectare,
}

const CUBIC_METERS_PER_CUBIC_YARD: f64 = 0.764554858;
const TONS_PER_TONNE: f64 = 1.102311311;
const TONS_PER_ACRE_PER_TONNE_PER_HECTARE: f64 = 0.446089561;

impl SolidConversion {
    /// Multiplier for a material with the given bulk density (tonnes/m³)
    pub fn factor(&self, density: f64) -> f64 {
        match self {
            SolidConversion::TonsPerAcre => 1.0,
            SolidConversion::CubicYardsPerAcre => {
                density * CUBIC_METERS_PER_CUBIC_YARD * TONS_PER_TONNE
            }
            SolidConversion::TonnesPerHectare => TONS_PER_ACRE_PER_TONNE_PER_HECTARE,
            SolidConversion::CubicMetersPerHectare => {
                density * TONS_PER_ACRE_PER_TONNE_PER_HECTARE
            }
        }
    }
}

/// Solid application-rate unit and its density-dependent conversion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolidApplicationConversion {
    #[serde(rename = "inputunit")]
    pub unit_id: i32,
    #[serde(rename = "inputunitname", default)]
    pub unit_name: String,
    pub conversion: SolidConversion,
}

/// Liquid application-rate unit and its flat factor into US gallons/acre
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiquidApplicationConversion {
    #[serde(rename = "inputunit")]
    pub unit_id: i32,
    #[serde(rename = "inputunitname", default)]
    pub unit_name: String,
    #[serde(rename = "usgallonsperacreoutput")]
    pub factor: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_conversion_factors() {
        assert_eq!(SolidConversion::TonsPerAcre.factor(0.5), 1.0);
        assert!((SolidConversion::TonnesPerHectare.factor(0.9) - 0.446089561).abs() < 1e-12);
        let cubic_yards = SolidConversion::CubicYardsPerAcre.factor(1.0);
        assert!((cubic_yards - 0.842777).abs() < 1e-5);
        assert_eq!(SolidConversion::CubicMetersPerHectare.factor(0.0), 0.0);
    }

    #[test]
    fn test_analysis_reads_upper_case_columns() {
        let json = r#"{"manureId": 5, "solidLiquid": "Solid", "N": 0.77, "P": 0.26, "K": 0.5, "NH4N": 1500, "Moisture": "75"}"#;
        let analysis: ManureNutrientAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.solid_liquid, Some(ManureType::Solid));
        assert_eq!(analysis.nh4n, 1500.0);
        assert_eq!(analysis.moisture_percent(), Some(75.0));
    }

    #[test]
    fn test_moisture_percent_ignores_text() {
        let analysis = ManureNutrientAnalysis {
            moisture: Some("N/A".to_string()),
            ..Default::default()
        };
        assert_eq!(analysis.moisture_percent(), None);
    }

    #[test]
    fn test_nutrient_inputs_serialize_with_report_names() {
        let json = serde_json::to_value(NutrientInputs::default()).unwrap();
        assert!(json.get("N_FirstYear").is_some());
        assert!(json.get("K2O_LongTerm").is_some());
    }
}
