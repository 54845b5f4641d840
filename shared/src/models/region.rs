//! Regions and the flat conversion factor record

use serde::{Deserialize, Serialize};

/// Agricultural region; selects soil test region codes and the mineralization location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Region {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "soiltestphosphorousregioncd")]
    pub soil_test_phosphorous_region_code: i32,
    #[serde(rename = "soiltestpotassiumregioncd")]
    pub soil_test_potassium_region_code: i32,
    #[serde(rename = "locationid", default)]
    pub location_id: i32,
    #[serde(rename = "sortorder", default)]
    pub sort_order: i32,
}

/// Named multipliers shared by every calculator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConversionFactors {
    #[serde(rename = "nitrogenproteinconversion")]
    pub nitrogen_protein_conversion: f64,
    #[serde(rename = "unitconversion")]
    pub unit_conversion: f64,
    #[serde(rename = "defaultsoiltestkelownaphosphorous")]
    pub default_soil_test_kelowna_phosphorous: f64,
    #[serde(rename = "defaultsoiltestkelownapotassium")]
    pub default_soil_test_kelowna_potassium: f64,
    #[serde(rename = "kilogramperhectaretopoundperacreconversion")]
    pub kg_per_ha_to_lb_per_acre: f64,
    #[serde(rename = "potassiumavailabilityfirstyear")]
    pub potassium_availability_first_year: f64,
    #[serde(rename = "potassiumavailabilitylongterm")]
    pub potassium_availability_long_term: f64,
    #[serde(rename = "potassiumktok2oconversion")]
    pub potassium_k_to_k2o: f64,
    #[serde(rename = "phosphorousavailabilityfirstyear")]
    pub phosphorous_availability_first_year: f64,
    #[serde(rename = "phosphorousavailabilitylongterm")]
    pub phosphorous_availability_long_term: f64,
    #[serde(rename = "phosphorousptop2o5conversion")]
    pub phosphorous_p_to_p2o5: f64,
    #[serde(rename = "poundpertonconversion")]
    pub pound_per_ton: f64,
}

impl Default for ConversionFactors {
    fn default() -> Self {
        Self {
            nitrogen_protein_conversion: 0.625,
            unit_conversion: 0.5,
            default_soil_test_kelowna_phosphorous: 250.0,
            default_soil_test_kelowna_potassium: 500.0,
            kg_per_ha_to_lb_per_acre: 0.892176122,
            potassium_availability_first_year: 1.0,
            potassium_availability_long_term: 1.0,
            potassium_k_to_k2o: 1.2,
            phosphorous_availability_first_year: 0.7,
            phosphorous_availability_long_term: 1.0,
            phosphorous_p_to_p2o5: 2.29,
            pound_per_ton: 20.0,
        }
    }
}

impl ConversionFactors {
    /// Crude protein percent to lb N per unit yield
    pub fn crude_protein_to_n(&self, crude_protein: f64) -> f64 {
        crude_protein / (self.nitrogen_protein_conversion * self.unit_conversion)
    }
}
