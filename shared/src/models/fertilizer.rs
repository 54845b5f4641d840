//! Liquid fertilizer units and fertigation inputs

use serde::{Deserialize, Serialize};

/// Fertilizer application-rate unit reference record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FertilizerUnit {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    /// `"dry"` or `"liquid"`
    #[serde(rename = "dryliquid", default)]
    pub dry_liquid: String,
    #[serde(rename = "conversiontoimperialgallonsperacre", default)]
    pub conversion_to_imperial_gallons_per_acre: f64,
    #[serde(rename = "farmrequirednutrientsstdunitsconversion", default)]
    pub farm_required_nutrients_std_units_conversion: f64,
    #[serde(rename = "farmrequirednutrientsstdunitsareaconversion", default)]
    pub farm_required_nutrients_std_units_area_conversion: f64,
}

impl FertilizerUnit {
    pub fn is_liquid(&self) -> bool {
        self.dry_liquid.eq_ignore_ascii_case("liquid")
    }
}

/// Liquid fertilizer density unit reference record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DensityUnit {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    /// Factor from this unit to lb/imperial gallon
    #[serde(rename = "convfactor", default)]
    pub conversion_factor: f64,
}

/// Injection rate unit of a fertigation pump
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InjectionUnit {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub conversion_to_imp_gallons_per_minute: f64,
}

/// Injection units offered when the reference data carries none
pub fn standard_injection_units() -> Vec<InjectionUnit> {
    [
        (1, "US gallon/min", 0.836),
        (2, "L/min", 0.22),
        (3, "Imp. gallon/min", 1.0),
    ]
    .into_iter()
    .map(|(id, name, factor)| InjectionUnit {
        id,
        name: name.to_string(),
        conversion_to_imp_gallons_per_minute: factor,
    })
    .collect()
}

/// N, P2O5 and K2O content of a fertilizer in percent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct FertilizerNutrients {
    #[serde(rename = "N", alias = "nitrogen", default)]
    pub n: f64,
    #[serde(rename = "P2O5", alias = "phosphorous", default)]
    pub p2o5: f64,
    #[serde(rename = "K2O", alias = "potassium", default)]
    pub k2o: f64,
}

/// A liquid fertigation as entered for a field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LiquidFertigation {
    #[serde(default)]
    pub application_rate: f64,
    #[serde(default)]
    pub appl_unit_id: i32,
    /// Product density in the density unit
    #[serde(default)]
    pub density: f64,
    #[serde(default)]
    pub density_unit_id: i32,
    #[serde(default)]
    pub injection_rate: f64,
    #[serde(default)]
    pub injection_unit_id: i32,
    #[serde(default)]
    pub events_per_season: u32,
    #[serde(alias = "customNutrients", default)]
    pub nutrients: FertilizerNutrients,
}

/// Volumes, timing and applied nutrients of a liquid fertigation
///
/// Volumes are in the application unit's liquid measure; nutrients are
/// lb/acre rounded to one decimal place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FertigationResult {
    pub volume: f64,
    pub volume_for_season: f64,
    /// Minutes per application
    pub application_time: f64,
    pub req_n: f64,
    pub req_p2o5: f64,
    pub req_k2o: f64,
    pub season_n: f64,
    pub season_p2o5: f64,
    pub season_k2o: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fertilizer_unit_reads_table_columns() {
        let unit: FertilizerUnit = serde_json::from_str(
            r#"{"id": 3, "name": "L/ac", "dryliquid": "liquid",
                "conversiontoimperialgallonsperacre": 0.219969157,
                "farmrequirednutrientsstdunitsconversion": 1,
                "farmrequirednutrientsstdunitsareaconversion": 1}"#,
        )
        .unwrap();
        assert!(unit.is_liquid());
        assert_eq!(unit.conversion_to_imperial_gallons_per_acre, 0.219969157);
    }

    #[test]
    fn test_fertigation_accepts_custom_nutrients() {
        let fertigation: LiquidFertigation = serde_json::from_str(
            r#"{"applicationRate": 10, "applUnitId": 4, "density": 10, "densityUnitId": 1,
                "injectionRate": 5, "injectionUnitId": 3, "eventsPerSeason": 4,
                "customNutrients": {"N": 28, "P2O5": 0, "K2O": 0}}"#,
        )
        .unwrap();
        assert_eq!(fertigation.events_per_season, 4);
        assert_eq!(fertigation.nutrients.n, 28.0);
    }

    #[test]
    fn test_standard_injection_units() {
        let units = standard_injection_units();
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].conversion_to_imp_gallons_per_minute, 0.836);
    }
}
