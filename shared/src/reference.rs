//! Immutable snapshot of the reference tables
//!
//! The snapshot is parsed once and never mutated afterwards. It resolves the
//! reference rows each calculator needs by id and hands borrowed slices to the
//! pure functions in [`crate::calculations`].

use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::calculations::{
    calculate_crop_nutrients, calculate_material_remaining, check_crop_identity,
    convert_to_kelowna, liquid_fertigation, nutrient_inputs, previous_crop_n_credit,
    previous_year_manure_n_credit, rate_soil_test, ConversionTables, CropCalculationInput,
    FertigationUnits, ManureApplication, ManureLookups, MaterialRemainingData,
    RecommendationLookup,
};
use crate::error::{CalculationError, CalculationResult};
use crate::models::{
    standard_injection_units, AppliedManure, ConversionFactors, Crop, CropCategory, CropNutrients,
    CropSoilTestRegion, CropType, DensityUnit, FertigationResult, FertilizerUnit, FieldCropEntry,
    InjectionUnit, KelownaConversion, KelownaRange, LiquidApplicationConversion,
    LiquidFertigation, Manure, ManureNutrientAnalysis, NitrogenMineralization, NutrientInputs,
    NutrientRecommendation, PlanningYear, PreviousCropType, PreviousYearManureApplication, Region,
    SoilTestMethod, SoilTestRating, SoilTestReading, SolidApplicationConversion, Unit,
};
use crate::types::SoilNutrient;
use crate::validation::validate_kelowna_ranges;

/// Every reference table the calculators read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceTables {
    pub crops: Vec<Crop>,
    pub crop_types: Vec<CropType>,
    pub regions: Vec<Region>,
    pub phosphorous_kelowna_ranges: Vec<KelownaRange>,
    pub potassium_kelowna_ranges: Vec<KelownaRange>,
    pub phosphorous_recommendations: Vec<NutrientRecommendation>,
    pub potassium_recommendations: Vec<NutrientRecommendation>,
    pub crop_soil_test_phosphorous_regions: Vec<CropSoilTestRegion>,
    pub crop_soil_test_potassium_regions: Vec<CropSoilTestRegion>,
    #[serde(deserialize_with = "single_or_first_row")]
    pub conversion_factors: Option<ConversionFactors>,
    pub manures: Vec<Manure>,
    pub units: Vec<Unit>,
    pub nitrogen_mineralizations: Vec<NitrogenMineralization>,
    pub solid_application_conversions: Vec<SolidApplicationConversion>,
    pub liquid_application_conversions: Vec<LiquidApplicationConversion>,
    pub soil_test_methods: Vec<SoilTestMethod>,
    pub previous_crop_types: Vec<PreviousCropType>,
    pub previous_year_manure_applications: Vec<PreviousYearManureApplication>,
    pub soil_test_phosphorous_ratings: Vec<SoilTestRating>,
    pub soil_test_potassium_ratings: Vec<SoilTestRating>,
    pub fertilizer_units: Vec<FertilizerUnit>,
    pub density_units: Vec<DensityUnit>,
    #[serde(default = "standard_injection_units")]
    pub injection_units: Vec<InjectionUnit>,
}

/// The conversion factor table is a single row, served either bare or as a one-row array
fn single_or_first_row<'de, D>(deserializer: D) -> Result<Option<ConversionFactors>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Rows {
        Many(Vec<ConversionFactors>),
        One(ConversionFactors),
    }

    Ok(match Option::<Rows>::deserialize(deserializer)? {
        Some(Rows::Many(rows)) => rows.into_iter().next(),
        Some(Rows::One(row)) => Some(row),
        None => None,
    })
}

fn find_by_id<'a, T>(
    rows: &'a [T],
    table: &'static str,
    id: i32,
    row_id: impl Fn(&T) -> i32,
) -> CalculationResult<&'a T> {
    rows.iter()
        .find(|row| row_id(row) == id)
        .ok_or(CalculationError::NotFound { table, id })
}

impl ReferenceTables {
    // ========================================================================
    // Loading
    // ========================================================================

    pub fn from_json_str(json: &str) -> CalculationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CalculationError::InvalidReferenceData(e.to_string()))
    }

    pub fn from_reader<R: Read>(reader: R) -> CalculationResult<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| CalculationError::InvalidReferenceData(e.to_string()))
    }

    /// Problems in the Kelowna range tables, one message per table
    pub fn range_order_issues(&self) -> Vec<String> {
        [
            (SoilNutrient::Phosphorous, &self.phosphorous_kelowna_ranges),
            (SoilNutrient::Potassium, &self.potassium_kelowna_ranges),
        ]
        .into_iter()
        .filter_map(|(nutrient, ranges)| {
            validate_kelowna_ranges(ranges)
                .err()
                .map(|problem| format!("{} ranges: {}", nutrient, problem))
        })
        .collect()
    }

    /// Check the snapshot before serving from it
    ///
    /// Unsorted Kelowna tables are logged, or rejected when `strict_range_order` is set.
    pub fn validate(&self, strict_range_order: bool) -> CalculationResult<()> {
        if self.conversion_factors.is_none() {
            return Err(CalculationError::MissingConversionFactors);
        }
        let issues = self.range_order_issues();
        if issues.is_empty() {
            return Ok(());
        }
        if strict_range_order {
            return Err(CalculationError::InvalidReferenceData(issues.join("; ")));
        }
        for issue in &issues {
            warn!(issue = %issue, "Kelowna range table is not in ascending order");
        }
        Ok(())
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn crop(&self, id: i32) -> CalculationResult<&Crop> {
        find_by_id(&self.crops, "crop", id, |c| c.id)
    }

    pub fn crop_type(&self, id: i32) -> CalculationResult<&CropType> {
        find_by_id(&self.crop_types, "crop type", id, |t| t.id)
    }

    pub fn region(&self, id: i32) -> CalculationResult<&Region> {
        find_by_id(&self.regions, "region", id, |r| r.id)
    }

    pub fn manure(&self, id: i32) -> CalculationResult<&Manure> {
        find_by_id(&self.manures, "manure", id, |m| m.id)
    }

    pub fn unit(&self, id: i32) -> CalculationResult<&Unit> {
        find_by_id(&self.units, "unit", id, |u| u.id)
    }

    pub fn fertilizer_unit(&self, id: i32) -> CalculationResult<&FertilizerUnit> {
        find_by_id(&self.fertilizer_units, "fertilizer unit", id, |u| u.id)
    }

    pub fn density_unit(&self, id: i32) -> CalculationResult<&DensityUnit> {
        find_by_id(&self.density_units, "density unit", id, |u| u.id)
    }

    pub fn injection_unit(&self, id: i32) -> CalculationResult<&InjectionUnit> {
        find_by_id(&self.injection_units, "injection unit", id, |u| u.id)
    }

    pub fn soil_test_method(&self, id: i32) -> CalculationResult<&SoilTestMethod> {
        find_by_id(&self.soil_test_methods, "soil test method", id, |m| m.id)
    }

    pub fn conversion_factors(&self) -> CalculationResult<&ConversionFactors> {
        self.conversion_factors
            .as_ref()
            .ok_or(CalculationError::MissingConversionFactors)
    }

    /// Mineralization rates for a manure class at the region's location
    pub fn nitrogen_mineralization(
        &self,
        n_mineralization_id: i32,
        location_id: i32,
    ) -> Option<&NitrogenMineralization> {
        self.nitrogen_mineralizations
            .iter()
            .find(|m| m.n_mineralization_id == n_mineralization_id && m.location_id == location_id)
    }

    pub fn conversion_tables(&self) -> ConversionTables<'_> {
        ConversionTables {
            solid: &self.solid_application_conversions,
            liquid: &self.liquid_application_conversions,
            units: &self.units,
        }
    }

    fn kelowna_tables(
        &self,
        nutrient: SoilNutrient,
    ) -> (&[KelownaRange], &[NutrientRecommendation], &[CropSoilTestRegion]) {
        match nutrient {
            SoilNutrient::Phosphorous => (
                &self.phosphorous_kelowna_ranges,
                &self.phosphorous_recommendations,
                &self.crop_soil_test_phosphorous_regions,
            ),
            SoilNutrient::Potassium => (
                &self.potassium_kelowna_ranges,
                &self.potassium_recommendations,
                &self.crop_soil_test_potassium_regions,
            ),
        }
    }

    /// Recommendation tables for a crop in a region
    ///
    /// Fails when the crop has no soil test region row for the region's code.
    pub fn recommendation_lookup(
        &self,
        nutrient: SoilNutrient,
        crop_id: i32,
        region: &Region,
    ) -> CalculationResult<RecommendationLookup<'_>> {
        let soil_test_region_code = match nutrient {
            SoilNutrient::Phosphorous => region.soil_test_phosphorous_region_code,
            SoilNutrient::Potassium => region.soil_test_potassium_region_code,
        };
        let (ranges, recommendations, crop_regions) = self.kelowna_tables(nutrient);

        let crop_region = crop_regions
            .iter()
            .find(|row| row.crop_id == crop_id && row.soil_test_region_code == soil_test_region_code)
            .ok_or(CalculationError::MissingCropSoilTestRegion {
                nutrient,
                crop_id,
                soil_test_region_code,
            })?;

        Ok(RecommendationLookup {
            nutrient,
            ranges,
            recommendations,
            soil_test_region_code,
            crop_group_region_code: crop_region.crop_group_region_code,
        })
    }

    fn unscoped_lookup(&self, nutrient: SoilNutrient) -> RecommendationLookup<'_> {
        let (ranges, recommendations, _) = self.kelowna_tables(nutrient);
        RecommendationLookup {
            nutrient,
            ranges,
            recommendations,
            soil_test_region_code: 0,
            crop_group_region_code: None,
        }
    }

    // ========================================================================
    // Calculators
    // ========================================================================

    /// Requirement and removal for a field crop in a region
    pub fn crop_nutrients(
        &self,
        entry: &FieldCropEntry,
        soil_test: Option<&SoilTestReading>,
        region_id: i32,
    ) -> CalculationResult<CropNutrients> {
        let crop = self.crop(entry.crop_id)?;
        let crop_type = self.crop_type(crop.crop_type_id)?;
        let factors = self.conversion_factors()?;
        check_crop_identity(entry, crop, crop_type)?;

        // berry tables never read the recommendation tables
        let (phosphorous, potassium) = if CropCategory::of(crop.id).is_berry() {
            (
                self.unscoped_lookup(SoilNutrient::Phosphorous),
                self.unscoped_lookup(SoilNutrient::Potassium),
            )
        } else {
            let region = self.region(region_id)?;
            (
                self.recommendation_lookup(SoilNutrient::Phosphorous, crop.id, region)?,
                self.recommendation_lookup(SoilNutrient::Potassium, crop.id, region)?,
            )
        };

        calculate_crop_nutrients(&CropCalculationInput {
            entry,
            crop,
            crop_type,
            soil_test,
            phosphorous,
            potassium,
            factors,
        })
    }

    /// Plant-available nutrients of one application in a region; zeroed when lookups fail
    pub fn manure_nutrient_inputs(
        &self,
        analysis: &ManureNutrientAnalysis,
        application: &AppliedManure,
        region_id: i32,
    ) -> NutrientInputs {
        let unit = match self.unit(application.appl_unit_id) {
            Ok(unit) => unit,
            Err(e) => {
                warn!(error = %e, "application unit unavailable, manure nutrient inputs zeroed");
                return NutrientInputs::default();
            }
        };

        let manure = self.manure(analysis.manure_id).ok();
        let n_mineralization_id = analysis
            .n_mineralization_id
            .or_else(|| manure.map(|m| m.n_mineralization_id));
        let mineralization = match (self.region(region_id), n_mineralization_id) {
            (Ok(region), Some(id)) => self.nitrogen_mineralization(id, region.location_id),
            (Err(e), _) => {
                warn!(error = %e, "region unavailable, no organic N mineralization applied");
                None
            }
            (Ok(_), None) => None,
        };

        debug!(
            manure_id = analysis.manure_id,
            unit_id = unit.id,
            mineralization = mineralization.is_some(),
            "resolved manure lookups"
        );

        nutrient_inputs(
            &ManureApplication {
                analysis,
                application_rate: application.application_rate,
                unit,
                ammonia_retention_pct: application.nh4_retention,
                organic_n_available_pct: application.n_available,
            },
            &ManureLookups {
                factors: self.conversion_factors.as_ref(),
                cubic_yard_conversion: manure.map(|m| m.cubic_yard_conversion),
                mineralization,
            },
        )
    }

    /// Allocation status of every manure source in the year
    pub fn material_remaining(&self, year: &PlanningYear) -> MaterialRemainingData {
        calculate_material_remaining(year, &self.conversion_tables())
    }

    /// Volumes, timing and nutrients of a liquid fertigation on a field of `area` acres
    pub fn liquid_fertigation(
        &self,
        fertigation: &LiquidFertigation,
        area: f64,
    ) -> CalculationResult<FertigationResult> {
        let units = FertigationUnits {
            application: self.fertilizer_unit(fertigation.appl_unit_id)?,
            density: self.density_unit(fertigation.density_unit_id)?,
            injection: self.injection_unit(fertigation.injection_unit_id)?,
        };
        Ok(liquid_fertigation(fertigation, area, &units))
    }

    /// Convert a raw lab reading with one of the snapshot's soil test methods
    pub fn convert_soil_test(
        &self,
        method_id: i32,
        reading: &SoilTestReading,
    ) -> CalculationResult<KelownaConversion> {
        convert_to_kelowna(self.soil_test_method(method_id)?, reading)
    }

    pub fn soil_test_rating(&self, nutrient: SoilNutrient, value: f64) -> Option<&SoilTestRating> {
        match nutrient {
            SoilNutrient::Phosphorous => rate_soil_test(value, &self.soil_test_phosphorous_ratings),
            SoilNutrient::Potassium => rate_soil_test(value, &self.soil_test_potassium_ratings),
        }
    }

    pub fn previous_crop_n_credit(&self, prev_crop_id: i32) -> f64 {
        previous_crop_n_credit(prev_crop_id, &self.previous_crop_types)
    }

    pub fn previous_year_manure_n_credit(&self, frequency: Option<&str>) -> f64 {
        previous_year_manure_n_credit(frequency, &self.previous_year_manure_applications)
    }
}
