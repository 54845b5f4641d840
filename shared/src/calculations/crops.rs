//! Crop requirement and removal calculator
//!
//! [`calculate_crop_nutrients`] checks the entry against its resolved
//! reference records, then dispatches on [`CropCategory`]: berries go to the
//! species tables, everything else through the generic removal factors,
//! nitrogen recommendation strategies and soil test recommendation lookup.

use tracing::{debug, warn};

use super::berries::{blueberry_nutrients, raspberry_nutrients, BerryConditions};
use super::soil_test::{kelowna_reading, resolve_kelowna_range};
use super::{js_round, whole_number};
use crate::error::{CalculationError, CalculationResult};
use crate::models::{
    ConversionFactors, Crop, CropCategory, CropNutrients, CropType, FieldCropEntry, KelownaRange,
    NutrientRecommendation, SoilTestReading, DESIGNATED_COVER_CROP_ID,
};
use crate::types::{HarvestUnit, SoilNutrient};

/// Recommendation tables for one nutrient, already scoped to the crop and region
#[derive(Debug, Clone, Copy)]
pub struct RecommendationLookup<'a> {
    pub nutrient: SoilNutrient,
    pub ranges: &'a [KelownaRange],
    pub recommendations: &'a [NutrientRecommendation],
    pub soil_test_region_code: i32,
    /// `None` when the crop has no crop group in this region
    pub crop_group_region_code: Option<i32>,
}

/// Everything the crop calculator reads
#[derive(Debug, Clone, Copy)]
pub struct CropCalculationInput<'a> {
    pub entry: &'a FieldCropEntry,
    pub crop: &'a Crop,
    pub crop_type: &'a CropType,
    pub soil_test: Option<&'a SoilTestReading>,
    pub phosphorous: RecommendationLookup<'a>,
    pub potassium: RecommendationLookup<'a>,
    pub factors: &'a ConversionFactors,
}

/// Nitrogen recommendation strategy selected by `nitrogenrecommendationid`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NitrogenStrategy {
    FlatRate,
    FlatRateLegacy,
    EqualsRemoval,
    YieldScaledFlatRate,
    Unknown(i32),
}

impl From<i32> for NitrogenStrategy {
    fn from(id: i32) -> Self {
        match id {
            1 => NitrogenStrategy::FlatRate,
            2 => NitrogenStrategy::FlatRateLegacy,
            3 => NitrogenStrategy::EqualsRemoval,
            4 => NitrogenStrategy::YieldScaledFlatRate,
            other => NitrogenStrategy::Unknown(other),
        }
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Fail when the entry does not belong to the resolved crop and crop type
pub fn check_crop_identity(
    entry: &FieldCropEntry,
    crop: &Crop,
    crop_type: &CropType,
) -> CalculationResult<()> {
    if entry.crop_id != crop.id {
        return Err(CalculationError::CropMismatch {
            entry_crop_id: entry.crop_id,
            resolved_crop_id: crop.id,
        });
    }
    if entry.crop_type_id != crop_type.id {
        return Err(CalculationError::CropTypeMismatch {
            entry_crop_type_id: entry.crop_type_id,
            resolved_crop_type_id: crop_type.id,
        });
    }
    Ok(())
}

/// Requirement and removal for one crop entry, lb/acre
pub fn calculate_crop_nutrients(
    input: &CropCalculationInput<'_>,
) -> CalculationResult<CropNutrients> {
    check_crop_identity(input.entry, input.crop, input.crop_type)?;

    let category = CropCategory::of(input.crop.id);
    debug!(crop_id = input.crop.id, ?category, "calculating crop nutrients");

    match category {
        CropCategory::Raspberry => Ok(raspberry_nutrients(&BerryConditions::from_entry(
            category,
            input.entry,
            input.soil_test,
        ))),
        CropCategory::Blueberry => Ok(blueberry_nutrients(&BerryConditions::from_entry(
            category,
            input.entry,
            input.soil_test,
        ))),
        CropCategory::Generic => generic_crop_nutrients(input),
    }
}

fn generic_crop_nutrients(input: &CropCalculationInput<'_>) -> CalculationResult<CropNutrients> {
    let (entry, crop, crop_type, factors) =
        (input.entry, input.crop, input.crop_type, input.factors);
    Ok(CropNutrients {
        req_n: crop_requirement_n(entry, crop, crop_type, factors),
        req_p2o5: crop_requirement_from_soil_test(input.soil_test, &input.phosphorous, factors)?,
        req_k2o: crop_requirement_from_soil_test(input.soil_test, &input.potassium, factors)?,
        rem_n: crop_removal_n(entry, crop, crop_type, factors),
        rem_p2o5: crop_removal_p2o5(entry, crop, crop_type),
        rem_k2o: crop_removal_k2o(entry, crop, crop_type),
    })
}

// ============================================================================
// Removal
// ============================================================================

fn not_harvested_cover_crop(entry: &FieldCropEntry, crop_type: &CropType) -> bool {
    crop_type.cover_crop && entry.cover_crop_left_in_field()
}

fn removal(entry: &FieldCropEntry, crop: &Crop, crop_type: &CropType, factor: f64) -> f64 {
    if not_harvested_cover_crop(entry, crop_type) {
        return 0.0;
    }
    match crop.harvest_bushels_per_ton {
        Some(bushels_per_ton) if entry.yield_harvest_unit == HarvestUnit::BushelsPerAcre => {
            entry.yield_amount / bushels_per_ton * factor
        }
        _ => entry.yield_amount * factor,
    }
}

fn removal_n_unrounded(
    entry: &FieldCropEntry,
    crop: &Crop,
    crop_type: &CropType,
    factors: &ConversionFactors,
) -> f64 {
    let factor = match entry.crude_protein {
        Some(crude_protein) if crop_type.crude_protein_required && crude_protein != 0.0 => {
            factors.crude_protein_to_n(crude_protein)
        }
        _ => crop.removal_factor_n,
    };
    let mut value = removal(entry, crop, crop_type, factor);
    if crop.id == DESIGNATED_COVER_CROP_ID && entry.cover_crop_left_in_field() {
        value = 0.0;
    }
    value
}

/// N removed by the harvested crop
pub fn crop_removal_n(
    entry: &FieldCropEntry,
    crop: &Crop,
    crop_type: &CropType,
    factors: &ConversionFactors,
) -> i32 {
    whole_number(removal_n_unrounded(entry, crop, crop_type, factors))
}

/// P2O5 removed by the harvested crop
pub fn crop_removal_p2o5(entry: &FieldCropEntry, crop: &Crop, crop_type: &CropType) -> i32 {
    whole_number(removal(entry, crop, crop_type, crop.removal_factor_p2o5))
}

/// K2O removed by the harvested crop
pub fn crop_removal_k2o(entry: &FieldCropEntry, crop: &Crop, crop_type: &CropType) -> i32 {
    whole_number(removal(entry, crop, crop_type, crop.removal_factor_k2o))
}

// ============================================================================
// Requirement
// ============================================================================

/// N requirement net of the entry's N credit, never negative
pub fn crop_requirement_n(
    entry: &FieldCropEntry,
    crop: &Crop,
    crop_type: &CropType,
    factors: &ConversionFactors,
) -> i32 {
    let flat_rate = crop.nitrogen_recommendation_lb_per_acre;
    let strategy = NitrogenStrategy::from(crop.nitrogen_recommendation_id);

    let requirement = match strategy {
        NitrogenStrategy::FlatRate | NitrogenStrategy::FlatRateLegacy => flat_rate.unwrap_or(0.0),
        NitrogenStrategy::EqualsRemoval => {
            f64::from(crop_removal_n(entry, crop, crop_type, factors))
        }
        NitrogenStrategy::YieldScaledFlatRate => match flat_rate {
            Some(rate) if entry.yield_amount != 0.0 => {
                js_round(entry.yield_amount / entry.yield_amount * rate)
            }
            _ => 0.0,
        },
        NitrogenStrategy::Unknown(id) => {
            warn!(
                crop_id = crop.id,
                strategy_id = id,
                "unknown nitrogen recommendation strategy"
            );
            0.0
        }
    };

    whole_number((requirement - entry.n_credit).max(0.0))
}

/// Recommendation for the soil test reading, converted from kg/ha to lb/acre
///
/// Crops without a crop group in the region need nothing.
pub fn crop_requirement_from_soil_test(
    soil_test: Option<&SoilTestReading>,
    lookup: &RecommendationLookup<'_>,
    factors: &ConversionFactors,
) -> CalculationResult<i32> {
    let Some(crop_group_region_code) = lookup.crop_group_region_code else {
        return Ok(0);
    };

    let reading = js_round(kelowna_reading(soil_test, lookup.nutrient, factors));
    let range = resolve_kelowna_range(lookup.nutrient, reading, lookup.ranges)?;

    let recommendation =
        find_recommendation(lookup, range.id, crop_group_region_code)?.recommendation_kg_per_ha;
    Ok(whole_number(recommendation * factors.kg_per_ha_to_lb_per_acre))
}

fn find_recommendation<'a>(
    lookup: &RecommendationLookup<'a>,
    kelowna_range_id: i32,
    crop_group_region_code: i32,
) -> CalculationResult<&'a NutrientRecommendation> {
    let mut matches = lookup.recommendations.iter().filter(|rec| {
        rec.matches(kelowna_range_id, lookup.soil_test_region_code, crop_group_region_code)
    });

    let first = matches.next().ok_or(CalculationError::MissingRecommendation {
        nutrient: lookup.nutrient,
        kelowna_range_id,
        soil_test_region_code: lookup.soil_test_region_code,
        crop_group_region_code,
    })?;

    let extra = matches.count();
    if extra > 0 {
        return Err(CalculationError::AmbiguousRecommendation {
            nutrient: lookup.nutrient,
            kelowna_range_id,
            soil_test_region_code: lookup.soil_test_region_code,
            crop_group_region_code,
            count: extra + 1,
        });
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beans() -> Crop {
        Crop {
            id: 28,
            name: "Beans-green, wax".to_string(),
            crop_type_id: 5,
            removal_factor_n: 7.34,
            removal_factor_p2o5: 2.8,
            removal_factor_k2o: 6.78,
            harvest_bushels_per_ton: None,
            nitrogen_recommendation_id: 2,
            nitrogen_recommendation_lb_per_acre: Some(35.68716488),
            nitrogen_recommendation_upper_limit_lb_per_acre: None,
            previous_crop_code: None,
        }
    }

    fn vegetables() -> CropType {
        CropType {
            id: 5,
            name: "Vegetables".to_string(),
            cover_crop: false,
            crude_protein_required: false,
            custom_crop: false,
            modify_nitrogen: false,
        }
    }

    fn entry() -> FieldCropEntry {
        FieldCropEntry {
            crop_id: 28,
            crop_type_id: 5,
            yield_amount: 2.9,
            ..Default::default()
        }
    }

    #[test]
    fn test_generic_removal_and_requirement() {
        let factors = ConversionFactors::default();
        assert_eq!(crop_requirement_n(&entry(), &beans(), &vegetables(), &factors), 36);
        assert_eq!(crop_removal_n(&entry(), &beans(), &vegetables(), &factors), 21);
        assert_eq!(crop_removal_p2o5(&entry(), &beans(), &vegetables()), 8);
        assert_eq!(crop_removal_k2o(&entry(), &beans(), &vegetables()), 20);
    }

    #[test]
    fn test_n_credit_clamps_to_zero() {
        let factors = ConversionFactors::default();
        let credited = FieldCropEntry { n_credit: 40.0, ..entry() };
        assert_eq!(crop_requirement_n(&credited, &beans(), &vegetables(), &factors), 0);
    }

    #[test]
    fn test_identity_mismatch_is_fatal() {
        let wrong = FieldCropEntry { crop_id: 29, ..entry() };
        assert_eq!(
            check_crop_identity(&wrong, &beans(), &vegetables()),
            Err(CalculationError::CropMismatch { entry_crop_id: 29, resolved_crop_id: 28 })
        );
        let wrong_type = FieldCropEntry { crop_type_id: 6, ..entry() };
        assert!(matches!(
            check_crop_identity(&wrong_type, &beans(), &vegetables()),
            Err(CalculationError::CropTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_cover_crop_not_harvested_removes_nothing() {
        let factors = ConversionFactors::default();
        let cover = CropType { cover_crop: true, ..vegetables() };
        let left = FieldCropEntry { cover_crop_harvested: Some(false), ..entry() };
        assert_eq!(crop_removal_n(&left, &beans(), &cover, &factors), 0);
        assert_eq!(crop_removal_p2o5(&left, &beans(), &cover), 0);
        assert_eq!(crop_removal_k2o(&left, &beans(), &cover), 0);
    }

    #[test]
    fn test_designated_cover_crop_n_override() {
        let factors = ConversionFactors::default();
        let crop = Crop { id: DESIGNATED_COVER_CROP_ID, ..beans() };
        let left = FieldCropEntry {
            crop_id: DESIGNATED_COVER_CROP_ID,
            cover_crop_harvested: Some(false),
            ..entry()
        };
        assert_eq!(crop_removal_n(&left, &crop, &vegetables(), &factors), 0);
        assert_eq!(crop_removal_p2o5(&left, &crop, &vegetables()), 8);
    }

    #[test]
    fn test_crude_protein_replaces_n_factor() {
        let factors = ConversionFactors::default();
        let forage = CropType { crude_protein_required: true, ..vegetables() };
        let with_protein = FieldCropEntry {
            crude_protein: Some(2.5),
            yield_amount: 2.0,
            ..entry()
        };
        assert_eq!(crop_removal_n(&with_protein, &beans(), &forage, &factors), 16);
        let zero_protein = FieldCropEntry { crude_protein: Some(0.0), ..with_protein };
        assert_eq!(crop_removal_n(&zero_protein, &beans(), &forage, &factors), 15);
    }

    #[test]
    fn test_bushel_yield_is_converted() {
        let crop = Crop { harvest_bushels_per_ton: Some(40.0), ..beans() };
        let bushels = FieldCropEntry {
            yield_amount: 80.0,
            yield_harvest_unit: HarvestUnit::BushelsPerAcre,
            ..entry()
        };
        assert_eq!(crop_removal_p2o5(&bushels, &crop, &vegetables()), 6);
    }

    #[test]
    fn test_strategies() {
        let factors = ConversionFactors::default();
        let removal_strategy = Crop { nitrogen_recommendation_id: 3, ..beans() };
        assert_eq!(crop_requirement_n(&entry(), &removal_strategy, &vegetables(), &factors), 21);

        let scaled = Crop { nitrogen_recommendation_id: 4, ..beans() };
        assert_eq!(crop_requirement_n(&entry(), &scaled, &vegetables(), &factors), 36);
        let no_yield = FieldCropEntry { yield_amount: 0.0, ..entry() };
        assert_eq!(crop_requirement_n(&no_yield, &scaled, &vegetables(), &factors), 0);

        let unknown = Crop { nitrogen_recommendation_id: 9, ..beans() };
        assert_eq!(crop_requirement_n(&entry(), &unknown, &vegetables(), &factors), 0);

        let no_rate = Crop { nitrogen_recommendation_lb_per_acre: None, ..beans() };
        assert_eq!(crop_requirement_n(&entry(), &no_rate, &vegetables(), &factors), 0);
    }

    fn recommendation(range: i32, kg: f64) -> NutrientRecommendation {
        NutrientRecommendation {
            id: range,
            kelowna_range_id: range,
            soil_test_region_code: 2,
            crop_group_region_code: 4,
            recommendation_kg_per_ha: kg,
        }
    }

    fn ranges() -> Vec<KelownaRange> {
        vec![
            KelownaRange { id: 1, range: String::new(), range_low: 0, range_high: 20 },
            KelownaRange { id: 2, range: String::new(), range_low: 21, range_high: 40 },
            KelownaRange { id: 3, range: String::new(), range_low: 41, range_high: 9999 },
        ]
    }

    #[test]
    fn test_soil_test_requirement_lookup() {
        let factors = ConversionFactors::default();
        let ranges = ranges();
        let recommendations = vec![
            recommendation(1, 100.0),
            recommendation(2, 70.0),
            recommendation(3, 0.0),
        ];
        let lookup = RecommendationLookup {
            nutrient: SoilNutrient::Phosphorous,
            ranges: &ranges,
            recommendations: &recommendations,
            soil_test_region_code: 2,
            crop_group_region_code: Some(4),
        };
        let soil_test = SoilTestReading {
            converted_kelowna_p: Some(32.56),
            ..Default::default()
        };
        assert_eq!(crop_requirement_from_soil_test(Some(&soil_test), &lookup, &factors), Ok(62));
        assert_eq!(crop_requirement_from_soil_test(None, &lookup, &factors), Ok(0));

        let no_group = RecommendationLookup { crop_group_region_code: None, ..lookup };
        assert_eq!(crop_requirement_from_soil_test(Some(&soil_test), &no_group, &factors), Ok(0));
    }

    #[test]
    fn test_missing_and_ambiguous_recommendations() {
        let factors = ConversionFactors::default();
        let ranges = ranges();
        let duplicated = vec![recommendation(3, 0.0), recommendation(3, 10.0)];
        let lookup = RecommendationLookup {
            nutrient: SoilNutrient::Potassium,
            ranges: &ranges,
            recommendations: &duplicated,
            soil_test_region_code: 2,
            crop_group_region_code: Some(4),
        };
        assert!(matches!(
            crop_requirement_from_soil_test(None, &lookup, &factors),
            Err(CalculationError::AmbiguousRecommendation { count: 2, .. })
        ));

        let missing = RecommendationLookup { recommendations: &[], ..lookup };
        assert!(matches!(
            crop_requirement_from_soil_test(None, &missing, &factors),
            Err(CalculationError::MissingRecommendation { kelowna_range_id: 3, .. })
        ));
    }
}
