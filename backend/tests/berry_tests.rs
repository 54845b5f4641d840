//! Tests for the raspberry and blueberry tables
//! Runs plantings through entry-level defaults and the full crop dispatcher

use proptest::prelude::*;
use shared::{
    blueberry_nutrients, calculate_crop_nutrients, raspberry_nutrients, BerryConditions,
    ConversionFactors, Crop, CropCalculationInput, CropCategory, CropNutrients, CropType,
    FieldCropEntry, RecommendationLookup, SoilNutrient, SoilTestReading, CROP_BLUEBERRIES_ID,
    CROP_RASPBERRIES_ID, PRUNINGS_REMOVED_FROM_FIELD,
};

fn young_blueberries() -> FieldCropEntry {
    FieldCropEntry {
        crop_id: CROP_BLUEBERRIES_ID,
        crop_type_id: 8,
        yield_amount: 5.0,
        plant_age_years: Some(2),
        number_of_plants_per_acre: Some(1499.0),
        where_will_prunings_go: Some("N/A".to_string()),
        ..Default::default()
    }
}

fn berry_crop(id: i32) -> Crop {
    Crop {
        id,
        name: "Berries".to_string(),
        crop_type_id: 8,
        removal_factor_n: 0.0,
        removal_factor_p2o5: 0.0,
        removal_factor_k2o: 0.0,
        harvest_bushels_per_ton: None,
        nitrogen_recommendation_id: 1,
        nitrogen_recommendation_lb_per_acre: None,
        nitrogen_recommendation_upper_limit_lb_per_acre: None,
        previous_crop_code: None,
    }
}

fn berry_type() -> CropType {
    CropType {
        id: 8,
        name: "Berries".to_string(),
        cover_crop: false,
        crude_protein_required: false,
        custom_crop: false,
        modify_nitrogen: false,
    }
}

fn dispatch(entry: &FieldCropEntry) -> CropNutrients {
    let factors = ConversionFactors::default();
    let crop = berry_crop(entry.crop_id);
    let crop_type = berry_type();
    // Berries never consult the recommendation tables
    let lookup = RecommendationLookup {
        nutrient: SoilNutrient::Phosphorous,
        ranges: &[],
        recommendations: &[],
        soil_test_region_code: 0,
        crop_group_region_code: None,
    };
    let input = CropCalculationInput {
        entry,
        crop: &crop,
        crop_type: &crop_type,
        soil_test: None,
        phosphorous: lookup,
        potassium: RecommendationLookup { nutrient: SoilNutrient::Potassium, ..lookup },
        factors: &factors,
    };
    calculate_crop_nutrients(&input).unwrap()
}

// =============================================================================
// Blueberries
// =============================================================================

mod blueberries {
    use super::*;

    #[test]
    fn young_planting_with_default_tests() {
        assert_eq!(
            dispatch(&young_blueberries()),
            CropNutrients { req_n: 11, req_p2o5: 0, req_k2o: 0, rem_n: 0, rem_p2o5: 3, rem_k2o: 18 }
        );
    }

    #[test]
    fn sawdust_and_leaf_test_with_prunings_left() {
        let entry = FieldCropEntry {
            will_sawdust_be_applied: true,
            will_plants_be_pruned: true,
            where_will_prunings_go: Some("Left between rows".to_string()),
            has_leaf_test: true,
            leaf_tissue_p: Some(1.0),
            leaf_tissue_k: Some(1.0),
            ..young_blueberries()
        };
        assert_eq!(
            dispatch(&entry),
            CropNutrients { req_n: 36, req_p2o5: 0, req_k2o: 0, rem_n: 0, rem_p2o5: 3, rem_k2o: 18 }
        );
    }

    #[test]
    fn low_leaf_tissue_raises_requirement() {
        let entry = FieldCropEntry {
            has_leaf_test: true,
            leaf_tissue_p: Some(0.05),
            leaf_tissue_k: Some(0.2),
            ..young_blueberries()
        };
        let nutrients = dispatch(&entry);
        assert_eq!(nutrients.req_p2o5, 50);
        assert_eq!(nutrients.req_k2o, 90);
    }

    #[test]
    fn leaf_values_ignored_without_leaf_test() {
        let entry = FieldCropEntry {
            has_leaf_test: false,
            leaf_tissue_p: Some(0.05),
            leaf_tissue_k: Some(0.2),
            ..young_blueberries()
        };
        assert_eq!(dispatch(&entry), dispatch(&young_blueberries()));
    }
}

// =============================================================================
// Raspberries
// =============================================================================

mod raspberries {
    use super::*;

    #[test]
    fn soil_test_readings_drive_the_tables() {
        let entry = FieldCropEntry {
            crop_id: CROP_RASPBERRIES_ID,
            yield_amount: 5.0,
            where_will_prunings_go: Some("N/A".to_string()),
            ..Default::default()
        };
        let soil_test = SoilTestReading {
            converted_kelowna_p: Some(44.0),
            converted_kelowna_k: Some(44.0),
            ..Default::default()
        };
        let conditions =
            BerryConditions::from_entry(CropCategory::Raspberry, &entry, Some(&soil_test));
        assert_eq!(
            raspberry_nutrients(&conditions),
            CropNutrients { req_n: 71, req_p2o5: 0, req_k2o: 50, rem_n: 0, rem_p2o5: 6, rem_k2o: 18 }
        );
    }

    #[test]
    fn pruning_removed_from_field_adds_removal() {
        let kept = FieldCropEntry {
            crop_id: CROP_RASPBERRIES_ID,
            plant_age_years: None,
            number_of_plants_per_acre: None,
            will_plants_be_pruned: true,
            where_will_prunings_go: Some("Left between rows".to_string()),
            ..young_blueberries()
        };
        let removed = FieldCropEntry {
            where_will_prunings_go: Some(PRUNINGS_REMOVED_FROM_FIELD.to_string()),
            ..kept.clone()
        };
        let kept = dispatch(&kept);
        let removed = dispatch(&removed);
        assert_eq!(removed.rem_p2o5 - kept.rem_p2o5, 3);
        assert_eq!(removed.rem_k2o - kept.rem_k2o, 9);
        assert_eq!(removed.req_n, kept.req_n);
    }

    #[test]
    fn yield_table_steps() {
        let conditions = |yield_amount| {
            let entry = FieldCropEntry { yield_amount, ..Default::default() };
            BerryConditions::from_entry(CropCategory::Raspberry, &entry, None)
        };
        assert_eq!(raspberry_nutrients(&conditions(2.9)).req_n, 54);
        assert_eq!(raspberry_nutrients(&conditions(3.0)).req_n, 71);
        assert_eq!(raspberry_nutrients(&conditions(7.0)).req_n, 80);
        assert_eq!(raspberry_nutrients(&conditions(7.1)).req_n, 89);
    }
}

// =============================================================================
// Property tests
// =============================================================================

mod property_tests {
    use super::*;

    fn conditions_strategy() -> impl Strategy<Value = BerryConditions> {
        (
            0f64..20.0,
            any::<bool>(),
            any::<bool>(),
            prop::option::of(1u32..12),
            0f64..4000.0,
            0f64..300.0,
            0f64..2.0,
        )
            .prop_map(|(yield_amount, sawdust, pruned, age, plants, soil, leaf)| {
                BerryConditions {
                    yield_amount,
                    sawdust_applied: sawdust,
                    plants_pruned: pruned,
                    pruning_destination: Some(PRUNINGS_REMOVED_FROM_FIELD.to_string()),
                    plant_age_years: age,
                    plants_per_acre: Some(plants),
                    soil_test_p: soil,
                    soil_test_k: soil,
                    leaf_tissue_p: leaf,
                    leaf_tissue_k: leaf,
                }
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Berries never report N removal
        #[test]
        fn prop_berries_remove_no_nitrogen(conditions in conditions_strategy()) {
            prop_assert_eq!(raspberry_nutrients(&conditions).rem_n, 0);
            prop_assert_eq!(blueberry_nutrients(&conditions).rem_n, 0);
        }

        /// Sawdust adds exactly its allowance to the N requirement
        #[test]
        fn prop_sawdust_adds_allowance(conditions in conditions_strategy()) {
            let without = BerryConditions { sawdust_applied: false, ..conditions.clone() };
            let with = BerryConditions { sawdust_applied: true, ..conditions };
            let diff = raspberry_nutrients(&with).req_n - raspberry_nutrients(&without).req_n;
            prop_assert_eq!(diff, 25);
        }

        /// All outputs are non-negative
        #[test]
        fn prop_outputs_non_negative(conditions in conditions_strategy()) {
            for n in [raspberry_nutrients(&conditions), blueberry_nutrients(&conditions)] {
                prop_assert!(n.req_n >= 0 && n.req_p2o5 >= 0 && n.req_k2o >= 0);
                prop_assert!(n.rem_p2o5 >= 0 && n.rem_k2o >= 0);
            }
        }
    }
}
