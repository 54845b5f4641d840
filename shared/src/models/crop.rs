//! Crop reference records and per-field crop entries

use serde::{Deserialize, Serialize};

use crate::types::{id_from_string_or_number, optional_bool_from_string, HarvestUnit};

/// Crop id of raspberries; routed to the raspberry threshold tables
pub const CROP_RASPBERRIES_ID: i32 = 3;
/// Crop id of blueberries; routed to the blueberry threshold tables
pub const CROP_BLUEBERRIES_ID: i32 = 2;
/// Crop id whose N removal is forced to zero when not harvested
pub const DESIGNATED_COVER_CROP_ID: i32 = 9;
/// Crop type id of berries
pub const CROP_TYPE_BERRIES_ID: i32 = 8;

/// Crop reference record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Crop {
    pub id: i32,
    #[serde(rename = "cropname", default)]
    pub name: String,
    #[serde(rename = "croptypeid")]
    pub crop_type_id: i32,
    /// lb N removed per unit of yield
    #[serde(rename = "cropremovalfactornitrogen", default)]
    pub removal_factor_n: f64,
    #[serde(rename = "cropremovalfactorp2o5", default)]
    pub removal_factor_p2o5: f64,
    #[serde(rename = "cropremovalfactork2o", default)]
    pub removal_factor_k2o: f64,
    /// Only set for grain crops harvested in bushels
    #[serde(rename = "harvestbushelsperton", default)]
    pub harvest_bushels_per_ton: Option<f64>,
    #[serde(rename = "nitrogenrecommendationid", default)]
    pub nitrogen_recommendation_id: i32,
    #[serde(rename = "nitrogenrecommendationpoundperacre", default)]
    pub nitrogen_recommendation_lb_per_acre: Option<f64>,
    #[serde(rename = "nitrogenrecommendationupperlimitpoundperacre", default)]
    pub nitrogen_recommendation_upper_limit_lb_per_acre: Option<f64>,
    #[serde(rename = "previouscropcode", default)]
    pub previous_crop_code: Option<i32>,
}

/// Crop type reference record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropType {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "covercrop", default)]
    pub cover_crop: bool,
    /// Forage crops whose N removal comes from crude protein
    #[serde(rename = "crudeproteinrequired", default)]
    pub crude_protein_required: bool,
    #[serde(rename = "customcrop", default)]
    pub custom_crop: bool,
    #[serde(rename = "modifynitrogen", default)]
    pub modify_nitrogen: bool,
}

/// Previous crop reference record supplying the N credit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviousCropType {
    pub id: i32,
    #[serde(rename = "previouscropcode", default)]
    pub previous_crop_code: i32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "nitrogencreditmetric", default)]
    pub nitrogen_credit_metric: f64,
    #[serde(rename = "nitrogencreditimperial", default)]
    pub nitrogen_credit_imperial: f64,
    #[serde(rename = "cropid", default)]
    pub crop_id: Option<i32>,
    #[serde(rename = "croptypeid", default)]
    pub crop_type_id: Option<i32>,
}

/// Links a crop to the crop group region code used by the soil test recommendation tables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropSoilTestRegion {
    #[serde(default)]
    pub id: i32,
    #[serde(rename = "cropid")]
    pub crop_id: i32,
    #[serde(
        rename = "soiltestregioncode",
        alias = "soiltestphosphorousregioncode",
        alias = "soiltestpotassiumregioncode"
    )]
    pub soil_test_region_code: i32,
    #[serde(
        rename = "cropgroupregioncode",
        alias = "phosphorouscropgroupregioncode",
        alias = "potassiumcropgroupregioncode",
        default
    )]
    pub crop_group_region_code: Option<i32>,
}

/// Calculation path a crop takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropCategory {
    Generic,
    Raspberry,
    Blueberry,
}

impl CropCategory {
    pub fn of(crop_id: i32) -> Self {
        match crop_id {
            CROP_RASPBERRIES_ID => CropCategory::Raspberry,
            CROP_BLUEBERRIES_ID => CropCategory::Blueberry,
            _ => CropCategory::Generic,
        }
    }

    pub fn is_berry(&self) -> bool {
        !matches!(self, CropCategory::Generic)
    }
}

/// A crop grown on a field in the planning year
///
/// Inputs come from the user; the six nutrient columns are written only by
/// the crop calculator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FieldCropEntry {
    #[serde(deserialize_with = "id_from_string_or_number", default)]
    pub crop_id: i32,
    #[serde(default)]
    pub crop_type_id: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "yield", default)]
    pub yield_amount: f64,
    #[serde(default)]
    pub yield_harvest_unit: HarvestUnit,
    #[serde(alias = "crudeProtien", default)]
    pub crude_protein: Option<f64>,
    #[serde(default)]
    pub crude_protein_adjusted: bool,
    #[serde(deserialize_with = "optional_bool_from_string", default)]
    pub cover_crop_harvested: Option<bool>,
    #[serde(deserialize_with = "id_from_string_or_number", default)]
    pub prev_crop_id: i32,
    /// lb/acre credit subtracted from the N requirement
    #[serde(default)]
    pub n_credit: f64,

    // Berry inputs
    #[serde(default)]
    pub will_sawdust_be_applied: bool,
    #[serde(default)]
    pub will_plants_be_pruned: bool,
    #[serde(default)]
    pub where_will_prunings_go: Option<String>,
    #[serde(default)]
    pub plant_age_years: Option<u32>,
    #[serde(default)]
    pub number_of_plants_per_acre: Option<f64>,
    #[serde(default)]
    pub has_leaf_test: bool,
    #[serde(default)]
    pub leaf_tissue_p: Option<f64>,
    #[serde(default)]
    pub leaf_tissue_k: Option<f64>,

    // Calculated, lb/acre
    #[serde(default)]
    pub req_n: i32,
    #[serde(default)]
    pub req_p2o5: i32,
    #[serde(default)]
    pub req_k2o: i32,
    #[serde(default)]
    pub rem_n: i32,
    #[serde(default)]
    pub rem_p2o5: i32,
    #[serde(default)]
    pub rem_k2o: i32,
}

impl FieldCropEntry {
    /// Cover crop left in the field; only meaningful for cover crop types
    pub fn cover_crop_left_in_field(&self) -> bool {
        self.cover_crop_harvested == Some(false)
    }

    /// Copy calculated values into the entry's output columns
    pub fn apply_nutrients(&mut self, nutrients: &CropNutrients) {
        self.req_n = nutrients.req_n;
        self.req_p2o5 = nutrients.req_p2o5;
        self.req_k2o = nutrients.req_k2o;
        self.rem_n = nutrients.rem_n;
        self.rem_p2o5 = nutrients.rem_p2o5;
        self.rem_k2o = nutrients.rem_k2o;
    }
}

/// Requirement and removal for one crop, all lb/acre
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CropNutrients {
    pub req_n: i32,
    pub req_p2o5: i32,
    pub req_k2o: i32,
    pub rem_n: i32,
    pub rem_p2o5: i32,
    pub rem_k2o: i32,
}
