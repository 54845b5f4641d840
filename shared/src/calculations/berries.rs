//! Raspberry and blueberry requirement/removal tables
//!
//! Both species share one shape: N requirement from a yield table plus a flat
//! sawdust allowance, P2O5/K2O requirement from a two-way table of leaf tissue
//! and soil test levels, and P2O5/K2O removal linear in yield with a bonus when
//! prunings leave the field. N removal is always zero.
//!
//! Boundaries are not symmetric between tables; each comparison below is
//! deliberate.

use tracing::debug;

use super::whole_number;
use crate::models::{CropCategory, CropNutrients, FieldCropEntry, SoilTestReading};

/// Pruning destination that adds the pruning removal bonus
pub const PRUNINGS_REMOVED_FROM_FIELD: &str = "Removed from field";

/// lb N/acre added when sawdust is applied
pub const SAWDUST_N_ALLOWANCE: f64 = 25.0;

pub const DEFAULT_BLUEBERRY_SOIL_TEST_P: f64 = 100.0;
pub const DEFAULT_BLUEBERRY_LEAF_TEST_P: f64 = 0.11;
pub const DEFAULT_BLUEBERRY_LEAF_TEST_K: f64 = 0.41;
pub const DEFAULT_RASPBERRY_SOIL_TEST_P: f64 = 31.0;
pub const DEFAULT_RASPBERRY_SOIL_TEST_K: f64 = 281.0;
pub const DEFAULT_RASPBERRY_LEAF_TEST_P: f64 = 0.2;
pub const DEFAULT_RASPBERRY_LEAF_TEST_K: f64 = 1.26;

const RASPBERRY_P2O5_PER_TON: f64 = 1.2;
const RASPBERRY_K2O_PER_TON: f64 = 3.6;
const RASPBERRY_PRUNING_P2O5: f64 = 3.0;
const RASPBERRY_PRUNING_K2O: f64 = 9.0;

const BLUEBERRY_P2O5_PER_TON: f64 = 0.6;
const BLUEBERRY_K2O_PER_TON: f64 = 3.6;
const BLUEBERRY_PRUNING_P2O5: f64 = 1.0;
const BLUEBERRY_PRUNING_K2O: f64 = 4.0;

/// Age from which a blueberry planting uses the yield table
pub const BLUEBERRY_MATURE_AGE_YEARS: u32 = 8;
/// Grams N per plant for plant ages 1 through 7
const BLUEBERRY_GRAMS_N_PER_PLANT: [f64; 7] = [2.3, 3.4, 4.5, 6.8, 9.1, 11.3, 13.6];
const GRAMS_PER_POUND: f64 = 453.592;

/// Growing conditions of a berry planting
#[derive(Debug, Clone, PartialEq)]
pub struct BerryConditions {
    pub yield_amount: f64,
    pub sawdust_applied: bool,
    pub plants_pruned: bool,
    pub pruning_destination: Option<String>,
    pub plant_age_years: Option<u32>,
    pub plants_per_acre: Option<f64>,
    /// Kelowna-scale soil test values
    pub soil_test_p: f64,
    pub soil_test_k: f64,
    pub leaf_tissue_p: f64,
    pub leaf_tissue_k: f64,
}

impl BerryConditions {
    /// Collect conditions from a crop entry, filling species defaults for missing tests
    pub fn from_entry(
        category: CropCategory,
        entry: &FieldCropEntry,
        soil_test: Option<&SoilTestReading>,
    ) -> Self {
        let (default_soil_p, default_soil_k, default_leaf_p, default_leaf_k) = match category {
            CropCategory::Blueberry => (
                DEFAULT_BLUEBERRY_SOIL_TEST_P,
                0.0,
                DEFAULT_BLUEBERRY_LEAF_TEST_P,
                DEFAULT_BLUEBERRY_LEAF_TEST_K,
            ),
            CropCategory::Raspberry | CropCategory::Generic => (
                DEFAULT_RASPBERRY_SOIL_TEST_P,
                DEFAULT_RASPBERRY_SOIL_TEST_K,
                DEFAULT_RASPBERRY_LEAF_TEST_P,
                DEFAULT_RASPBERRY_LEAF_TEST_K,
            ),
        };

        let soil = |value: Option<f64>, default: f64| match value {
            Some(v) if v != 0.0 && v.is_finite() => v,
            _ => default,
        };
        let leaf = |value: Option<f64>, default: f64| {
            if entry.has_leaf_test {
                value.filter(|v| v.is_finite()).unwrap_or(default)
            } else {
                default
            }
        };

        Self {
            yield_amount: entry.yield_amount,
            sawdust_applied: entry.will_sawdust_be_applied,
            plants_pruned: entry.will_plants_be_pruned,
            pruning_destination: entry.where_will_prunings_go.clone(),
            plant_age_years: entry.plant_age_years,
            plants_per_acre: entry.number_of_plants_per_acre,
            soil_test_p: soil(soil_test.and_then(|t| t.converted_kelowna_p), default_soil_p),
            soil_test_k: soil(soil_test.and_then(|t| t.converted_kelowna_k), default_soil_k),
            leaf_tissue_p: leaf(entry.leaf_tissue_p, default_leaf_p),
            leaf_tissue_k: leaf(entry.leaf_tissue_k, default_leaf_k),
        }
    }

    fn prunings_removed(&self) -> bool {
        self.plants_pruned
            && self
                .pruning_destination
                .as_deref()
                .map(|d| d.trim().eq_ignore_ascii_case(PRUNINGS_REMOVED_FROM_FIELD))
                .unwrap_or(false)
    }

    fn sawdust_allowance(&self) -> f64 {
        if self.sawdust_applied {
            SAWDUST_N_ALLOWANCE
        } else {
            0.0
        }
    }

    fn removal(&self, p2o5_per_ton: f64, k2o_per_ton: f64, bonus: (f64, f64)) -> (f64, f64) {
        let (bonus_p2o5, bonus_k2o) = if self.prunings_removed() { bonus } else { (0.0, 0.0) };
        (
            self.yield_amount * p2o5_per_ton + bonus_p2o5,
            self.yield_amount * k2o_per_ton + bonus_k2o,
        )
    }
}

// ============================================================================
// Raspberries
// ============================================================================

fn raspberry_n(yield_amount: f64) -> f64 {
    if yield_amount < 3.0 {
        54.0
    } else if yield_amount <= 5.0 {
        71.0
    } else if yield_amount <= 7.0 {
        80.0
    } else {
        89.0
    }
}

fn raspberry_p2o5(leaf_p: f64, soil_p: f64) -> f64 {
    if leaf_p < 0.19 {
        if soil_p <= 20.0 {
            90.0
        } else if soil_p <= 60.0 {
            45.0
        } else {
            0.0
        }
    } else if leaf_p < 0.40 {
        if soil_p <= 20.0 {
            45.0
        } else {
            0.0
        }
    } else {
        0.0
    }
}

fn raspberry_k2o(leaf_k: f64, soil_k: f64) -> f64 {
    if leaf_k < 1.1 {
        if soil_k <= 100.0 {
            80.0
        } else if soil_k <= 200.0 {
            50.0
        } else {
            20.0
        }
    } else if leaf_k <= 1.5 {
        if soil_k < 100.0 {
            50.0
        } else if soil_k <= 200.0 {
            25.0
        } else {
            0.0
        }
    } else {
        0.0
    }
}

/// Requirement and removal for a raspberry planting
pub fn raspberry_nutrients(conditions: &BerryConditions) -> CropNutrients {
    let req_n = raspberry_n(conditions.yield_amount) + conditions.sawdust_allowance();
    let (rem_p2o5, rem_k2o) = conditions.removal(
        RASPBERRY_P2O5_PER_TON,
        RASPBERRY_K2O_PER_TON,
        (RASPBERRY_PRUNING_P2O5, RASPBERRY_PRUNING_K2O),
    );

    CropNutrients {
        req_n: whole_number(req_n),
        req_p2o5: whole_number(raspberry_p2o5(conditions.leaf_tissue_p, conditions.soil_test_p)),
        req_k2o: whole_number(raspberry_k2o(conditions.leaf_tissue_k, conditions.soil_test_k)),
        rem_n: 0,
        rem_p2o5: whole_number(rem_p2o5),
        rem_k2o: whole_number(rem_k2o),
    }
}

// ============================================================================
// Blueberries
// ============================================================================

fn blueberry_n(conditions: &BerryConditions) -> f64 {
    match conditions.plant_age_years {
        Some(age) if age < BLUEBERRY_MATURE_AGE_YEARS => {
            let index = age.clamp(1, BLUEBERRY_GRAMS_N_PER_PLANT.len() as u32) as usize - 1;
            let plants = conditions.plants_per_acre.unwrap_or(0.0);
            debug!(age, plants, "young blueberry planting, N from plant density");
            plants * BLUEBERRY_GRAMS_N_PER_PLANT[index] / GRAMS_PER_POUND
        }
        _ => {
            if conditions.yield_amount < 4.0 {
                90.0
            } else if conditions.yield_amount <= 7.0 {
                110.0
            } else {
                130.0
            }
        }
    }
}

fn blueberry_p2o5(leaf_p: f64, soil_p: f64) -> f64 {
    if leaf_p < 0.08 {
        if soil_p <= 100.0 {
            50.0
        } else {
            25.0
        }
    } else if leaf_p <= 0.10 {
        if soil_p < 100.0 {
            25.0
        } else {
            0.0
        }
    } else {
        0.0
    }
}

fn blueberry_k2o(leaf_k: f64) -> f64 {
    if leaf_k < 0.35 {
        90.0
    } else if leaf_k <= 0.40 {
        45.0
    } else {
        0.0
    }
}

/// Requirement and removal for a blueberry planting
pub fn blueberry_nutrients(conditions: &BerryConditions) -> CropNutrients {
    let req_n = blueberry_n(conditions) + conditions.sawdust_allowance();
    let (rem_p2o5, rem_k2o) = conditions.removal(
        BLUEBERRY_P2O5_PER_TON,
        BLUEBERRY_K2O_PER_TON,
        (BLUEBERRY_PRUNING_P2O5, BLUEBERRY_PRUNING_K2O),
    );

    CropNutrients {
        req_n: whole_number(req_n),
        req_p2o5: whole_number(blueberry_p2o5(conditions.leaf_tissue_p, conditions.soil_test_p)),
        req_k2o: whole_number(blueberry_k2o(conditions.leaf_tissue_k)),
        rem_n: 0,
        rem_p2o5: whole_number(rem_p2o5),
        rem_k2o: whole_number(rem_k2o),
    }
}
