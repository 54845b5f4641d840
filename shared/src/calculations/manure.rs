//! Plant-available nutrients from a manure application
//!
//! Fail-soft: a missing lookup is logged and yields zeroed [`NutrientInputs`]
//! so callers can keep rendering a conservative answer.

use tracing::{debug, warn};

use super::whole_number;
use crate::models::{
    ConversionFactors, ManureNutrientAnalysis, NitrogenMineralization, NutrientInputs, Unit,
    CUBIC_YARDS_PER_ACRE_UNIT_ID,
};
use crate::types::ManureType;

/// Nutrient analyses are per ten thousand parts
const PARTS_PER_TEN_THOUSAND: f64 = 10_000.0;

/// One application of an analysed material
#[derive(Debug, Clone, Copy)]
pub struct ManureApplication<'a> {
    pub analysis: &'a ManureNutrientAnalysis,
    pub application_rate: f64,
    pub unit: &'a Unit,
    /// Percent of ammonium-N retained after application
    pub ammonia_retention_pct: f64,
    /// Percent of organic N available in the first year; replaces the regional rate
    pub organic_n_available_pct: f64,
}

/// Reference rows resolved for an application; any may be missing
#[derive(Debug, Clone, Copy, Default)]
pub struct ManureLookups<'a> {
    pub factors: Option<&'a ConversionFactors>,
    /// Tons per cubic yard of the analysed manure
    pub cubic_yard_conversion: Option<f64>,
    pub mineralization: Option<&'a NitrogenMineralization>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct MineralizationRates {
    first_year: f64,
    long_term: f64,
}

/// First-year and long-term N, P2O5 and K2O, lb/acre
pub fn nutrient_inputs(
    application: &ManureApplication<'_>,
    lookups: &ManureLookups<'_>,
) -> NutrientInputs {
    let Some(factors) = lookups.factors else {
        warn!("conversion factors unavailable, manure nutrient inputs zeroed");
        return NutrientInputs::default();
    };

    let analysis = application.analysis;
    let unit = application.unit;
    let unit_conversion = if unit.conversion_lb_ton != 0.0 {
        unit.conversion_lb_ton
    } else {
        1.0
    };

    let mut rate = application.application_rate;
    if unit.id == CUBIC_YARDS_PER_ACRE_UNIT_ID && analysis.solid_liquid == Some(ManureType::Solid) {
        let Some(tons_per_cubic_yard) = lookups.cubic_yard_conversion else {
            warn!(
                manure_id = analysis.manure_id,
                "manure not found for cubic yard conversion, nutrient inputs zeroed"
            );
            return NutrientInputs::default();
        };
        rate *= tons_per_cubic_yard;
    }

    let lb_per_ton = factors.pound_per_ton;
    let oxide = |content: f64, chemical: f64, availability: f64| {
        whole_number(rate * content * lb_per_ton * chemical * availability * unit_conversion)
    };

    let mut rates = lookups
        .mineralization
        .map(|m| MineralizationRates {
            first_year: m.first_year_value,
            long_term: m.long_term_value,
        })
        .unwrap_or_default();
    rates.first_year = application.organic_n_available_pct / 100.0;

    let organic_n = analysis.n - analysis.nh4n / PARTS_PER_TEN_THOUSAND;
    let retained_ammonium =
        analysis.nh4n / PARTS_PER_TEN_THOUSAND * (application.ammonia_retention_pct / 100.0);

    let n_first_year =
        retained_ammonium + organic_n * rates.first_year + analysis.n / PARTS_PER_TEN_THOUSAND;
    let n_long_term = retained_ammonium + organic_n * rates.long_term;

    let inputs = NutrientInputs {
        n_first_year: whole_number(rate * n_first_year * lb_per_ton * unit_conversion),
        n_long_term: whole_number(rate * n_long_term * lb_per_ton * unit_conversion),
        p2o5_first_year: oxide(
            analysis.p,
            factors.phosphorous_p_to_p2o5,
            factors.phosphorous_availability_first_year,
        ),
        p2o5_long_term: oxide(
            analysis.p,
            factors.phosphorous_p_to_p2o5,
            factors.phosphorous_availability_long_term,
        ),
        k2o_first_year: oxide(
            analysis.k,
            factors.potassium_k_to_k2o,
            factors.potassium_availability_first_year,
        ),
        k2o_long_term: oxide(
            analysis.k,
            factors.potassium_k_to_k2o,
            factors.potassium_availability_long_term,
        ),
    };
    debug!(manure_id = analysis.manure_id, ?inputs, "manure nutrient inputs");
    inputs
}
