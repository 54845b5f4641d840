//! Liquid fertigation volumes, injection time and applied nutrients

use tracing::{debug, warn};

use super::js_round;
use crate::models::{
    DensityUnit, FertigationResult, FertilizerUnit, InjectionUnit, LiquidFertigation,
};

/// Liquid measure per imperial gallon for the unit's own volume, 0 for unknown units
///
/// Units 3 and 6 are litre based, 5 is US gallons and 4 imperial gallons.
pub fn imperial_gallon_conversion(unit: &FertilizerUnit) -> f64 {
    match unit.id {
        3 | 6 => 4.546,
        5 => 1.201,
        4 => 1.0,
        id => {
            warn!(unit_id = id, "unrecognized liquid fertilizer unit");
            0.0
        }
    }
}

fn volume_in_imperial_gallons(application_rate: f64, unit: &FertilizerUnit, area: f64) -> f64 {
    application_rate * unit.conversion_to_imperial_gallons_per_acre * area
}

/// Product volume of one application, in the application unit's liquid measure
pub fn product_volume_per_application(
    application_rate: f64,
    unit: &FertilizerUnit,
    area: f64,
) -> f64 {
    volume_in_imperial_gallons(application_rate, unit, area) * imperial_gallon_conversion(unit)
}

pub fn product_volume_per_season(volume: f64, applications_per_season: u32) -> f64 {
    volume * f64::from(applications_per_season)
}

/// Minutes to inject one application, 0 when the injection rate is 0
pub fn time_per_application(
    application_rate: f64,
    unit: &FertilizerUnit,
    area: f64,
    injection_rate: f64,
    injection_unit: &InjectionUnit,
) -> f64 {
    let rate = injection_rate * injection_unit.conversion_to_imp_gallons_per_minute;
    if rate == 0.0 || !rate.is_finite() {
        warn!(injection_unit = injection_unit.id, "no injection rate, application time is 0");
        return 0.0;
    }
    volume_in_imperial_gallons(application_rate, unit, area) / rate
}

/// Product weight of one application in pounds
pub fn product_weight_lb(
    application_rate: f64,
    unit: &FertilizerUnit,
    area: f64,
    density: f64,
    density_unit: &DensityUnit,
) -> f64 {
    volume_in_imperial_gallons(application_rate, unit, area)
        * density
        * density_unit.conversion_factor
}

/// lb/acre of a nutrient delivered by one application
pub fn applied_nutrient_per_application(weight_lb: f64, area: f64, nutrient_percent: f64) -> f64 {
    if area == 0.0 || !area.is_finite() {
        warn!(area, "field area must be positive, no nutrient applied");
        return 0.0;
    }
    weight_lb * (nutrient_percent / 100.0) / area
}

pub fn applied_nutrient_per_season(applied_nutrient: f64, applications_per_season: u32) -> f64 {
    applied_nutrient * f64::from(applications_per_season)
}

fn one_decimal(value: f64) -> f64 {
    let rounded = js_round(value * 10.0) / 10.0;
    if rounded.is_finite() {
        rounded
    } else {
        0.0
    }
}

/// Units a liquid fertigation is measured in
#[derive(Debug, Clone, Copy)]
pub struct FertigationUnits<'a> {
    pub application: &'a FertilizerUnit,
    pub density: &'a DensityUnit,
    pub injection: &'a InjectionUnit,
}

/// Everything the fertigation form reports for one liquid product on a field
pub fn liquid_fertigation(
    fertigation: &LiquidFertigation,
    area: f64,
    units: &FertigationUnits<'_>,
) -> FertigationResult {
    let rate = fertigation.application_rate;
    let volume = product_volume_per_application(rate, units.application, area);
    let weight = product_weight_lb(
        rate,
        units.application,
        area,
        fertigation.density,
        units.density,
    );
    let per_application =
        |percent: f64| one_decimal(applied_nutrient_per_application(weight, area, percent));

    let req_n = per_application(fertigation.nutrients.n);
    let req_p2o5 = per_application(fertigation.nutrients.p2o5);
    let req_k2o = per_application(fertigation.nutrients.k2o);
    let events = fertigation.events_per_season;

    debug!(volume, weight, events, "liquid fertigation");

    FertigationResult {
        volume,
        volume_for_season: product_volume_per_season(volume, events),
        application_time: time_per_application(
            rate,
            units.application,
            area,
            fertigation.injection_rate,
            units.injection,
        ),
        req_n,
        req_p2o5,
        req_k2o,
        season_n: one_decimal(applied_nutrient_per_season(req_n, events)),
        season_p2o5: one_decimal(applied_nutrient_per_season(req_p2o5, events)),
        season_k2o: one_decimal(applied_nutrient_per_season(req_k2o, events)),
    }
}
