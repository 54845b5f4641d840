//! Bulk density of solid manure from its moisture content

/// Moisture percent assumed when a source has no analysis
pub const DEFAULT_MOISTURE_PERCENT: f64 = 75.0;

const DRY_MOISTURE_LIMIT: f64 = 40.0;
const WET_MOISTURE_LIMIT: f64 = 82.0;
const DRY_DENSITY: f64 = 0.27;
const WET_DENSITY: f64 = 0.837;

/// Density (tonnes/m³) for a moisture percentage
///
/// Constant outside 40–82% moisture, cubic in the moisture fraction between.
pub fn density_factor(moisture_percent: f64) -> f64 {
    if moisture_percent < DRY_MOISTURE_LIMIT {
        return DRY_DENSITY;
    }
    if moisture_percent > WET_MOISTURE_LIMIT {
        return WET_DENSITY;
    }
    let m = moisture_percent / 100.0;
    7.9386 * m.powi(3) - 16.43 * m.powi(2) + 11.993 * m - 2.3975
}

/// [`density_factor`] with the default moisture substituted for missing or invalid input
pub fn density_or_default(moisture_percent: Option<f64>) -> f64 {
    match moisture_percent {
        Some(moisture) if moisture.is_finite() => density_factor(moisture),
        _ => density_factor(DEFAULT_MOISTURE_PERCENT),
    }
}
