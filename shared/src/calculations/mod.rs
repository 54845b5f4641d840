//! Nutrient calculators
//!
//! Every calculator is a pure function of its inputs and a borrowed
//! reference snapshot. Crop calculations and the soil test resolver fail fast
//! with [`CalculationError`](crate::error::CalculationError); manure
//! availability and material remaining degrade to zeroed results instead.

pub mod berries;
pub mod crops;
pub mod density;
pub mod fertigation;
pub mod manure;
pub mod material_remaining;
pub mod nitrogen_credit;
pub mod soil_test;

pub use berries::*;
pub use crops::*;
pub use density::*;
pub use fertigation::*;
pub use manure::*;
pub use material_remaining::*;
pub use nitrogen_credit::*;
pub use soil_test::*;

// ============================================================================
// Rounding
// ============================================================================

/// Round half toward positive infinity (`Math.round` semantics)
///
/// Differs from [`f64::round`] for negative halves: `js_round(-2.5) == -2.0`.
pub fn js_round(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to a whole lb/acre figure, mapping NaN, infinities and `-0` to `0`
pub fn whole_number(value: f64) -> i32 {
    let rounded = js_round(value);
    if !rounded.is_finite() || rounded == 0.0 {
        return 0;
    }
    rounded as i32
}
