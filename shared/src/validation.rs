//! Validation utilities for planning input and reference tables

use crate::models::KelownaRange;

// ============================================================================
// Planning Input Validations
// ============================================================================

/// Validate that a crop yield is a non-negative number
pub fn validate_yield(yield_amount: f64) -> Result<(), &'static str> {
    if !yield_amount.is_finite() {
        return Err("Yield must be a number");
    }
    if yield_amount < 0.0 {
        return Err("Yield cannot be negative");
    }
    Ok(())
}

/// Validate a percentage such as ammonium retention or organic N availability
pub fn validate_percentage(percent: f64) -> Result<(), &'static str> {
    if !(0.0..=100.0).contains(&percent) {
        return Err("Percentage must be between 0 and 100");
    }
    Ok(())
}

/// Validate moisture content of a manure or compost analysis
pub fn validate_moisture(moisture: f64) -> Result<(), &'static str> {
    if !(0.0..=100.0).contains(&moisture) {
        return Err("Moisture content must be between 0 and 100%");
    }
    Ok(())
}

/// Validate field area in acres
pub fn validate_field_area(area: f64) -> Result<(), &'static str> {
    if !area.is_finite() || area <= 0.0 {
        return Err("Field area must be greater than zero");
    }
    Ok(())
}

/// Validate an application rate
pub fn validate_application_rate(rate: f64) -> Result<(), &'static str> {
    if !rate.is_finite() || rate < 0.0 {
        return Err("Application rate cannot be negative");
    }
    Ok(())
}

// ============================================================================
// Reference Table Validations
// ============================================================================

/// Validate that Kelowna ranges are ascending and do not overlap
///
/// Range resolution falls back to the last row for readings above every
/// range, which is only the highest range when the table is sorted.
pub fn validate_kelowna_ranges(ranges: &[KelownaRange]) -> Result<(), &'static str> {
    if ranges.iter().any(|r| r.range_low > r.range_high) {
        return Err("Kelowna range has a lower bound above its upper bound");
    }
    for pair in ranges.windows(2) {
        if pair[1].range_low < pair[0].range_low {
            return Err("Kelowna ranges are not sorted ascending");
        }
        if pair[1].range_low <= pair[0].range_high {
            return Err("Kelowna ranges overlap");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(id: i32, low: i32, high: i32) -> KelownaRange {
        KelownaRange {
            id,
            range: format!("{}-{}", low, high),
            range_low: low,
            range_high: high,
        }
    }

    #[test]
    fn test_validate_yield() {
        assert!(validate_yield(0.0).is_ok());
        assert!(validate_yield(5.5).is_ok());
        assert!(validate_yield(-1.0).is_err());
        assert!(validate_yield(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_percentage_bounds() {
        assert!(validate_percentage(0.0).is_ok());
        assert!(validate_percentage(100.0).is_ok());
        assert!(validate_percentage(100.5).is_err());
        assert!(validate_percentage(-0.1).is_err());
        assert!(validate_percentage(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_moisture() {
        assert!(validate_moisture(75.0).is_ok());
        assert!(validate_moisture(120.0).is_err());
    }

    #[test]
    fn test_validate_field_area() {
        assert!(validate_field_area(12.5).is_ok());
        assert!(validate_field_area(0.0).is_err());
        assert!(validate_field_area(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_application_rate() {
        assert!(validate_application_rate(0.0).is_ok());
        assert!(validate_application_rate(-3.0).is_err());
    }

    #[test]
    fn test_sorted_ranges_pass() {
        let ranges = vec![range(1, 0, 20), range(2, 21, 40), range(3, 41, 1000)];
        assert!(validate_kelowna_ranges(&ranges).is_ok());
        assert!(validate_kelowna_ranges(&[]).is_ok());
    }

    #[test]
    fn test_unsorted_ranges_fail() {
        let ranges = vec![range(3, 41, 1000), range(1, 0, 20)];
        assert_eq!(
            validate_kelowna_ranges(&ranges),
            Err("Kelowna ranges are not sorted ascending")
        );
    }

    #[test]
    fn test_overlapping_ranges_fail() {
        let ranges = vec![range(1, 0, 20), range(2, 20, 40)];
        assert_eq!(validate_kelowna_ranges(&ranges), Err("Kelowna ranges overlap"));
        assert!(validate_kelowna_ranges(&[range(1, 30, 10)]).is_err());
    }
}
