//! Soil test conversion onto the Kelowna scale and range resolution

use tracing::debug;

use super::js_round;
use crate::error::{CalculationError, CalculationResult};
use crate::models::{
    ConversionFactors, KelownaConversion, KelownaRange, SoilTestMethod, SoilTestRating,
    SoilTestReading,
};
use crate::types::SoilNutrient;

/// pH at which the phosphorous conversion switches factors
pub const PH_CONVERSION_THRESHOLD: f64 = 7.2;

/// Find the range holding `reading`, falling back to the last range by position
///
/// The reading is rounded to a whole number first. Readings above every
/// range take the last element of `ranges` as given, without searching for
/// the numerically highest range. Returns `None` only for an empty table.
pub fn resolve_range(reading: f64, ranges: &[KelownaRange]) -> Option<&KelownaRange> {
    let rounded = js_round(reading);
    ranges
        .iter()
        .find(|range| {
            f64::from(range.range_low) <= rounded && rounded <= f64::from(range.range_high)
        })
        .or_else(|| ranges.last())
}

/// [`resolve_range`] for a nutrient, failing on an empty table
pub fn resolve_kelowna_range(
    nutrient: SoilNutrient,
    reading: f64,
    ranges: &[KelownaRange],
) -> CalculationResult<&KelownaRange> {
    let range = resolve_range(reading, ranges)
        .ok_or(CalculationError::EmptyRangeTable { nutrient })?;
    debug!(%nutrient, reading, range_id = range.id, "resolved Kelowna range");
    Ok(range)
}

/// Kelowna-equivalent reading for a nutrient, substituting the system default when absent
pub fn kelowna_reading(
    soil_test: Option<&SoilTestReading>,
    nutrient: SoilNutrient,
    factors: &ConversionFactors,
) -> f64 {
    let (converted, default) = match nutrient {
        SoilNutrient::Phosphorous => (
            soil_test.and_then(|t| t.converted_kelowna_p),
            factors.default_soil_test_kelowna_phosphorous,
        ),
        SoilNutrient::Potassium => (
            soil_test.and_then(|t| t.converted_kelowna_k),
            factors.default_soil_test_kelowna_potassium,
        ),
    };
    match converted {
        Some(value) if value != 0.0 && value.is_finite() => value,
        _ => default,
    }
}

/// Convert raw lab values with the method's factors
pub fn convert_to_kelowna(
    method: &SoilTestMethod,
    reading: &SoilTestReading,
) -> CalculationResult<KelownaConversion> {
    let less_than = method.convert_to_kelowna_ph_less_than_72;
    let greater_than = method.convert_to_kelowna_ph_greater_than_72;

    let acidic = reading.val_ph < PH_CONVERSION_THRESHOLD;
    let converted_kelowna_p = match (acidic, less_than, greater_than) {
        (true, Some(factor), _) => reading.val_p * factor,
        (false, _, Some(factor)) => reading.val_p * factor,
        _ => reading.val_p,
    };
    let converted_kelowna_k = match method.convert_to_kelowna_k {
        Some(factor) => reading.val_k * factor,
        None => reading.val_k,
    };

    let has_p_factor = [less_than, greater_than]
        .iter()
        .any(|factor| matches!(factor, Some(f) if *f != 0.0));
    if !has_p_factor {
        return Err(CalculationError::SoilTestConversion(format!(
            "soil test method {} has no phosphorous factors",
            method.id
        )));
    }
    if converted_kelowna_k == 0.0 || converted_kelowna_k.is_nan() {
        return Err(CalculationError::SoilTestConversion(format!(
            "potassium converted to zero with soil test method {}",
            method.id
        )));
    }

    Ok(KelownaConversion {
        converted_kelowna_p,
        converted_kelowna_k,
    })
}

/// First rating whose upper limit covers `value`, else the last rating
pub fn rate_soil_test(value: f64, ratings: &[SoilTestRating]) -> Option<&SoilTestRating> {
    ratings
        .iter()
        .find(|rating| value <= rating.upper_limit)
        .or_else(|| ratings.last())
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

    fn method() -> SoilTestMethod {
        SoilTestMethod {
            id: 2,
            name: "Olsen".to_string(),
            convert_to_kelowna_ph_less_than_72: Some(0.8),
            convert_to_kelowna_ph_greater_than_72: Some(1.2),
            convert_to_kelowna_k: Some(0.5),
            sort_num: 1,
        }
    }

    #[test]
    fn test_resolve_range_rounds_reading() {
        let ranges = vec![range(1, 0, 10), range(2, 11, 20)];
        assert_eq!(resolve_range(10.4, &ranges).map(|r| r.id), Some(1));
        assert_eq!(resolve_range(10.5, &ranges).map(|r| r.id), Some(2));
    }

    #[test]
    fn test_resolve_range_falls_back_to_last_position() {
        let unsorted = vec![range(3, 21, 30), range(1, 0, 10), range(2, 11, 20)];
        assert_eq!(resolve_range(999.0, &unsorted).map(|r| r.id), Some(2));
    }

    #[test]
    fn test_empty_table_is_an_error() {
        let err = resolve_kelowna_range(SoilNutrient::Potassium, 12.0, &[]).unwrap_err();
        assert_eq!(
            err,
            CalculationError::EmptyRangeTable {
                nutrient: SoilNutrient::Potassium
            }
        );
    }

    #[test]
    fn test_kelowna_reading_defaults() {
        let factors = ConversionFactors::default();
        let zeroed = SoilTestReading {
            converted_kelowna_p: Some(0.0),
            converted_kelowna_k: Some(35.2),
            ..Default::default()
        };
        assert_eq!(kelowna_reading(Some(&zeroed), SoilNutrient::Phosphorous, &factors), 250.0);
        assert_eq!(kelowna_reading(Some(&zeroed), SoilNutrient::Potassium, &factors), 35.2);
        assert_eq!(kelowna_reading(None, SoilNutrient::Potassium, &factors), 500.0);
    }

    #[test]
    fn test_convert_uses_ph_branch() {
        let acidic = SoilTestReading {
            val_p: 40.0,
            val_k: 100.0,
            val_ph: 6.5,
            ..Default::default()
        };
        let alkaline = SoilTestReading {
            val_ph: 7.2,
            ..acidic.clone()
        };
        let a = convert_to_kelowna(&method(), &acidic).unwrap();
        let b = convert_to_kelowna(&method(), &alkaline).unwrap();
        assert!((a.converted_kelowna_p - 32.0).abs() < 1e-9);
        assert!((b.converted_kelowna_p - 48.0).abs() < 1e-9);
        assert!((a.converted_kelowna_k - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_convert_requires_p_factor() {
        let mut m = method();
        m.convert_to_kelowna_ph_less_than_72 = None;
        m.convert_to_kelowna_ph_greater_than_72 = None;
        let reading = SoilTestReading {
            val_p: 40.0,
            val_k: 100.0,
            ..Default::default()
        };
        assert!(matches!(
            convert_to_kelowna(&m, &reading),
            Err(CalculationError::SoilTestConversion(_))
        ));
    }

    #[test]
    fn test_convert_rejects_zero_potassium() {
        let reading = SoilTestReading {
            val_p: 40.0,
            val_k: 0.0,
            ..Default::default()
        };
        assert!(convert_to_kelowna(&method(), &reading).is_err());
    }

    #[test]
    fn test_rate_soil_test() {
        let ratings = vec![
            SoilTestRating { id: 1, upper_limit: 20.0, rating: "Low".to_string() },
            SoilTestRating { id: 2, upper_limit: 60.0, rating: "Medium".to_string() },
            SoilTestRating { id: 3, upper_limit: 100.0, rating: "High".to_string() },
        ];
        assert_eq!(rate_soil_test(20.0, &ratings).map(|r| r.rating.as_str()), Some("Low"));
        assert_eq!(rate_soil_test(45.0, &ratings).map(|r| r.rating.as_str()), Some("Medium"));
        assert_eq!(rate_soil_test(500.0, &ratings).map(|r| r.rating.as_str()), Some("High"));
        assert!(rate_soil_test(1.0, &[]).is_none());
    }
}
