//! Nitrogen credits from the previous crop and previous-year manure

use tracing::warn;

use crate::models::{PreviousCropType, PreviousYearManureApplication};

/// lb N/acre credited for the previous crop; 0 when none is recorded
pub fn previous_crop_n_credit(prev_crop_id: i32, previous_crops: &[PreviousCropType]) -> f64 {
    if prev_crop_id == 0 {
        return 0.0;
    }
    match previous_crops.iter().find(|p| p.id == prev_crop_id) {
        Some(previous) => previous.nitrogen_credit_imperial,
        None => {
            warn!(prev_crop_id, "previous crop not found, no N credit applied");
            0.0
        }
    }
}

fn frequency_id(frequency: Option<&str>) -> Option<i32> {
    let frequency = frequency?.trim();
    if frequency.is_empty() || frequency == "0" {
        return None;
    }
    frequency.parse().ok()
}

fn matching_application<'a>(
    frequency: Option<&str>,
    applications: &'a [PreviousYearManureApplication],
) -> Option<&'a PreviousYearManureApplication> {
    let id = frequency_id(frequency)?;
    applications.iter().find(|app| app.frequency == id)
}

/// Whether the field's previous-year manure frequency is a known frequency
pub fn manure_applied_in_previous_year(
    frequency: Option<&str>,
    applications: &[PreviousYearManureApplication],
) -> bool {
    matching_application(frequency, applications).is_some()
}

/// Default lb N/acre credit for previous-year manure: first value of the frequency's credit list
pub fn previous_year_manure_n_credit(
    frequency: Option<&str>,
    applications: &[PreviousYearManureApplication],
) -> f64 {
    let Some(application) = matching_application(frequency, applications) else {
        return 0.0;
    };

    let first = application
        .default_nitrogen_credit
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .split(',')
        .next()
        .map(str::trim)
        .unwrap_or_default();

    match first.parse::<i32>() {
        Ok(credit) => f64::from(credit),
        Err(_) => {
            warn!(
                frequency = application.frequency,
                credit = %application.default_nitrogen_credit,
                "unparsable default nitrogen credit"
            );
            0.0
        }
    }
}
