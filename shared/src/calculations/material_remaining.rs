//! Material remaining: how much of each manure source is still unallocated
//!
//! Never fails. A source nobody applied yet is the common case and reports
//! 0% applied.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::density::density_or_default;
use super::js_round;
use crate::models::{
    AppliedManure, LiquidApplicationConversion, ManureSource, PlanningYear,
    SolidApplicationConversion, Unit,
};
use crate::types::ManureType;

/// Shown instead of "0 tons" when nothing is left
pub const NO_MATERIAL_REMAINING: &str = "No material remaining";

/// Percent remaining at or below which a source is flagged as running low
pub const LOW_STOCK_PERCENT: i32 = 10;

/// Application-rate conversion tables
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionTables<'a> {
    pub solid: &'a [SolidApplicationConversion],
    pub liquid: &'a [LiquidApplicationConversion],
    pub units: &'a [Unit],
}

/// Allocation status of one manure source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppliedManureData {
    pub source_name: String,
    pub source_uuid: Uuid,
    pub manure_material_type: Option<ManureType>,
    pub total_annual_manure_to_apply: f64,
    pub total_applied: f64,
    pub total_annual_manure_remaining_to_apply: f64,
    pub whole_percent_applied: i32,
    pub whole_percent_remaining: i32,
    pub applied_message: String,
    pub remaining_to_apply_message: String,
    pub formatted_total_applied: String,
    pub formatted_total_remaining: String,
    pub formatted_total_to_apply: String,
}

impl AppliedManureData {
    pub fn is_over_applied(&self) -> bool {
        self.total_applied > self.total_annual_manure_to_apply
    }

    pub fn is_material_type(&self, material_type: ManureType) -> bool {
        self.manure_material_type == Some(material_type)
    }
}

/// Allocation status of every source in a planning year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRemainingData {
    pub applied_stored_manures: Vec<AppliedManureData>,
    pub applied_imported_manures: Vec<AppliedManureData>,
    pub materials_remaining_warnings: Vec<String>,
}

impl MaterialRemainingData {
    pub fn all_sources(&self) -> impl Iterator<Item = &AppliedManureData> {
        self.applied_stored_manures
            .iter()
            .chain(self.applied_imported_manures.iter())
    }

    pub fn filter_by_material_type(&self, material_type: ManureType) -> Vec<&AppliedManureData> {
        self.all_sources()
            .filter(|source| source.is_material_type(material_type))
            .collect()
    }

    /// Drops every source of another material type
    pub fn retain_material_type(&mut self, material_type: ManureType) {
        self.applied_stored_manures
            .retain(|source| source.is_material_type(material_type));
        self.applied_imported_manures
            .retain(|source| source.is_material_type(material_type));
    }

    pub fn summary(&self) -> MaterialRemainingSummary {
        let sources: Vec<&AppliedManureData> = self.all_sources().collect();
        if sources.is_empty() {
            return MaterialRemainingSummary::default();
        }
        let total_percent: i64 = sources
            .iter()
            .map(|s| i64::from(s.whole_percent_applied))
            .sum();
        MaterialRemainingSummary {
            total_sources: sources.len(),
            sources_with_remaining_material: sources
                .iter()
                .filter(|s| s.whole_percent_remaining >= LOW_STOCK_PERCENT)
                .count(),
            sources_over_applied: sources.iter().filter(|s| s.is_over_applied()).count(),
            average_percent_applied: js_round(total_percent as f64 / sources.len() as f64) as i32,
        }
    }
}

/// Totals across every source of a planning year
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRemainingSummary {
    pub total_sources: usize,
    /// Sources with at least 10% left to apply
    pub sources_with_remaining_material: usize,
    pub sources_over_applied: usize,
    pub average_percent_applied: i32,
}

// ============================================================================
// Applied amounts
// ============================================================================

/// Factor turning an application rate into the source's unit (tons or US gallons) per acre
pub fn application_conversion_factor(
    application: &AppliedManure,
    source: &ManureSource,
    tables: &ConversionTables<'_>,
) -> f64 {
    let unit_id = application.appl_unit_id;
    let material = application.solid_liquid.or(source.manure_type);

    let from_table = match material {
        Some(ManureType::Solid) => tables
            .solid
            .iter()
            .find(|c| c.unit_id == unit_id)
            .map(|c| c.conversion.factor(density_or_default(source.moisture_percent))),
        Some(ManureType::Liquid) => tables
            .liquid
            .iter()
            .find(|c| c.unit_id == unit_id)
            .map(|c| c.factor),
        None => None,
    };

    from_table.unwrap_or_else(|| {
        tables
            .units
            .iter()
            .find(|u| u.id == unit_id)
            .map(|u| u.conversion_lb_ton)
            .filter(|factor| *factor != 0.0 && factor.is_finite())
            .unwrap_or(1.0)
    })
}

/// Amount applied by one application, rounded to a whole unit
pub fn applied_amount(
    application: &AppliedManure,
    field_area: f64,
    source: &ManureSource,
    tables: &ConversionTables<'_>,
) -> f64 {
    let factor = application_conversion_factor(application, source, tables);
    let amount = js_round(application.application_rate * field_area * factor);
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

// ============================================================================
// Percentages and formatting
// ============================================================================

/// `floor(part / total * 100)`, or 0 when the total is 0
pub fn whole_percent(part: f64, total: f64) -> i32 {
    if total == 0.0 || !total.is_finite() {
        return 0;
    }
    let percent = (part / total * 100.0).floor();
    if percent.is_finite() {
        percent as i32
    } else {
        0
    }
}

/// Whole number with comma thousands separators
pub fn format_thousands(value: f64) -> String {
    let rounded = js_round(value) as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// `"1,234 tons"` or `"1,234 gallons"`; unknown material counts as solid
pub fn format_amount(amount: f64, material: Option<ManureType>) -> String {
    let unit = material.unwrap_or(ManureType::Solid).unit_label();
    format!("{} {}", format_thousands(amount), unit)
}

fn format_remaining(amount: f64, material: Option<ManureType>) -> String {
    if amount <= 0.0 {
        NO_MATERIAL_REMAINING.to_string()
    } else {
        format_amount(amount, material)
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// Allocation status of one source across every field of the year
pub fn source_material_remaining(
    year: &PlanningYear,
    source: &ManureSource,
    tables: &ConversionTables<'_>,
) -> AppliedManureData {
    let total_applied: f64 = year
        .applications_of(source.uuid)
        .map(|(field, application)| applied_amount(application, field.area, source, tables))
        .sum();

    let total_to_apply = source.standardized_annual_amount();
    let total_remaining = (total_to_apply - total_applied).max(0.0);
    let whole_percent_applied = whole_percent(total_applied, total_to_apply);
    let whole_percent_remaining = whole_percent(total_remaining, total_to_apply);
    let material = source.manure_type;

    debug!(
        source = %source.uuid,
        total_applied,
        total_to_apply,
        whole_percent_applied,
        "material remaining"
    );

    AppliedManureData {
        source_name: source.name.clone(),
        source_uuid: source.uuid,
        manure_material_type: material,
        total_annual_manure_to_apply: total_to_apply,
        total_applied,
        total_annual_manure_remaining_to_apply: total_remaining,
        whole_percent_applied,
        whole_percent_remaining,
        applied_message: format!("Applied {}% of total available", whole_percent_applied),
        remaining_to_apply_message: format!("{}% remaining to apply", whole_percent_remaining),
        formatted_total_applied: format_amount(total_applied, material),
        formatted_total_remaining: format_remaining(total_remaining, material),
        formatted_total_to_apply: format_amount(total_to_apply, material),
    }
}

fn collect_warnings(data: &AppliedManureData, warnings: &mut Vec<String>) {
    if data.is_over_applied() {
        let excess = data.total_applied - data.total_annual_manure_to_apply;
        warnings.push(format!(
            "Warning: {} has been over-applied by {}",
            data.source_name,
            format_amount(excess, data.manure_material_type)
        ));
    }
    if data.whole_percent_remaining > 0 && data.whole_percent_remaining <= LOW_STOCK_PERCENT {
        warnings.push(format!(
            "Alert: {} is running low ({}% remaining)",
            data.source_name, data.whole_percent_remaining
        ));
    }
}

/// Allocation status of every storage system and imported material in the year
pub fn calculate_material_remaining(
    year: &PlanningYear,
    tables: &ConversionTables<'_>,
) -> MaterialRemainingData {
    let mut warnings = Vec::new();
    let mut summarize = |sources: &[ManureSource]| -> Vec<AppliedManureData> {
        sources
            .iter()
            .map(|source| {
                let data = source_material_remaining(year, source, tables);
                collect_warnings(&data, &mut warnings);
                data
            })
            .collect()
    };

    let applied_stored_manures = summarize(&year.manure_storage_systems);
    let applied_imported_manures = summarize(&year.imported_manures);

    MaterialRemainingData {
        applied_stored_manures,
        applied_imported_manures,
        materials_remaining_warnings: warnings,
    }
}
