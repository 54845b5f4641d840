//! Common types used across the calculators

use serde::{Deserialize, Deserializer, Serialize};

/// Soil nutrients measured on the Kelowna scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SoilNutrient {
    Phosphorous,
    Potassium,
}

impl std::fmt::Display for SoilNutrient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoilNutrient::Phosphorous => write!(f, "phosphorous"),
            SoilNutrient::Potassium => write!(f, "potassium"),
        }
    }
}

/// Physical form of a manure or compost material
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ManureType {
    #[serde(alias = "solid", alias = "SOLID")]
    Solid,
    #[serde(alias = "liquid", alias = "LIQUID")]
    Liquid,
}

impl ManureType {
    /// Unit suffix used when displaying amounts of this material
    pub fn unit_label(&self) -> &'static str {
        match self {
            ManureType::Solid => "tons",
            ManureType::Liquid => "gallons",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "solid" => Some(ManureType::Solid),
            "liquid" => Some(ManureType::Liquid),
            _ => None,
        }
    }
}

impl std::fmt::Display for ManureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManureType::Solid => write!(f, "Solid"),
            ManureType::Liquid => write!(f, "Liquid"),
        }
    }
}

/// Unit a crop yield is entered in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum HarvestUnit {
    #[serde(rename = "bc/ac")]
    BushelsPerAcre,
    #[default]
    #[serde(rename = "ton/ac")]
    TonsPerAcre,
}

impl HarvestUnit {
    pub fn label(&self) -> &'static str {
        match self {
            HarvestUnit::BushelsPerAcre => "bc/ac",
            HarvestUnit::TonsPerAcre => "ton/ac",
        }
    }
}

// ============================================================================
// Lenient deserializers for planning-file fields
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Number(f64),
    Text(String),
}

/// Ids are stored as strings by older planning files (`"28"`), numbers by newer ones
pub fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::Number(value)) => Ok(value as i32),
        Some(StringOrNumber::Text(text)) if text.trim().is_empty() => Ok(0),
        Some(StringOrNumber::Text(text)) => text
            .trim()
            .parse::<i32>()
            .map_err(|_| serde::de::Error::custom(format!("invalid id: {}", text))),
        None => Ok(0),
    }
}

/// Numeric text such as `"75"` or `"75 %"`; anything else is `None`
pub fn parse_numeric_text(text: &str) -> Option<f64> {
    text.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Amounts and percentages that older planning files persist as strings
pub fn optional_f64_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<StringOrNumber>::deserialize(deserializer)? {
            Some(StringOrNumber::Number(value)) if value.is_finite() => Some(value),
            Some(StringOrNumber::Number(_)) => None,
            Some(StringOrNumber::Text(text)) => parse_numeric_text(&text),
            None => None,
        },
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrBool {
    Bool(bool),
    Text(String),
}

/// Flags like `coverCropHarvested` are persisted as `"true"`/`"false"` strings or null
pub fn optional_bool_from_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<StringOrBool>::deserialize(deserializer)? {
            Some(StringOrBool::Bool(value)) => Some(value),
            Some(StringOrBool::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
                "" => None,
                "false" | "0" => Some(false),
                _ => Some(true),
            },
            None => None,
        },
    )
}

/// Solid/liquid flags may be an empty string when the material is not yet chosen
pub fn optional_manure_type<'de, D>(deserializer: D) -> Result<Option<ManureType>, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(ManureType::from_label))
}
