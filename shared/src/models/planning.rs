//! Planning-year records: fields, applications and manure sources

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{FieldCropEntry, SoilTestReading};
use crate::types::{optional_f64_from_string_or_number, optional_manure_type, ManureType};

/// One planning year of a farm plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlanningYear {
    #[serde(alias = "Year", default)]
    pub year: String,
    #[serde(alias = "Fields", default)]
    pub fields: Vec<Field>,
    #[serde(alias = "ManureStorageSystems", default)]
    pub manure_storage_systems: Vec<ManureSource>,
    #[serde(alias = "ImportedManures", default)]
    pub imported_manures: Vec<ManureSource>,
}

impl PlanningYear {
    /// Every application of the given source across all fields, paired with the field area
    pub fn applications_of(
        &self,
        source_uuid: Uuid,
    ) -> impl Iterator<Item = (&Field, &AppliedManure)> {
        self.fields.iter().flat_map(move |field| {
            field
                .manures
                .iter()
                .filter(move |manure| manure.source_uuid == Some(source_uuid))
                .map(move |manure| (field, manure))
        })
    }

    pub fn source(&self, uuid: Uuid) -> Option<&ManureSource> {
        self.manure_storage_systems
            .iter()
            .chain(self.imported_manures.iter())
            .find(|source| source.uuid == uuid)
    }
}

/// A field within the planning year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(alias = "FieldName", default)]
    pub field_name: String,
    /// Acres
    #[serde(alias = "Area", default)]
    pub area: f64,
    #[serde(alias = "Crops", default)]
    pub crops: Vec<FieldCropEntry>,
    #[serde(alias = "SoilTest", default)]
    pub soil_test: Option<SoilTestReading>,
    #[serde(alias = "Manures", default)]
    pub manures: Vec<AppliedManure>,
    #[serde(alias = "PreviousYearManureApplicationFrequency", default)]
    pub previous_year_manure_application_frequency: Option<String>,
    #[serde(alias = "PreviousYearManureApplicationNCredit", default)]
    pub previous_year_manure_application_n_credit: Option<f64>,
}

impl Field {
    /// The field's soil test, or the fixed default reading when none was taken
    pub fn soil_test_or_default(&self) -> SoilTestReading {
        self.soil_test
            .clone()
            .unwrap_or_else(SoilTestReading::system_default)
    }
}

/// A manure or compost application on a field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppliedManure {
    #[serde(default)]
    pub manure_id: i32,
    #[serde(default)]
    pub manure_name: String,
    #[serde(default)]
    pub application_id: i32,
    #[serde(alias = "unitId", default)]
    pub appl_unit_id: i32,
    #[serde(alias = "rate", default)]
    pub application_rate: f64,
    /// Ammonium-N retention percent
    #[serde(default)]
    pub nh4_retention: f64,
    /// First-year organic N availability percent
    #[serde(alias = "nAvail", default)]
    pub n_available: f64,
    #[serde(deserialize_with = "optional_manure_type", default)]
    pub solid_liquid: Option<ManureType>,
    #[serde(default)]
    pub source_uuid: Option<Uuid>,
}

/// A storage system or imported material whose annual amount is spread over fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ManureSource {
    pub uuid: Uuid,
    #[serde(alias = "Name", alias = "managedManureName", alias = "ManagedManureName", default)]
    pub name: String,
    #[serde(
        alias = "ManureType",
        deserialize_with = "optional_manure_type",
        default
    )]
    pub manure_type: Option<ManureType>,
    /// Annual amount in the unit the user entered it in
    #[serde(alias = "annualAmount", alias = "AnnualAmount", default)]
    pub total_annual_amount_to_apply: f64,
    #[serde(
        alias = "AnnualAmountTonsWeight",
        deserialize_with = "optional_f64_from_string_or_number",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub annual_amount_tons_weight: Option<f64>,
    #[serde(
        rename = "annualAmountUSGallonsVolume",
        alias = "AnnualAmountUSGallonsVolume",
        deserialize_with = "optional_f64_from_string_or_number",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub annual_amount_us_gallons_volume: Option<f64>,
    #[serde(
        alias = "Moisture",
        deserialize_with = "optional_f64_from_string_or_number",
        default
    )]
    pub moisture_percent: Option<f64>,
}

impl ManureSource {
    /// Annual amount in tons if solid, US gallons if liquid
    ///
    /// The standardized weight or volume wins over the entered amount, which
    /// may be in cubic yards or another display unit.
    pub fn standardized_annual_amount(&self) -> f64 {
        let standardized = match self.manure_type {
            Some(ManureType::Solid) => self.annual_amount_tons_weight,
            Some(ManureType::Liquid) => self.annual_amount_us_gallons_volume,
            None => None,
        };
        let amount = standardized.unwrap_or(self.total_annual_amount_to_apply);
        if amount.is_finite() {
            amount
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str) -> ManureSource {
        ManureSource {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            manure_type: Some(ManureType::Solid),
            total_annual_amount_to_apply: 100.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_applications_of_spans_fields() {
        let stored = source("Pile A");
        let other = Uuid::new_v4();
        let applied = |uuid| AppliedManure {
            application_rate: 2.0,
            source_uuid: Some(uuid),
            ..Default::default()
        };
        let year = PlanningYear {
            year: "2025".to_string(),
            fields: vec![
                Field {
                    field_name: "North".to_string(),
                    area: 10.0,
                    manures: vec![applied(stored.uuid), applied(other)],
                    ..Default::default()
                },
                Field {
                    field_name: "South".to_string(),
                    area: 5.0,
                    manures: vec![applied(stored.uuid)],
                    ..Default::default()
                },
            ],
            manure_storage_systems: vec![stored.clone()],
            imported_manures: vec![],
        };

        let areas: Vec<f64> = year.applications_of(stored.uuid).map(|(f, _)| f.area).collect();
        assert_eq!(areas, vec![10.0, 5.0]);
        assert_eq!(year.source(stored.uuid).map(|s| s.name.as_str()), Some("Pile A"));
        assert!(year.source(other).is_none());
    }

    #[test]
    fn test_field_without_soil_test_uses_default() {
        let field = Field::default();
        assert_eq!(
            field.soil_test_or_default(),
            SoilTestReading::system_default()
        );
    }

    #[test]
    fn test_imported_source_reads_managed_name() {
        let json = r#"{
            "uuid": "6f1d2a2e-8d4b-4b6f-9d36-0a9f2c1e7b11",
            "managedManureName": "Imported compost",
            "manureType": "Solid",
            "annualAmount": 40
        }"#;
        let source: ManureSource = serde_json::from_str(json).unwrap();
        assert_eq!(source.name, "Imported compost");
        assert_eq!(source.total_annual_amount_to_apply, 40.0);
        assert_eq!(source.manure_type, Some(ManureType::Solid));
    }

    #[test]
    fn test_imported_manure_in_planning_file_shape() {
        let json = r#"{
            "year": "2025",
            "importedManures": [{
                "uuid": "6f1d2a2e-8d4b-4b6f-9d36-0a9f2c1e7b11",
                "UniqueMaterialName": "Compost - 1",
                "ManagedManureName": "Compost - 1",
                "ManureType": "Solid",
                "AnnualAmount": 100,
                "AnnualAmountCubicYardsVolume": 100,
                "AnnualAmountTonsWeight": 42.5,
                "AnnualAmountDisplayWeight": "43 tons",
                "Units": 6,
                "Moisture": "75",
                "IsMaterialStored": false
            }, {
                "uuid": "1b2c3d4e-5f60-4172-8394-a5b6c7d8e9f0",
                "ManagedManureName": "Digestate",
                "ManureType": "Liquid",
                "AnnualAmount": 10,
                "AnnualAmountUSGallonsVolume": 2641.7,
                "Moisture": ""
            }]
        }"#;
        let year: PlanningYear = serde_json::from_str(json).unwrap();
        let compost = &year.imported_manures[0];
        assert_eq!(compost.moisture_percent, Some(75.0));
        assert_eq!(compost.total_annual_amount_to_apply, 100.0);
        assert_eq!(compost.standardized_annual_amount(), 42.5);

        let digestate = &year.imported_manures[1];
        assert_eq!(digestate.moisture_percent, None);
        assert_eq!(digestate.standardized_annual_amount(), 2641.7);
    }

    #[test]
    fn test_entered_amount_used_without_standardized_value() {
        let stored = source("Pile B");
        assert_eq!(stored.standardized_annual_amount(), 100.0);
    }
}
