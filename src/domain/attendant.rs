use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{RegistryError, Result};

/// Gender as offered by the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
            Self::Unset => "",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Gender {
    type Err = RegistryError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" => Ok(Self::Unset),
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            "other" | "o" => Ok(Self::Other),
            _ => Err(RegistryError::Validation(format!(
                "gender must be one of Male, Female, Other, got '{}'",
                raw.trim()
            ))),
        }
    }
}

/// Form fields of an attendant, addressed by their wire names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    FirstName,
    LastName,
    Age,
    Gender,
    OrganizationUnit,
    TrainingDate,
}

impl DraftField {
    pub const ALL: [DraftField; 6] = [
        Self::FirstName,
        Self::LastName,
        Self::Age,
        Self::Gender,
        Self::OrganizationUnit,
        Self::TrainingDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Age => "age",
            Self::Gender => "gender",
            Self::OrganizationUnit => "organizationUnit",
            Self::TrainingDate => "trainingDate",
        }
    }

    /// Human label used by the form prompts and table headers
    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Age => "Age",
            Self::Gender => "Gender",
            Self::OrganizationUnit => "Organization Unit",
            Self::TrainingDate => "Training Date",
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DraftField {
    type Err = RegistryError;

    fn from_str(raw: &str) -> Result<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "firstname" => Ok(Self::FirstName),
            "lastname" => Ok(Self::LastName),
            "age" => Ok(Self::Age),
            "gender" => Ok(Self::Gender),
            "organizationunit" | "orgunit" | "ou" => Ok(Self::OrganizationUnit),
            "trainingdate" | "date" => Ok(Self::TrainingDate),
            _ => Err(RegistryError::Validation(format!(
                "unknown field '{}'; expected one of firstName, lastName, age, gender, organizationUnit, trainingDate",
                raw.trim()
            ))),
        }
    }
}

/// The in-progress record, held exactly as typed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendantDraft {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub gender: String,
    pub organization_unit: String,
    pub training_date: String,
}

impl AttendantDraft {
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::FirstName => &self.first_name,
            DraftField::LastName => &self.last_name,
            DraftField::Age => &self.age,
            DraftField::Gender => &self.gender,
            DraftField::OrganizationUnit => &self.organization_unit,
            DraftField::TrainingDate => &self.training_date,
        }
    }

    pub(crate) fn slot_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::FirstName => &mut self.first_name,
            DraftField::LastName => &mut self.last_name,
            DraftField::Age => &mut self.age,
            DraftField::Gender => &mut self.gender,
            DraftField::OrganizationUnit => &mut self.organization_unit,
            DraftField::TrainingDate => &mut self.training_date,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check the draft and normalize it into the fields of a record.
    ///
    /// Every problem is reported at once, joined with "; ".
    pub fn validate(&self) -> Result<ValidatedDraft> {
        let mut errors = Vec::new();

        let first_name = required(&self.first_name, DraftField::FirstName, &mut errors);
        let last_name = required(&self.last_name, DraftField::LastName, &mut errors);
        let organization_unit =
            required(&self.organization_unit, DraftField::OrganizationUnit, &mut errors);

        let age = match self.age.trim() {
            "" => {
                errors.push("Age is required".to_string());
                String::new()
            }
            raw => match raw.parse::<u16>() {
                Ok(n) if n <= MAX_AGE => n.to_string(),
                _ => {
                    errors.push(format!("Age must be a whole number between 0 and {MAX_AGE}"));
                    String::new()
                }
            },
        };

        let gender = match self.gender.parse::<Gender>() {
            Ok(g) => g,
            Err(RegistryError::Validation(msg)) => {
                errors.push(msg);
                Gender::Unset
            }
            Err(other) => return Err(other),
        };

        let training_date = match self.training_date.trim() {
            "" => {
                errors.push("Training Date is required".to_string());
                None
            }
            raw => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.push(format!("Training Date must be YYYY-MM-DD, got '{raw}'"));
                    None
                }
            },
        };

        match (errors.is_empty(), training_date) {
            (true, Some(training_date)) => Ok(ValidatedDraft {
                first_name,
                last_name,
                age,
                gender,
                organization_unit,
                training_date,
            }),
            _ => Err(RegistryError::Validation(errors.join("; "))),
        }
    }
}

const MAX_AGE: u16 = 150;
const DATE_FORMAT: &str = "%Y-%m-%d";

fn required(value: &str, field: DraftField, errors: &mut Vec<String>) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(format!("{} is required", field.label()));
    }
    trimmed.to_string()
}

/// Draft fields that passed validation, waiting for an identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDraft {
    first_name: String,
    last_name: String,
    age: String,
    gender: Gender,
    organization_unit: String,
    training_date: NaiveDate,
}

impl ValidatedDraft {
    /// Attach the identifier and produce the record that gets stored
    pub fn with_identifier(self, identifier: String) -> AttendantRecord {
        AttendantRecord {
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            gender: self.gender,
            organization_unit: self.organization_unit,
            training_date: self.training_date,
            identifier,
        }
    }
}

/// A submitted attendant, as written to the data store and kept in the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendantRecord {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    #[serde(default)]
    pub gender: Gender,
    pub organization_unit: String,
    pub training_date: NaiveDate,
    pub identifier: String,
}

impl AttendantRecord {
    /// One-line summary shown when a roster row is expanded
    pub fn detail(&self) -> String {
        let gender = match self.gender {
            Gender::Unset => "gender not given",
            g => g.as_str(),
        };
        format!(
            "{} {}, {} years old, {}, from {}, training on {}",
            self.first_name,
            self.last_name,
            self.age,
            gender,
            self.organization_unit,
            self.training_date.format(DATE_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amara() -> AttendantDraft {
        AttendantDraft {
            first_name: "Amara".into(),
            last_name: "Obi".into(),
            age: "29".into(),
            gender: "Female".into(),
            organization_unit: "OU-12".into(),
            training_date: "2024-03-01".into(),
        }
    }

    #[test]
    fn draft_field_accepts_wire_and_snake_names() {
        assert_eq!("firstName".parse::<DraftField>().unwrap(), DraftField::FirstName);
        assert_eq!("first_name".parse::<DraftField>().unwrap(), DraftField::FirstName);
        assert_eq!("organization-unit".parse::<DraftField>().unwrap(), DraftField::OrganizationUnit);
        assert_eq!("trainingDate".parse::<DraftField>().unwrap(), DraftField::TrainingDate);
        assert!("nickname".parse::<DraftField>().is_err());

        for field in DraftField::ALL {
            assert_eq!(field.as_str().parse::<DraftField>().unwrap(), field);
        }
    }

    #[test]
    fn gender_parses_case_insensitively() {
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("".parse::<Gender>().unwrap(), Gender::Unset);
        assert!("unknown".parse::<Gender>().is_err());
    }

    #[test]
    fn validated_record_keeps_the_six_fields() {
        let record = amara().validate().unwrap().with_identifier("ABC123".into());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "firstName": "Amara",
                "lastName": "Obi",
                "age": "29",
                "gender": "Female",
                "organizationUnit": "OU-12",
                "trainingDate": "2024-03-01",
                "identifier": "ABC123",
            })
        );
    }

    #[test]
    fn unset_gender_serializes_as_empty_text() {
        let mut draft = amara();
        draft.gender.clear();
        let record = draft.validate().unwrap().with_identifier("X".into());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["gender"], "");

        let back: AttendantRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.gender, Gender::Unset);
    }

    #[test]
    fn validation_reports_all_missing_fields() {
        let err = AttendantDraft::default().validate().unwrap_err();
        let msg = err.to_string();
        for label in ["First Name", "Last Name", "Age", "Organization Unit", "Training Date"] {
            assert!(msg.contains(label), "missing {label} in {msg}");
        }
        assert!(!msg.contains("gender"));
    }

    #[test]
    fn validation_rejects_bad_age_and_date() {
        let mut draft = amara();
        draft.age = "twenty".into();
        draft.training_date = "01/03/2024".into();
        let msg = draft.validate().unwrap_err().to_string();
        assert!(msg.contains("Age must be a whole number"));
        assert!(msg.contains("Training Date must be YYYY-MM-DD"));
    }

    #[test]
    fn validation_trims_and_normalizes() {
        let mut draft = amara();
        draft.first_name = "  Amara ".into();
        draft.age = "029".into();
        let record = draft.validate().unwrap().with_identifier("ID".into());
        assert_eq!(record.first_name, "Amara");
        assert_eq!(record.age, "29");
    }

    #[test]
    fn detail_line_reads_naturally() {
        let record = amara().validate().unwrap().with_identifier("ID".into());
        assert_eq!(
            record.detail(),
            "Amara Obi, 29 years old, Female, from OU-12, training on 2024-03-01"
        );
    }
}
