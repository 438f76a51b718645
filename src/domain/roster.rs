use serde::{Deserialize, Serialize};

use super::AttendantRecord;
use crate::error::{RegistryError, Result};

/// Successfully submitted attendants, in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    records: Vec<AttendantRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from stored records, enforcing identifier rules
    pub fn from_records(records: Vec<AttendantRecord>) -> Result<Self> {
        let mut roster = Self::new();
        for record in records {
            roster.append(record)?;
        }
        Ok(roster)
    }

    /// Append a record. Rejects an empty or already used identifier.
    pub fn append(&mut self, record: AttendantRecord) -> Result<()> {
        if record.identifier.trim().is_empty() {
            return Err(RegistryError::Validation(
                "roster records need a non-empty identifier".to_string(),
            ));
        }
        if self.contains_identifier(&record.identifier) {
            return Err(RegistryError::Validation(format!(
                "identifier {} is already in the roster",
                record.identifier
            )));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn contains_identifier(&self, identifier: &str) -> bool {
        self.records.iter().any(|r| r.identifier == identifier)
    }

    pub fn records(&self) -> &[AttendantRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttendantRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;
    use chrono::NaiveDate;

    fn record(id: &str) -> AttendantRecord {
        AttendantRecord {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            age: "36".into(),
            gender: Gender::Female,
            organization_unit: "OU-1".into(),
            training_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            identifier: id.into(),
        }
    }

    #[test]
    fn append_keeps_submission_order() {
        let mut roster = Roster::new();
        roster.append(record("B")).unwrap();
        roster.append(record("A")).unwrap();
        let ids: Vec<_> = roster.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, ["B", "A"]);
    }

    #[test]
    fn append_rejects_empty_and_duplicate_identifiers() {
        let mut roster = Roster::new();
        assert!(roster.append(record("  ")).is_err());
        roster.append(record("A")).unwrap();
        assert!(roster.append(record("A")).is_err());
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn serializes_as_plain_list() {
        let roster = Roster::from_records(vec![record("A")]).unwrap();
        let json = serde_json::to_value(&roster).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["identifier"], "A");
    }
}
