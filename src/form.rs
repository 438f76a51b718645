//! Form state for the attendant being typed in.
//!
//! Holds the draft only; validation happens when the coordinator submits.

use crate::domain::{AttendantDraft, DraftField};

#[derive(Debug, Clone, Default)]
pub struct FormState {
    draft: AttendantDraft,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &AttendantDraft {
        &self.draft
    }

    /// Replace one field, leaving the rest untouched
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        *self.draft.slot_mut(field) = value.into();
    }

    /// Back to the empty baseline
    pub fn reset(&mut self) {
        self.draft = AttendantDraft::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_field_only_touches_that_field() {
        let mut form = FormState::new();
        form.set_field(DraftField::FirstName, "Amara");
        form.set_field(DraftField::Age, "29");
        form.set_field(DraftField::FirstName, "Ama");

        let draft = form.draft();
        assert_eq!(draft.first_name, "Ama");
        assert_eq!(draft.age, "29");
        for field in [
            DraftField::LastName,
            DraftField::Gender,
            DraftField::OrganizationUnit,
            DraftField::TrainingDate,
        ] {
            assert_eq!(draft.get(field), "", "{field} changed");
        }
    }

    #[test]
    fn last_write_wins_for_every_field() {
        let mut form = FormState::new();
        for round in 0..3 {
            for field in DraftField::ALL {
                form.set_field(field, format!("{field}-{round}"));
            }
        }
        for field in DraftField::ALL {
            assert_eq!(form.draft().get(field), format!("{field}-2"));
        }
    }

    #[test]
    fn reset_restores_empty_draft() {
        let mut form = FormState::new();
        for field in DraftField::ALL {
            form.set_field(field, "x");
        }
        form.reset();
        assert!(form.draft().is_empty());

        form.reset();
        assert_eq!(form.draft(), &AttendantDraft::default());
    }
}
