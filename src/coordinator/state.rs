use serde::Serialize;

use crate::domain::{AttendantDraft, Roster};
use crate::error::RegistryError;

/// The single user-visible error message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn submission_failed(err: &RegistryError) -> Self {
        Self {
            title: "Error submitting form".to_string(),
            message: err.to_string(),
        }
    }

    pub fn cache_not_saved(err: &RegistryError) -> Self {
        Self {
            title: "Registered, but the local roster copy was not saved".to_string(),
            message: err.to_string(),
        }
    }
}

/// Snapshot of what the presentation layer renders
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub draft: AttendantDraft,
    pub busy: bool,
    pub notice: Option<Notice>,
    pub roster: Roster,
}
