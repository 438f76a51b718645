use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

use super::state::{Notice, SessionView};
use crate::domain::{AttendantDraft, AttendantRecord, DraftField, Roster};
use crate::error::{RegistryError, Result};
use crate::form::FormState;
use crate::identifier::IdentifierProvider;
use crate::persistence::RosterCache;
use crate::remote::{KeyValueStore, WriteMode};

/// Where and how records are written
#[derive(Debug, Clone)]
pub struct SubmissionTarget {
    pub namespace: String,
    pub write_mode: WriteMode,
}

struct Session {
    form: FormState,
    roster: Roster,
    notice: Option<Notice>,
}

/// Clears the busy flag on every exit path, including a dropped future
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Submission Coordinator
///
/// Owns the draft, the roster and the local cache, and runs one submission
/// at a time: identifier, remote write, roster append, cache save, form reset.
pub struct SubmissionCoordinator {
    identifiers: Arc<dyn IdentifierProvider>,
    store: Arc<dyn KeyValueStore>,
    cache: RosterCache,
    target: SubmissionTarget,
    session: Mutex<Session>,
    busy: AtomicBool,
}

impl SubmissionCoordinator {
    /// Create the coordinator, loading the roster from the local cache
    pub fn new(
        identifiers: Arc<dyn IdentifierProvider>,
        store: Arc<dyn KeyValueStore>,
        cache: RosterCache,
        target: SubmissionTarget,
    ) -> Self {
        let roster = cache.load();
        info!(
            namespace = %target.namespace,
            write_mode = %target.write_mode,
            cached = roster.len(),
            "submission coordinator ready"
        );

        Self {
            identifiers,
            store,
            cache,
            target,
            session: Mutex::new(Session {
                form: FormState::new(),
                roster,
                notice: None,
            }),
            busy: AtomicBool::new(false),
        }
    }

    // The lock is never held across an await or while user code runs, so a
    // poisoned guard still holds consistent state.
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn target(&self) -> &SubmissionTarget {
        &self.target
    }

    pub fn draft(&self) -> AttendantDraft {
        self.session().form.draft().clone()
    }

    pub fn set_field(&self, field: DraftField, value: impl Into<String>) {
        self.session().form.set_field(field, value);
    }

    pub fn reset(&self) {
        self.session().form.reset();
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn notice(&self) -> Option<Notice> {
        self.session().notice.clone()
    }

    pub fn roster(&self) -> Roster {
        self.session().roster.clone()
    }

    /// Everything the presentation layer renders, read under one lock
    pub fn view(&self) -> SessionView {
        let session = self.session();
        SessionView {
            draft: session.form.draft().clone(),
            busy: self.is_busy(),
            notice: session.notice.clone(),
            roster: session.roster.clone(),
        }
    }

    /// Submit the current draft.
    ///
    /// Fails with `Busy` when another submission is in flight. Any failure up
    /// to and including the remote write leaves draft, roster and cache as
    /// they were.
    pub async fn submit(&self) -> Result<AttendantRecord> {
        let _busy = BusyGuard::try_acquire(&self.busy).ok_or(RegistryError::Busy)?;

        let draft = self.draft();
        let validated = draft.validate()?;

        let identifier = self
            .identifiers
            .next_identifier()
            .await
            .map_err(RegistryError::into_identifier_failure)?;
        if identifier.trim().is_empty() {
            return Err(RegistryError::IdentifierAcquisition(
                "identifier provider returned an empty identifier".to_string(),
            ));
        }
        if self.session().roster.contains_identifier(&identifier) {
            return Err(RegistryError::IdentifierAcquisition(format!(
                "identifier {identifier} is already in the roster"
            )));
        }
        debug!(%identifier, "identifier acquired");

        let record = validated.with_identifier(identifier);
        let payload = serde_json::to_value(&record)?;

        self.store
            .write_entry(
                &self.target.namespace,
                &record.identifier,
                &payload,
                self.target.write_mode,
            )
            .await
            .map_err(RegistryError::into_write_failure)?;

        let mut session = self.session();
        session.roster.append(record.clone())?;
        if let Err(e) = self.cache.save(&session.roster) {
            error!(identifier = %record.identifier, error = %e, "roster cache not saved");
            session.notice = Some(Notice::cache_not_saved(&e));
        }
        session.form.reset();
        let total = session.roster.len();
        drop(session);

        info!(
            identifier = %record.identifier,
            namespace = %self.target.namespace,
            roster_len = total,
            "attendant registered"
        );
        Ok(record)
    }

    /// Submit handler for the presentation layer.
    ///
    /// Never returns an error: a failure becomes the current notice. A click
    /// while busy is ignored.
    pub async fn handle_submit(&self) -> Option<AttendantRecord> {
        if self.is_busy() {
            debug!("submit ignored, submission in flight");
            return None;
        }
        self.session().notice = None;

        match self.submit().await {
            Ok(record) => Some(record),
            Err(RegistryError::Busy) => {
                debug!("submit ignored, submission in flight");
                None
            }
            Err(e) => {
                warn!(error = %e, "submission failed");
                self.session().notice = Some(Notice::submission_failed(&e));
                None
            }
        }
    }
}
