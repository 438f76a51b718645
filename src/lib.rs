pub mod adapters;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod error;
pub mod form;
pub mod identifier;
pub mod persistence;
pub mod remote;

pub use adapters::{Dhis2Auth, Dhis2Client};
pub use config::AppConfig;
pub use coordinator::{Notice, SessionView, SubmissionCoordinator, SubmissionTarget};
pub use domain::{AttendantDraft, AttendantRecord, DraftField, Gender, Roster};
pub use error::{RegistryError, Result};
pub use form::FormState;
pub use identifier::{IdentifierProvider, IdentifierStrategy, StrategyKind};
pub use persistence::{CacheBackend, FileCache, MemoryCache, RosterCache};
pub use remote::{IdentifierService, KeyValueStore, WriteMode};
