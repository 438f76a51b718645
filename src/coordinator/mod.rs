//! Submission Coordinator
//!
//! Runs the registration workflow for one session: edits go into the
//! draft, a submit turns the draft into a stored record and appends it to
//! the roster. At most one submission runs at a time.

pub mod bootstrap;
pub mod coordinator;
pub mod state;

pub use bootstrap::{build_coordinator, build_identifier_strategy, build_roster_cache};
pub use coordinator::{SubmissionCoordinator, SubmissionTarget};
pub use state::{Notice, SessionView};
