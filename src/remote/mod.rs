//! Seams to the remote services a submission depends on.

pub mod factory;
pub mod traits;

pub use factory::build_dhis2_client;
pub use traits::{IdentifierService, KeyValueStore, WriteMode};

#[cfg(test)]
pub use traits::{MockIdentifierService, MockKeyValueStore};
