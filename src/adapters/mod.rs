pub mod dhis2;

pub use dhis2::{Dhis2Auth, Dhis2Client};
