pub mod attendant;
pub mod roster;

pub use attendant::*;
pub use roster::*;
