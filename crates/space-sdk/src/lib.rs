//! Client-side helpers for the Spaces programs: program ids, PDA finders,
//! account readers and builders for the instructions players send in bulk.

mod address_finders;
mod constants;
mod error;
mod instruction_builders;
mod state;

pub use address_finders::*;
pub use constants::*;
pub use error::SpaceSdkError;
pub use instruction_builders::*;
pub use state::*;
