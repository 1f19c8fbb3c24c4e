//! Shared components - errors and unit helpers

pub mod errors;
pub mod utils;
