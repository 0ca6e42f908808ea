//! # Tradelens Cleaning Stage
//!
//! Validates and normalizes raw transaction rows. `validator` holds the pure
//! per-field rules; `stage` applies them across a whole table, in order, and
//! records how many rows each rule removed.

pub mod stage;
pub mod validator;

pub use stage::{clean_records, CleaningOutcome, CleaningReport};
pub use validator::TIMESTAMP_FORMAT;
