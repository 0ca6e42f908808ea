//! # Tradelens Loader
//!
//! Reads a flat transaction file into untyped `RawRecord`s. The only check
//! performed here is the schema check on the header row; row-level validation
//! belongs to the cleaning stage.

pub mod error;
pub mod reader;

pub use error::LoaderError;
pub use reader::{load_from_path, load_from_reader, RawTable};
