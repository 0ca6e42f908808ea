//! # Tradelens Pipeline
//!
//! The controller that drives a transaction file through load, clean and
//! aggregate, holding each stage's output so it can be queried repeatedly.
//!
//! ```no_run
//! use pipeline::Pipeline;
//!
//! let mut pipeline = Pipeline::from_path("transactions.csv");
//! let bundle = pipeline.run()?;
//! println!("{} transactions", bundle.total_transactions);
//! let aapl = pipeline.by_ticker("aapl")?;
//! # Ok::<(), pipeline::PipelineError>(())
//! ```

pub mod controller;
pub mod error;
pub mod query;

pub use controller::{process_transactions, Pipeline, PipelinePhase, TransactionSource};
pub use error::PipelineError;
pub use query::{parse_time_bound, TransactionQuery};
