use analytics::AnalyticsError;
use loader::LoaderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing required columns: {0:?}")]
    Schema(Vec<String>),

    #[error("Invalid pipeline state: {0}")]
    InvalidState(String),

    #[error("Could not parse time bound '{0}'")]
    Parse(String),

    #[error("Failed to read transactions: {0}")]
    Source(#[source] LoaderError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

/// A missing column is a schema failure; everything else the loader reports is
/// a problem with the source itself.
impl From<LoaderError> for PipelineError {
    fn from(err: LoaderError) -> Self {
        match err {
            LoaderError::MissingColumns(missing) => PipelineError::Schema(missing),
            other => PipelineError::Source(other),
        }
    }
}
