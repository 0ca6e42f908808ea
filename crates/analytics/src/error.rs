use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Failed to serialize analytics: {0}")]
    Serialization(#[from] serde_json::Error),
}
