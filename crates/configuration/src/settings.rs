use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataSettings,
    pub logging: LoggingSettings,
    pub report: ReportSettings,
}

/// Where the transaction file lives.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    /// Path to the CSV of brokerage transactions.
    pub transactions_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Default `tracing` filter directive, e.g. "info" or "pipeline=debug".
    /// `RUST_LOG` takes precedence when it is set.
    pub level: String,
}

/// Controls the summaries handed to reporting consumers.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    /// How many tickers the compact prompt summary lists.
    pub top_n: usize,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "report.top_n must be greater than zero".to_string(),
            ));
        }
        if self.data.transactions_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "data.transactions_path must not be empty".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
