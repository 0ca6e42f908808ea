use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DataSettings, LoggingSettings, ReportSettings};

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads the application configuration from `config.toml` in the working
/// directory.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Loads and validates the configuration from the given TOML file.
///
/// Every key has a default, so a file only needs to list what it overrides;
/// a missing file is still an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .set_default("data.transactions_path", "data/transactions.csv")?
        .set_default("logging.level", "info")?
        .set_default("report.top_n", 5)?
        .add_source(config::File::from(path).format(config::FileFormat::Toml))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}
