use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Missing required columns: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("Failed to open transaction file '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV input: {0}")]
    Csv(#[from] csv::Error),
}
