use crate::probe::ProbeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to access weight store {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Weight store {} is not valid: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field_type} not found")]
    ElementNotFound { field_type: String },

    #[error("Probe adapter failed: {0}")]
    Adapter(#[source] ProbeError),

    #[error("Invalid fallback table: {0}")]
    InvalidFallback(String),
}

impl Error {
    /// True when every learned and fallback selector was exhausted
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ElementNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
