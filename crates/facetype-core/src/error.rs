use thiserror::Error;

/// Top-level error type for the Facetype system.
///
/// Nothing in the gesture or vocabulary engine is fatal. These errors only
/// cross the fallible edges (config file, calibration blob, dictionary file,
/// key-value store) and are recovered by the caller that owns the default.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FacetypeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Calibration error: {0}")]
    Calibration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Dictionary error: {0}")]
    Dictionary(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for FacetypeError {
    fn from(err: toml::de::Error) -> Self {
        FacetypeError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for FacetypeError {
    fn from(err: toml::ser::Error) -> Self {
        FacetypeError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for FacetypeError {
    fn from(err: serde_json::Error) -> Self {
        FacetypeError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Facetype operations.
pub type Result<T> = std::result::Result<T, FacetypeError>;
