use thiserror::Error;

/// Top-level error type for Lumina.
///
/// Subsystem crates define their own error types and convert from
/// `LuminaError` where they sit on top of the core, so `?` works across
/// crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LuminaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for LuminaError {
    fn from(err: toml::de::Error) -> Self {
        LuminaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for LuminaError {
    fn from(err: toml::ser::Error) -> Self {
        LuminaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for LuminaError {
    fn from(err: serde_json::Error) -> Self {
        LuminaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Lumina operations.
pub type Result<T> = std::result::Result<T, LuminaError>;
