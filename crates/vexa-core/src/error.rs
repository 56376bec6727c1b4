use thiserror::Error;

/// Top-level error type for the Vexa system.
///
/// Returned by config loading and the provider clients. The chat core
/// wraps provider failures in its own `ChatError`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VexaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    #[error("Provider HTTP error: {0}")]
    Http(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for VexaError {
    fn from(err: toml::de::Error) -> Self {
        VexaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for VexaError {
    fn from(err: toml::ser::Error) -> Self {
        VexaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for VexaError {
    fn from(err: serde_json::Error) -> Self {
        VexaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Vexa operations.
pub type Result<T> = std::result::Result<T, VexaError>;
