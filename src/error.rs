use thiserror::Error;

/// Custom error type for verisift operations.
#[derive(Debug, Error)]
pub enum SiftError {
    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading or writing a report artifact failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Input validation failed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The vector clustering strategy failed to partition the claims.
    #[error("Clustering error: {message}")]
    Clustering {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Vectorization produced no usable terms.
    #[error("Vocabulary is empty after document-frequency filtering ({documents} documents)")]
    EmptyVocabulary { documents: usize },
}

impl SiftError {
    /// Clustering failure without an underlying source error.
    pub fn clustering(message: impl Into<String>) -> Self {
        SiftError::Clustering {
            message: message.into(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for SiftError {
    fn from(err: serde_json::Error) -> Self {
        SiftError::Serialization(format!("JSON serialization error: {}", err))
    }
}

impl From<std::io::Error> for SiftError {
    fn from(err: std::io::Error) -> Self {
        SiftError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for SiftError {
    fn from(err: toml::de::Error) -> Self {
        SiftError::Config(format!("TOML parse error: {}", err))
    }
}
