use thiserror::Error;

/// Main error type for the attendant registry
#[derive(Error, Debug)]
pub enum RegistryError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Submission workflow errors
    #[error("Identifier acquisition failed: {0}")]
    IdentifierAcquisition(String),

    #[error("Remote write failed: {0}")]
    RemoteWrite(String),

    #[error("A submission is already in progress")]
    Busy,

    // Local cache errors
    #[error("Cache contents unreadable: {0}")]
    CacheParse(String),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // Remote service errors outside the submission path
    #[error("Remote service error: {0}")]
    Remote(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for RegistryError
pub type Result<T> = std::result::Result<T, RegistryError>;

impl RegistryError {
    /// The message without the variant prefix, for re-wrapping
    fn detail(self) -> String {
        match self {
            Self::IdentifierAcquisition(m)
            | Self::RemoteWrite(m)
            | Self::CacheParse(m)
            | Self::Validation(m)
            | Self::Remote(m)
            | Self::Internal(m) => m,
            other => other.to_string(),
        }
    }

    /// Re-tag any failure while obtaining an identifier
    pub fn into_identifier_failure(self) -> Self {
        Self::IdentifierAcquisition(self.detail())
    }

    /// Re-tag any failure while writing the record remotely
    pub fn into_write_failure(self) -> Self {
        Self::RemoteWrite(self.detail())
    }
}
