use thiserror::Error;

/// Main error type for the tracker
#[derive(Error, Debug)]
pub enum HowlerError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // A required top-level field was absent from a provider payload
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    // Chat sink errors — logged and swallowed at the notifier
    #[error("Notification failed: {0}")]
    Notification(String),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl HowlerError {
    /// Failures that mean "the provider has nothing for us right now".
    /// The poller treats these as a no-op tick rather than an error.
    pub fn is_transient_source(&self) -> bool {
        matches!(
            self,
            HowlerError::Http(_) | HowlerError::MalformedPayload(_)
        )
    }
}

/// Result type alias for HowlerError
pub type Result<T> = std::result::Result<T, HowlerError>;
