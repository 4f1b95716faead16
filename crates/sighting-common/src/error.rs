//! Error types for sighting-map services.

use thiserror::Error;

/// Result type alias using SightingError.
pub type SightingResult<T> = Result<T, SightingError>;

/// Primary error type for sighting-map operations.
#[derive(Debug, Error)]
pub enum SightingError {
    // === Request Errors ===
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    // === Data Errors ===
    #[error("Invalid row from store: {0}")]
    InvalidRow(String),

    #[error("Failed to parse record: {0}")]
    ParseError(String),

    // === Storage Errors ===
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl SightingError {
    /// Short machine-readable code used in JSON error bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            SightingError::MissingParameter(_) => "MissingParameter",
            SightingError::InvalidParameter { .. } => "InvalidParameter",
            SightingError::ModuleNotFound(_) => "ModuleNotFound",
            SightingError::DatabaseError(_) | SightingError::ServiceUnavailable(_) => {
                "StoreUnavailable"
            }
            _ => "InternalError",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            SightingError::MissingParameter(_) | SightingError::InvalidParameter { .. } => 400,

            SightingError::ModuleNotFound(_) => 404,

            SightingError::DatabaseError(_) | SightingError::ServiceUnavailable(_) => 503,

            _ => 500,
        }
    }
}

impl From<std::io::Error> for SightingError {
    fn from(err: std::io::Error) -> Self {
        SightingError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for SightingError {
    fn from(err: serde_json::Error) -> Self {
        SightingError::CacheError(format!("JSON error: {}", err))
    }
}
