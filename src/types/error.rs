//! Error types for Talents
//!
//! One taxonomy for the whole service: business conditions a caller can
//! recover from, infrastructure failures surfaced as internal errors, and
//! configuration problems that stop the process before it serves.

use axum::http::StatusCode;

/// Main error type for Talents operations
#[derive(Debug, thiserror::Error)]
pub enum TalentsError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The activity code is not in the current catalog snapshot.
    #[error("Activity not found: {0}")]
    ActivityNotFound(i32),

    /// No account row exists for the given identity.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// The per-activity daily play window is exhausted. Expected, recoverable.
    #[error("Daily play limit reached")]
    LimitReached,

    /// A claim would push `claimed` past `earned`. Expected, recoverable.
    #[error("Not enough points")]
    InsufficientPoints,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Chain RPC error: {0}")]
    Chain(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TalentsError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ActivityNotFound(_) => StatusCode::NOT_FOUND,
            Self::AccountNotFound(_) => StatusCode::NOT_FOUND,
            Self::LimitReached => StatusCode::TOO_MANY_REQUESTS,
            Self::InsufficientPoints => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Chain(_) => StatusCode::BAD_GATEWAY,
            Self::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this is an expected business condition rather than a fault.
    ///
    /// Business conditions are returned to the caller as-is; everything else
    /// is reported as a generic internal error at the API boundary.
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            Self::ActivityNotFound(_)
                | Self::AccountNotFound(_)
                | Self::LimitReached
                | Self::InsufficientPoints
                | Self::BadRequest(_)
        )
    }
}

impl From<mongodb::error::Error> for TalentsError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<bson::ser::Error> for TalentsError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Database(format!("BSON encode error: {}", err))
    }
}

impl From<reqwest::Error> for TalentsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Chain(err.to_string())
    }
}

impl From<std::io::Error> for TalentsError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Result type alias for Talents operations
pub type Result<T> = std::result::Result<T, TalentsError>;
