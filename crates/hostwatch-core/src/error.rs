//! Shared error type across hostwatch crates.

use thiserror::Error;

/// Stable error codes (used in logs and HTTP responses).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid input from the caller.
    BadRequest,
    /// Invalid or incomplete configuration.
    Config,
    /// The identity provider rejected or aborted the login.
    LoginFailed,
    /// The identity provider could not be reached or answered garbage.
    IdentityProvider,
    /// The remote monitoring API failed.
    RemoteMetrics,
    /// Reading or writing persisted data failed.
    Storage,
    /// Internal server error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and JSON bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Config => "CONFIG",
            ErrorCode::LoginFailed => "LOGIN_FAILED",
            ErrorCode::IdentityProvider => "IDENTITY_PROVIDER",
            ErrorCode::RemoteMetrics => "REMOTE_METRICS",
            ErrorCode::Storage => "STORAGE",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, HostwatchError>;

/// Unified error type used by core, dashboard, and collector.
#[derive(Debug, Error)]
pub enum HostwatchError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("config: {0}")]
    Config(String),
    /// `error` is the OAuth error code, `description` the human-readable text.
    #[error("login failed: {description}")]
    LoginFailed { error: String, description: String },
    #[error("identity provider: {0}")]
    IdentityProvider(String),
    #[error("remote metrics: {0}")]
    RemoteMetrics(String),
    #[error("storage: {0}")]
    Storage(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl HostwatchError {
    /// Map internal error to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            HostwatchError::BadRequest(_) => ErrorCode::BadRequest,
            HostwatchError::Config(_) => ErrorCode::Config,
            HostwatchError::LoginFailed { .. } => ErrorCode::LoginFailed,
            HostwatchError::IdentityProvider(_) => ErrorCode::IdentityProvider,
            HostwatchError::RemoteMetrics(_) => ErrorCode::RemoteMetrics,
            HostwatchError::Storage(_) => ErrorCode::Storage,
            HostwatchError::Internal(_) => ErrorCode::Internal,
        }
    }

    pub fn login_failed(error: impl Into<String>, description: impl Into<String>) -> Self {
        HostwatchError::LoginFailed {
            error: error.into(),
            description: description.into(),
        }
    }
}
