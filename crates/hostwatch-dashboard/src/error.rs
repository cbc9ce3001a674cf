//! HTTP mapping for `HostwatchError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use hostwatch_core::HostwatchError;

/// Handler error; renders as a short `text/plain` body.
#[derive(Debug)]
pub struct AppError(pub HostwatchError);

impl From<HostwatchError> for AppError {
    fn from(e: HostwatchError) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.0.code().as_str();
        let (status, body) = match &self.0 {
            HostwatchError::LoginFailed { error, description } => {
                tracing::warn!(code, %error, %description, "login failed");
                (StatusCode::BAD_REQUEST, format!("Login failed: {description}"))
            }
            HostwatchError::BadRequest(msg) => {
                tracing::warn!(code, %msg, "bad request");
                (StatusCode::BAD_REQUEST, format!("Bad request: {msg}"))
            }
            HostwatchError::IdentityProvider(msg) => {
                tracing::error!(code, %msg, "identity provider failure");
                (
                    StatusCode::BAD_GATEWAY,
                    format!("Login failed: identity provider error: {msg}"),
                )
            }
            other => {
                tracing::error!(code, error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        (status, body).into_response()
    }
}
