//! Protected dashboard handlers. Both sit behind `session::require_login`,
//! which puts the `UserIdentity` into request extensions.

pub mod view;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Json},
    Extension,
};

use crate::app_state::AppState;
use crate::auth::UserIdentity;

/// `GET /`
pub async fn dashboard(
    State(app): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> impl IntoResponse {
    let snapshot = app.metrics().snapshot().await;
    Html(view::render_dashboard(&user, &snapshot))
}

/// `GET /api/metrics`
pub async fn api_metrics(State(app): State<AppState>) -> impl IntoResponse {
    Json(app.metrics().snapshot().await)
}
