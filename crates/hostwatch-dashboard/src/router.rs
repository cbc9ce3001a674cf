//! Axum router wiring.
//!
//! Protected: `/`, `/api/metrics` (behind `require_login`).
//! Public: `/login`, `/auth/callback`, `/logout`, `/healthz`.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, auth, ops, session, web};

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(web::dashboard))
        .route("/api/metrics", get(web::api_metrics))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::require_login,
        ));

    Router::new()
        .merge(protected)
        .route("/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/logout", get(auth::logout))
        .route("/healthz", get(ops::healthz))
        .layer(middleware::from_fn(ops::log_request))
        .with_state(state)
}
