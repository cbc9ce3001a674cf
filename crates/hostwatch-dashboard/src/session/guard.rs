//! Login guard for protected routes.
//!
//! Layered with `route_layer(from_fn_with_state(..))` in front of every
//! protected handler. A request with a logged-in session proceeds with the
//! `UserIdentity` in its extensions; anything else is redirected to `/login`
//! after remembering where it was going.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::app_state::AppState;

use super::Session;

pub const LOGIN_PATH: &str = "/login";

pub async fn require_login(
    State(app): State<AppState>,
    jar: SignedCookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let mut session = Session::load(app.sessions(), &jar);

    if let Some(user) = session.user().cloned() {
        req.extensions_mut().insert(user);
        return next.run(req).await;
    }

    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    tracing::debug!(%target, "unauthenticated request; redirecting to login");

    session.data.post_login_redirect = Some(target);
    let jar = session.save(app.sessions(), jar, app.cfg().session.cookie_secure);
    (jar, Redirect::to(LOGIN_PATH)).into_response()
}
