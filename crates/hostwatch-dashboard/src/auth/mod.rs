//! Login, callback, and logout.
//!
//! The whole OAuth2/OIDC authorization-code exchange is delegated to an
//! `IdentityProvider`; this module only moves flow state in and out of the
//! session and turns the outcome into redirects or a 400.

pub mod claims;
pub mod flow;
pub mod provider;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use url::Url;

use hostwatch_core::error::{HostwatchError, Result};

use crate::app_state::AppState;
use crate::error::AppError;
use crate::session::{guard::LOGIN_PATH, Session};

pub use claims::{decode_id_token, IdTokenClaims, UserIdentity};
pub use flow::{AuthFlow, CallbackParams};
pub use provider::{CodeRedemption, EntraProvider, IdentityProvider, TokenResponse};

/// Where a login without a remembered destination lands.
pub const DEFAULT_LANDING: &str = "/";

/// `GET /login`: start a flow and send the browser to the provider.
pub async fn login(State(app): State<AppState>, jar: SignedCookieJar) -> Response {
    let mut session = Session::load(app.sessions(), &jar);
    let flow = initiate_login(&app);
    let target = flow.auth_uri.clone();

    session.data.flow = Some(flow);
    let jar = session.save(app.sessions(), jar, app.cfg().session.cookie_secure);
    (jar, Redirect::to(&target)).into_response()
}

pub fn initiate_login(app: &AppState) -> AuthFlow {
    let idp = app.identity();
    let cfg = &app.cfg().identity;
    AuthFlow::initiate(
        idp.authorize_endpoint(),
        idp.client_id(),
        &cfg.redirect_uri,
        &cfg.scopes,
    )
}

/// `GET /auth/callback`: finish the flow.
///
/// On any failure the session is left exactly as it was.
pub async fn callback(
    State(app): State<AppState>,
    jar: SignedCookieJar,
    Query(params): Query<CallbackParams>,
) -> std::result::Result<Response, AppError> {
    let mut session = Session::load(app.sessions(), &jar);
    let Some(flow) = session.data.flow.clone() else {
        tracing::debug!("callback without a pending flow; restarting login");
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    let user = complete_login(app.identity(), &flow, &params).await?;
    tracing::info!(user = %user.email, "login completed");

    let destination = session
        .data
        .post_login_redirect
        .take()
        .filter(|p| is_local_path(p))
        .unwrap_or_else(|| DEFAULT_LANDING.to_string());

    session.data.flow = None;
    session.data.user = Some(user);
    session.cycle_id(app.sessions());
    let jar = session.save(app.sessions(), jar, app.cfg().session.cookie_secure);
    Ok((jar, Redirect::to(&destination)).into_response())
}

/// Validate the provider's redirect and redeem the code for an identity.
pub async fn complete_login(
    idp: &dyn IdentityProvider,
    flow: &AuthFlow,
    params: &CallbackParams,
) -> Result<UserIdentity> {
    if let Some(error) = &params.error {
        let description = params
            .error_description
            .clone()
            .unwrap_or_else(|| error.clone());
        return Err(HostwatchError::login_failed(error.clone(), description));
    }

    if params.state.as_deref() != Some(flow.state.as_str()) {
        return Err(HostwatchError::login_failed(
            "state_mismatch",
            "state parameter does not match the pending login",
        ));
    }

    let code = params
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| HostwatchError::login_failed("missing_code", "no authorization code in callback"))?;

    let tokens = idp
        .redeem_code(CodeRedemption {
            code,
            redirect_uri: &flow.redirect_uri,
            code_verifier: &flow.code_verifier,
            scopes: &flow.scopes,
        })
        .await?;

    if let Some(error) = tokens.error {
        let description = tokens.error_description.unwrap_or_else(|| error.clone());
        return Err(HostwatchError::login_failed(error, description));
    }

    let id_token = tokens
        .id_token
        .ok_or_else(|| HostwatchError::login_failed("missing_id_token", "token response has no ID token"))?;
    let claims = decode_id_token(&id_token)?;

    if claims.nonce.as_deref() != Some(flow.nonce.as_str()) {
        return Err(HostwatchError::login_failed(
            "nonce_mismatch",
            "ID token nonce does not match the pending login",
        ));
    }

    claims.into_identity()
}

/// `GET /logout`: drop the session, then leave through the provider's
/// end-session endpoint when a post-logout target is configured.
pub async fn logout(State(app): State<AppState>, jar: SignedCookieJar) -> Response {
    let session = Session::load(app.sessions(), &jar);
    if let Some(user) = session.user() {
        tracing::info!(user = %user.email, "logout");
    }
    let jar = session.destroy(app.sessions(), jar);

    let target = app
        .cfg()
        .identity
        .post_logout_redirect_uri
        .as_deref()
        .and_then(|post| end_session_url(app.identity().end_session_endpoint()?, post))
        .unwrap_or_else(|| DEFAULT_LANDING.to_string());

    (jar, Redirect::to(&target)).into_response()
}

fn end_session_url(endpoint: &Url, post_logout_redirect: &str) -> Option<String> {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("post_logout_redirect_uri", post_logout_redirect);
    Some(url.into())
}

/// Only same-origin paths are honoured as post-login destinations.
fn is_local_path(p: &str) -> bool {
    p.starts_with('/') && !p.starts_with("//") && !p.starts_with("/\\")
}
