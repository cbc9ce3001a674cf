#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;
use url::Url;

use hostwatch_core::error::{HostwatchError, Result};
use hostwatch_dashboard::{
    app_state::AppState,
    auth::{CodeRedemption, IdentityProvider, TokenResponse},
    config::{self, DashboardConfig},
    metrics::{RemoteMetricsSource, RemoteUsage},
    router,
};

pub const BASE_YAML: &str = r#"
identity:
  client_id: "client-123"
  client_secret: "shh"
  tenant_id: "tenant-abc"
  post_logout_redirect_uri: "http://localhost:5000/"
session:
  secret: "integration-test-secret"
"#;

pub fn config() -> DashboardConfig {
    config::load_from_str(BASE_YAML).unwrap()
}

/// Fake provider. Codes of the form `nonce:<nonce>` redeem to an ID token for
/// Ada carrying that nonce; `bad-code` redeems to an `invalid_grant` error.
pub struct FakeIdp {
    authorize: Url,
    end_session: Url,
}

impl FakeIdp {
    pub fn new() -> Self {
        Self {
            authorize: Url::parse("https://idp.test/tenant-abc/oauth2/v2.0/authorize").unwrap(),
            end_session: Url::parse("https://idp.test/tenant-abc/oauth2/v2.0/logout").unwrap(),
        }
    }
}

pub fn mint_id_token(claims: serde_json::Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"fake-idp-signing-key"),
    )
    .unwrap()
}

#[async_trait]
impl IdentityProvider for FakeIdp {
    fn client_id(&self) -> &str {
        "client-123"
    }

    fn authorize_endpoint(&self) -> &Url {
        &self.authorize
    }

    fn end_session_endpoint(&self) -> Option<&Url> {
        Some(&self.end_session)
    }

    async fn redeem_code(&self, req: CodeRedemption<'_>) -> Result<TokenResponse> {
        assert!(!req.code_verifier.is_empty());
        if req.code == "bad-code" {
            return Ok(TokenResponse {
                error: Some("invalid_grant".into()),
                error_description: Some("AADSTS70008: the code has expired".into()),
                ..Default::default()
            });
        }
        if req.code == "unreachable" {
            return Err(HostwatchError::IdentityProvider("connection refused".into()));
        }
        let nonce = req.code.strip_prefix("nonce:").unwrap_or_default();
        Ok(TokenResponse {
            id_token: Some(mint_id_token(serde_json::json!({
                "name": "Ada <Lovelace>",
                "preferred_username": "ada@example.com",
                "oid": "oid-1",
                "nonce": nonce,
            }))),
            access_token: Some("at".into()),
            ..Default::default()
        })
    }
}

pub struct FailingRemote;

#[async_trait]
impl RemoteMetricsSource for FailingRemote {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch(&self) -> Result<RemoteUsage> {
        Err(HostwatchError::RemoteMetrics("token request failed: 401 Unauthorized".into()))
    }
}

pub struct FixedRemote(pub RemoteUsage);

#[async_trait]
impl RemoteMetricsSource for FixedRemote {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn fetch(&self) -> Result<RemoteUsage> {
        Ok(self.0)
    }
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

pub fn app_with(cfg: DashboardConfig, remote: Option<Arc<dyn RemoteMetricsSource>>) -> TestApp {
    let state = AppState::new(cfg, Arc::new(FakeIdp::new()), remote).unwrap();
    let router = router::build_router(state.clone());
    TestApp { state, router }
}

pub fn app() -> TestApp {
    app_with(config(), None)
}

impl TestApp {
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut req = Request::builder().uri(uri);
        if let Some(c) = cookie {
            req = req.header(header::COOKIE, c);
        }
        self.router
            .clone()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Run the full login dance starting from `start` (a protected path).
    /// Returns the logged-in cookie and the post-login redirect target.
    pub async fn login_via(&self, start: &str) -> (String, String) {
        let resp = self.get(start, None).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let cookie = session_cookie(&resp).unwrap();

        let (cookie, state, nonce) = self.begin_login(Some(&cookie)).await;
        let resp = self
            .get(
                &format!("/auth/callback?code=nonce:{nonce}&state={state}"),
                Some(&cookie),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let cookie = session_cookie(&resp).unwrap();
        (cookie, location(&resp))
    }

    /// `GET /login`; returns (cookie, state, nonce) from the authorize redirect.
    pub async fn begin_login(&self, cookie: Option<&str>) -> (String, String, String) {
        let resp = self.get("/login", cookie).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let cookie = session_cookie(&resp).unwrap();
        let q = query_of(&location(&resp));
        (cookie, q["state"].clone(), q["nonce"].clone())
    }
}

pub fn location(resp: &Response<Body>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

/// `name=value` of the session cookie set by the response, if any.
pub fn session_cookie(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| v.starts_with("hostwatch_session="))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
        .next()
}

pub fn query_of(url: &str) -> HashMap<String, String> {
    Url::parse(url).unwrap().query_pairs().into_owned().collect()
}

pub async fn body_string(resp: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
