//! Identity provider seam.
//!
//! `EntraProvider` talks to Microsoft Entra ID (v2.0 endpoints); tests plug in
//! their own `IdentityProvider`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use hostwatch_core::error::{HostwatchError, Result};

use crate::config::IdentitySection;

/// Token endpoint answer. Error answers carry `error`/`error_description`
/// instead of tokens.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Inputs of an authorization-code redemption.
#[derive(Debug, Clone, Copy)]
pub struct CodeRedemption<'a> {
    pub code: &'a str,
    pub redirect_uri: &'a str,
    pub code_verifier: &'a str,
    pub scopes: &'a [String],
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn client_id(&self) -> &str;

    fn authorize_endpoint(&self) -> &Url;

    /// `None` when the provider has no end-session endpoint.
    fn end_session_endpoint(&self) -> Option<&Url>;

    /// Exchange an authorization code for tokens.
    ///
    /// Transport failures are `Err`; protocol errors come back as a
    /// `TokenResponse` with `error` set.
    async fn redeem_code(&self, req: CodeRedemption<'_>) -> Result<TokenResponse>;
}

pub struct EntraProvider {
    http: Client,
    client_id: String,
    client_secret: String,
    authorize: Url,
    token: Url,
    end_session: Url,
}

impl EntraProvider {
    pub fn from_config(cfg: &IdentitySection) -> Result<Self> {
        let authority = cfg.authority();
        let endpoint = |suffix: &str| {
            Url::parse(&format!("{authority}/oauth2/v2.0/{suffix}"))
                .map_err(|e| HostwatchError::Config(format!("bad authority {authority}: {e}")))
        };

        let http = Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| HostwatchError::Internal(format!("build http client failed: {e}")))?;

        Ok(Self {
            http,
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
            authorize: endpoint("authorize")?,
            token: endpoint("token")?,
            end_session: endpoint("logout")?,
        })
    }
}

#[async_trait]
impl IdentityProvider for EntraProvider {
    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn authorize_endpoint(&self) -> &Url {
        &self.authorize
    }

    fn end_session_endpoint(&self) -> Option<&Url> {
        Some(&self.end_session)
    }

    async fn redeem_code(&self, req: CodeRedemption<'_>) -> Result<TokenResponse> {
        let scope = req.scopes.join(" ");
        let form = [
            ("grant_type", "authorization_code"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", req.code),
            ("redirect_uri", req.redirect_uri),
            ("code_verifier", req.code_verifier),
            ("scope", scope.as_str()),
        ];

        let response = self
            .http
            .post(self.token.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| HostwatchError::IdentityProvider(format!("token request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HostwatchError::IdentityProvider(format!("read token response failed: {e}")))?;

        match serde_json::from_str::<TokenResponse>(&body) {
            Ok(tokens) => {
                if !status.is_success() && tokens.error.is_none() {
                    return Err(HostwatchError::IdentityProvider(format!(
                        "token endpoint returned {status}"
                    )));
                }
                Ok(tokens)
            }
            Err(e) => Err(HostwatchError::IdentityProvider(format!(
                "token endpoint returned {status} with unreadable body: {e}"
            ))),
        }
    }
}
