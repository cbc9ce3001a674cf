//! Authorization-code flow state (with PKCE and nonce).

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use url::Url;

use crate::session::random_token;

/// OIDC scopes always requested next to the configured resource scopes.
pub const RESERVED_SCOPES: [&str; 3] = ["openid", "profile", "offline_access"];

/// Pending login, stored in the session between `/login` and the callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFlow {
    pub state: String,
    pub nonce: String,
    pub code_verifier: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    /// Fully built authorization URL the browser is sent to.
    pub auth_uri: String,
}

impl AuthFlow {
    pub fn initiate(
        authorize_endpoint: &Url,
        client_id: &str,
        redirect_uri: &str,
        scopes: &[String],
    ) -> Self {
        let state = random_token(16);
        let nonce = random_token(16);
        let code_verifier = random_token(32);
        let scopes = effective_scopes(scopes);

        let mut url = authorize_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client_id", client_id)
            .append_pair("response_type", "code")
            .append_pair("response_mode", "query")
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("scope", &scopes.join(" "))
            .append_pair("state", &state)
            .append_pair("nonce", &nonce)
            .append_pair("code_challenge", &pkce_challenge(&code_verifier))
            .append_pair("code_challenge_method", "S256");

        Self {
            state,
            nonce,
            code_verifier,
            redirect_uri: redirect_uri.to_string(),
            scopes,
            auth_uri: url.into(),
        }
    }
}

/// Reserved OIDC scopes first, then configured ones, without duplicates.
pub fn effective_scopes(configured: &[String]) -> Vec<String> {
    let mut out: Vec<String> = RESERVED_SCOPES.iter().map(|s| s.to_string()).collect();
    for s in configured {
        let s = s.trim();
        if !s.is_empty() && !out.iter().any(|o| o == s) {
            out.push(s.to_string());
        }
    }
    out
}

/// RFC 7636 S256 challenge.
pub fn pkce_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Query parameters the provider appends to the redirect URI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}
