use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use hostwatch_core::error::{HostwatchError, Result};

/// Logged-in principal as kept in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIdentity {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
}

/// The ID-token claims this service reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdTokenClaims {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub oid: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub nonce: Option<String>,
}

/// Decode an ID token received directly from the token endpoint.
///
/// The token arrives over the back channel from the provider itself, so its
/// signature is not re-verified here; `nonce` binding is checked by the
/// caller.
pub fn decode_id_token(token: &str) -> Result<IdTokenClaims> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<IdTokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| HostwatchError::login_failed("invalid_id_token", format!("cannot decode ID token: {e}")))
}

impl IdTokenClaims {
    /// Name falls back to the username and vice versa; a token carrying
    /// neither cannot identify the user.
    pub fn into_identity(self) -> Result<UserIdentity> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let name = non_empty(self.name);
        let email = non_empty(self.preferred_username).or_else(|| non_empty(self.email));
        let subject = non_empty(self.oid).or_else(|| non_empty(self.sub));

        match (name, email) {
            (Some(name), Some(email)) => Ok(UserIdentity { name, email, subject }),
            (Some(name), None) => Ok(UserIdentity {
                email: name.clone(),
                name,
                subject,
            }),
            (None, Some(email)) => Ok(UserIdentity {
                name: email.clone(),
                email,
                subject,
            }),
            (None, None) => Err(HostwatchError::login_failed(
                "invalid_id_token",
                "ID token carries neither a name nor a username",
            )),
        }
    }
}
