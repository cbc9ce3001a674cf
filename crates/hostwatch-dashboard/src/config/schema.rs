use std::net::SocketAddr;

use serde::Deserialize;
use url::Url;

use hostwatch_core::error::{HostwatchError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub identity: IdentitySection,

    #[serde(default)]
    pub session: SessionSection,

    #[serde(default)]
    pub azure: AzureSection,
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.identity.validate()?;
        self.session.validate()?;
        self.azure.validate()?;
        Ok(())
    }

    /// Overlay environment variables on top of file/default values.
    ///
    /// `lookup` is `std::env::var(..).ok()` in production; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("PORT") {
            self.server.port = parse_env("PORT", &v)?;
        }

        if let Some(v) = get("ENTRA_CLIENT_ID") {
            self.identity.client_id = v;
        }
        if let Some(v) = get("ENTRA_CLIENT_SECRET") {
            self.identity.client_secret = v;
        }
        if let Some(v) = get("ENTRA_TENANT_ID") {
            self.identity.tenant_id = v;
        }
        if let Some(v) = get("ENTRA_AUTHORITY_HOST") {
            self.identity.authority_host = v;
        }
        if let Some(v) = get("REDIRECT_URI") {
            self.identity.redirect_uri = v;
        }
        if let Some(v) = get("POST_LOGOUT_REDIRECT_URI") {
            self.identity.post_logout_redirect_uri = Some(v);
        }

        if let Some(v) = get("SESSION_SECRET") {
            self.session.secret = v;
        }
        if let Some(v) = get("SESSION_TTL_SECONDS") {
            self.session.ttl_secs = parse_env("SESSION_TTL_SECONDS", &v)?;
        }
        if let Some(v) = get("SESSION_COOKIE_SECURE") {
            self.session.cookie_secure = parse_flag("SESSION_COOKIE_SECURE", &v)?;
        }

        if let Some(v) = get("AZURE_METRICS_ENABLED") {
            self.azure.enabled = Some(parse_flag("AZURE_METRICS_ENABLED", &v)?);
        }
        if let Some(v) = get("AZURE_SUBSCRIPTION_ID") {
            self.azure.subscription_id = Some(v);
        }
        if let Some(v) = get("AZURE_RESOURCE_GROUP") {
            self.azure.resource_group = Some(v);
        }
        if let Some(v) = get("AZURE_CONTAINERAPP_NAME") {
            self.azure.app_name = Some(v);
        }
        if let Some(v) = get("AZURE_RESOURCE_TYPE") {
            self.azure.resource_type = v;
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, v: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    v.trim()
        .parse()
        .map_err(|e| HostwatchError::Config(format!("{key}: {e}")))
}

fn parse_flag(key: &str, v: &str) -> Result<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(HostwatchError::Config(format!("{key}: not a boolean: {other}"))),
    }
}

fn require(field: &str, v: &str) -> Result<()> {
    if v.trim().is_empty() {
        return Err(HostwatchError::Config(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_url(field: &str, v: &str) -> Result<Url> {
    Url::parse(v).map_err(|e| HostwatchError::Config(format!("{field} is not a valid URL: {e}")))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.socket_addr().map(|_| ())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| HostwatchError::Config(format!("server.host/port invalid: {e}")))
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentitySection {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    #[serde(default)]
    pub tenant_id: String,

    #[serde(default = "default_authority_host")]
    pub authority_host: String,

    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// When set, logout goes through the provider's end-session endpoint.
    #[serde(default)]
    pub post_logout_redirect_uri: Option<String>,

    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

impl Default for IdentitySection {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            tenant_id: String::new(),
            authority_host: default_authority_host(),
            redirect_uri: default_redirect_uri(),
            post_logout_redirect_uri: None,
            scopes: default_scopes(),
        }
    }
}

impl IdentitySection {
    pub fn validate(&self) -> Result<()> {
        require("identity.client_id (ENTRA_CLIENT_ID)", &self.client_id)?;
        require("identity.client_secret (ENTRA_CLIENT_SECRET)", &self.client_secret)?;
        require("identity.tenant_id (ENTRA_TENANT_ID)", &self.tenant_id)?;
        require_url("identity.authority_host", &self.authority_host)?;
        require_url("identity.redirect_uri", &self.redirect_uri)?;
        if let Some(u) = &self.post_logout_redirect_uri {
            require_url("identity.post_logout_redirect_uri", u)?;
        }
        if self.scopes.iter().all(|s| s.trim().is_empty()) {
            return Err(HostwatchError::Config("identity.scopes must not be empty".into()));
        }
        Ok(())
    }

    /// `{authority_host}/{tenant_id}`, without a trailing slash.
    pub fn authority(&self) -> String {
        format!(
            "{}/{}",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id.trim_matches('/')
        )
    }
}

fn default_authority_host() -> String {
    "https://login.microsoftonline.com".into()
}
fn default_redirect_uri() -> String {
    "http://localhost:5000/auth/callback".into()
}
fn default_scopes() -> Vec<String> {
    vec!["User.Read".into()]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSection {
    /// Cookie signing secret.
    #[serde(default)]
    pub secret: String,

    /// Idle lifetime of a server-side session.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl_secs: default_ttl_secs(),
            cookie_secure: false,
        }
    }
}

impl SessionSection {
    pub fn validate(&self) -> Result<()> {
        require("session.secret (SESSION_SECRET)", &self.secret)?;
        if !(60..=604_800).contains(&self.ttl_secs) {
            return Err(HostwatchError::Config(
                "session.ttl_secs must be between 60 and 604800".into(),
            ));
        }
        Ok(())
    }
}

fn default_ttl_secs() -> u64 {
    28_800
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AzureSection {
    /// `None` means "enabled when the resource identifiers are present".
    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub subscription_id: Option<String>,

    #[serde(default)]
    pub resource_group: Option<String>,

    #[serde(default)]
    pub app_name: Option<String>,

    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    #[serde(default = "default_management_endpoint")]
    pub management_endpoint: String,
}

impl Default for AzureSection {
    fn default() -> Self {
        Self {
            enabled: None,
            subscription_id: None,
            resource_group: None,
            app_name: None,
            resource_type: default_resource_type(),
            management_endpoint: default_management_endpoint(),
        }
    }
}

/// A fully specified remote compute resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureTarget {
    pub subscription_id: String,
    pub resource_group: String,
    pub app_name: String,
    pub resource_type: String,
}

impl AzureTarget {
    pub fn resource_id(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/{}",
            self.subscription_id,
            self.resource_group,
            self.resource_type.trim_matches('/'),
            self.app_name
        )
    }
}

impl AzureSection {
    pub fn validate(&self) -> Result<()> {
        require_url("azure.management_endpoint", &self.management_endpoint)?;
        if self.enabled == Some(true) && self.identifiers().is_none() {
            return Err(HostwatchError::Config(
                "azure metrics enabled but AZURE_SUBSCRIPTION_ID, AZURE_RESOURCE_GROUP and \
                 AZURE_CONTAINERAPP_NAME are not all set"
                    .into(),
            ));
        }
        Ok(())
    }

    /// The resource to query, or `None` when remote metrics are off.
    pub fn target(&self) -> Option<AzureTarget> {
        if self.enabled == Some(false) {
            return None;
        }
        let (subscription_id, resource_group, app_name) = self.identifiers()?;
        Some(AzureTarget {
            subscription_id,
            resource_group,
            app_name,
            resource_type: self.resource_type.clone(),
        })
    }

    fn identifiers(&self) -> Option<(String, String, String)> {
        let pick = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();
        Some((
            pick(&self.subscription_id)?,
            pick(&self.resource_group)?,
            pick(&self.app_name)?,
        ))
    }
}

fn default_resource_type() -> String {
    "Microsoft.App/containerApps".into()
}
fn default_management_endpoint() -> String {
    "https://management.azure.com".into()
}
