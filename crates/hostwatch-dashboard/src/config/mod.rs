//! Dashboard config loader (strict YAML, then environment overlay).

pub mod schema;

use std::fs;

use hostwatch_core::error::{HostwatchError, Result};

pub use schema::{
    AzureSection, AzureTarget, DashboardConfig, IdentitySection, ServerSection, SessionSection,
};

/// Environment variable naming an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "HOSTWATCH_CONFIG";

pub fn load_from_file(path: &str) -> Result<DashboardConfig> {
    let s = read_file(path)?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<DashboardConfig> {
    let cfg = parse_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Parse without validating; used when the environment fills in the rest.
pub fn parse_str(s: &str) -> Result<DashboardConfig> {
    serde_yaml::from_str(s).map_err(|e| HostwatchError::Config(format!("invalid yaml: {e}")))
}

/// Build the process configuration: optional YAML file named by
/// `HOSTWATCH_CONFIG`, then environment variables, then validation.
pub fn load<F>(lookup: F) -> Result<DashboardConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = match lookup(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
        Some(path) => {
            tracing::info!(%path, "loading dashboard config file");
            parse_str(&read_file(&path)?)?
        }
        None => DashboardConfig::default(),
    };
    cfg.apply_env(&lookup)?;
    cfg.validate()?;
    Ok(cfg)
}

fn read_file(path: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| HostwatchError::Config(format!("read config {path} failed: {e}")))
}
