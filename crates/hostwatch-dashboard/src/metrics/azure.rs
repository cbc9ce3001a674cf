//! Azure Monitor source for a container app's CPU and memory.
//!
//! Authenticates as the service principal (client-credentials grant) and
//! reads `CpuUsage` / `MemoryWorkingSet` averages at one-minute granularity
//! over the trailing ten minutes.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use url::Url;

use hostwatch_core::error::{HostwatchError, Result};

use crate::config::{AzureSection, AzureTarget, IdentitySection};

use super::{RemoteMetricsSource, RemoteUsage};

const API_VERSION: &str = "2018-01-01";
const CPU_METRIC: &str = "CpuUsage";
const MEMORY_METRIC: &str = "MemoryWorkingSet";
const GRANULARITY: &str = "PT1M";
const LOOKBACK_MINUTES: i64 = 10;
/// Refresh the access token this long before it expires.
const TOKEN_SKEW: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Response of `GET {resource}/providers/Microsoft.Insights/metrics`.
#[derive(Debug, Default, Deserialize)]
pub struct MetricsResponse {
    #[serde(default)]
    pub value: Vec<MetricSeries>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MetricSeries {
    #[serde(default)]
    pub timeseries: Vec<TimeSeries>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimeSeries {
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DataPoint {
    #[serde(rename = "timeStamp", default)]
    pub time_stamp: Option<String>,
    #[serde(default)]
    pub average: Option<f64>,
}

impl MetricsResponse {
    /// Most recent data point of the first series that carries an average.
    pub fn latest_average(&self) -> Option<f64> {
        self.value
            .first()?
            .timeseries
            .first()?
            .data
            .iter()
            .rev()
            .find_map(|p| p.average)
    }
}

pub struct AzureMonitorSource {
    http: Client,
    token_url: Url,
    client_id: String,
    client_secret: String,
    scope: String,
    metrics_url: Url,
    resource_id: String,
    token: Mutex<Option<CachedToken>>,
}

impl AzureMonitorSource {
    pub fn new(identity: &IdentitySection, azure: &AzureSection, target: &AzureTarget) -> Result<Self> {
        let authority = identity.authority();
        let token_url = Url::parse(&format!("{authority}/oauth2/v2.0/token"))
            .map_err(|e| HostwatchError::Config(format!("bad authority {authority}: {e}")))?;

        let management = azure.management_endpoint.trim_end_matches('/');
        let resource_id = target.resource_id();
        let metrics_url = Url::parse(&format!(
            "{management}{resource_id}/providers/Microsoft.Insights/metrics"
        ))
        .map_err(|e| HostwatchError::Config(format!("bad azure resource url: {e}")))?;

        let http = Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| HostwatchError::Internal(format!("build http client failed: {e}")))?;

        Ok(Self {
            http,
            token_url,
            client_id: identity.client_id.clone(),
            client_secret: identity.client_secret.clone(),
            scope: format!("{management}/.default"),
            metrics_url,
            resource_id,
            token: Mutex::new(None),
        })
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(t) = cached.as_ref() {
            if Instant::now() < t.refresh_at {
                return Ok(t.value.clone());
            }
        }

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];
        let response = self
            .http
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| HostwatchError::RemoteMetrics(format!("token request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HostwatchError::RemoteMetrics(format!("read token response failed: {e}")))?;
        if !status.is_success() {
            return Err(HostwatchError::RemoteMetrics(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: AccessTokenResponse = serde_json::from_str(&body)
            .map_err(|e| HostwatchError::RemoteMetrics(format!("invalid token response: {e}")))?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_SKEW);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    async fn query(&self, token: &str, metric: &str) -> Result<MetricsResponse> {
        let end = Utc::now();
        let start = end - chrono::Duration::minutes(LOOKBACK_MINUTES);
        let timespan = format!(
            "{}/{}",
            start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end.to_rfc3339_opts(SecondsFormat::Secs, true)
        );

        let response = self
            .http
            .get(self.metrics_url.clone())
            .bearer_auth(token)
            .query(&[
                ("api-version", API_VERSION),
                ("timespan", timespan.as_str()),
                ("interval", GRANULARITY),
                ("metricnames", metric),
                ("aggregation", "Average"),
            ])
            .send()
            .await
            .map_err(|e| HostwatchError::RemoteMetrics(format!("{metric} query failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HostwatchError::RemoteMetrics(format!("read {metric} response failed: {e}")))?;
        if !status.is_success() {
            return Err(HostwatchError::RemoteMetrics(format!(
                "{metric} query returned {status}: {body}"
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| HostwatchError::RemoteMetrics(format!("invalid {metric} response: {e}")))
    }
}

#[async_trait]
impl RemoteMetricsSource for AzureMonitorSource {
    fn name(&self) -> &str {
        "azure-monitor"
    }

    async fn fetch(&self) -> Result<RemoteUsage> {
        let token = self.access_token().await?;
        let (cpu, memory) = tokio::try_join!(
            self.query(&token, CPU_METRIC),
            self.query(&token, MEMORY_METRIC)
        )?;

        let no_data = |metric: &str| {
            HostwatchError::RemoteMetrics(format!(
                "no {metric} data points in the last {LOOKBACK_MINUTES} minutes"
            ))
        };
        Ok(RemoteUsage {
            cpu: cpu.latest_average().ok_or_else(|| no_data(CPU_METRIC))?,
            memory_bytes: memory.latest_average().ok_or_else(|| no_data(MEMORY_METRIC))?,
        })
    }
}
