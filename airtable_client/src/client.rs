use crate::error::AirtableError;
use async_trait::async_trait;
use probe_core::{ProbeEndpoint, ProbeRequest, ProbeResponse, ProbeTransport, TransportError};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Airtable API client configuration
#[derive(Debug, Clone)]
pub struct AirtableClientConfig {
    /// Airtable API base URL
    pub api_base_url: String,

    /// Request timeout in seconds; expiry classifies as network-unreachable
    pub request_timeout_seconds: u64,
}

impl Default for AirtableClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.airtable.com".to_string(),
            request_timeout_seconds: 10,
        }
    }
}

/// Airtable API client. Holds connection settings only; the access token
/// travels with each `ProbeRequest` so the client itself carries no secrets.
#[derive(Debug, Clone)]
pub struct AirtableClient {
    client: Client,
    config: AirtableClientConfig,
}

impl AirtableClient {
    pub fn new(config: AirtableClientConfig) -> Result<Self, AirtableError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AirtableClientConfig {
        &self.config
    }

    /// Build the full URL for a probe request. Path segments are added via
    /// the url crate so table names with spaces get percent-encoded.
    fn probe_url(&self, request: &ProbeRequest) -> Result<Url, AirtableError> {
        let invalid = || AirtableError::InvalidBaseUrl {
            url: self.config.api_base_url.clone(),
        };

        let mut url = Url::parse(&self.config.api_base_url).map_err(|_| invalid())?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| invalid())?;
            segments.pop_if_empty();
            match &request.endpoint {
                ProbeEndpoint::TableMetadata => {
                    segments.extend(["v0", "meta", "bases", request.base_id.as_str(), "tables"]);
                }
                ProbeEndpoint::TableRecords { table_name, .. } => {
                    segments.extend(["v0", request.base_id.as_str(), table_name.as_str()]);
                }
            }
        }

        if let ProbeEndpoint::TableRecords { view, .. } = &request.endpoint {
            url.query_pairs_mut()
                .append_pair("maxRecords", &request.max_items.to_string());
            if let Some(view) = view {
                url.query_pairs_mut().append_pair("view", view);
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl ProbeTransport for AirtableClient {
    async fn fetch(&self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError> {
        let url = self
            .probe_url(request)
            .map_err(|err| TransportError::ConnectFailed(err.to_string()))?;

        debug!("GET {}", url);
        debug!("Using token {}", token_preview(&request.access_token));

        let response = self
            .client
            .get(url.clone())
            .header(
                "Authorization",
                format!("Bearer {}", request.access_token),
            )
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        debug!("HTTP {} from {} ({} bytes)", status, url, body.len());

        Ok(ProbeResponse { status, body })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::TimedOut(err.to_string())
    } else {
        TransportError::ConnectFailed(err.to_string())
    }
}

/// Masked token for log lines; the full value never hits the logs
fn token_preview(token: &str) -> String {
    if token.len() >= 12 {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}
