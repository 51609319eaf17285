use crate::endpoint::{extract_error_message, ProbeEndpoint};
use crate::transport::{ProbeRequest, ProbeTransport};
use crate::{Credentials, ErrorClassification, ProbeResult};
use tracing::{debug, warn};

/// Default page-size cap: diagnostics should be cheap
pub const DEFAULT_MAX_ITEMS: u32 = 5;

/// Single-shot connectivity diagnostic: validate credentials, issue exactly
/// one read-only request, classify the outcome. Never retries; the first
/// failure is the result.
pub struct DiagnosticRunner<T> {
    transport: T,
    endpoint: ProbeEndpoint,
    max_items: u32,
}

impl<T: ProbeTransport> DiagnosticRunner<T> {
    pub fn new(transport: T, endpoint: ProbeEndpoint) -> Self {
        Self {
            transport,
            endpoint,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }

    pub fn with_max_items(mut self, max_items: u32) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn endpoint(&self) -> &ProbeEndpoint {
        &self.endpoint
    }

    /// Run the probe. Anticipated failures come back as classified data;
    /// this never panics and never performs more than one network call.
    pub async fn run(&self, credentials: &Credentials) -> ProbeResult {
        if !credentials.has_token() {
            warn!("Probe aborted before any network call: access token missing");
            return ProbeResult::Failure {
                classification: ErrorClassification::MissingToken,
                http_status: None,
                raw_message: None,
            };
        }

        if !credentials.has_base_id() {
            warn!("Probe aborted before any network call: base ID missing");
            return ProbeResult::Failure {
                classification: ErrorClassification::MissingResourceId,
                http_status: None,
                raw_message: None,
            };
        }

        let request = ProbeRequest {
            endpoint: self.endpoint.clone(),
            base_id: credentials.base_id.clone(),
            access_token: credentials.personal_access_token.clone(),
            max_items: self.max_items,
        };

        debug!("Probing {}", self.endpoint.describe());
        let response = match self.transport.fetch(&request).await {
            Ok(response) => response,
            Err(err) => {
                warn!("Probe transport failed: {}", err);
                return ProbeResult::Failure {
                    classification: ErrorClassification::NetworkUnreachable,
                    http_status: None,
                    raw_message: Some(err.to_string()),
                };
            }
        };

        if response.is_success() {
            match self.endpoint.parse_items(&response.body) {
                Ok(items) => {
                    debug!("Probe succeeded with {} items", items.len());
                    ProbeResult::Success { items }
                }
                Err(err) => {
                    warn!("Probe got HTTP {} but an unreadable body", response.status);
                    ProbeResult::Failure {
                        classification: ErrorClassification::Unknown,
                        http_status: Some(response.status),
                        raw_message: Some(format!("malformed response body: {}", err)),
                    }
                }
            }
        } else {
            let classification = ErrorClassification::from_status(response.status);
            warn!("Probe failed: HTTP {} ({})", response.status, classification);
            ProbeResult::Failure {
                classification,
                http_status: Some(response.status),
                raw_message: extract_error_message(&response.body),
            }
        }
    }
}
