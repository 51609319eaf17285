use crate::endpoint::ProbeEndpoint;
use async_trait::async_trait;
use thiserror::Error;

/// Everything a transport needs to issue the one probe request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    /// Which listing endpoint to hit
    pub endpoint: ProbeEndpoint,

    /// Base to probe
    pub base_id: String,

    /// Bearer token for the Authorization header
    pub access_token: String,

    /// Page-size cap, applied where the endpoint accepts one
    pub max_items: u32,
}

/// Raw HTTP outcome of a probe request. The body is kept as text so the
/// endpoint policy can parse it (or extract a server error message from it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

impl ProbeResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failure: no HTTP response was received at all
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    ConnectFailed(String),

    #[error("request timed out: {0}")]
    TimedOut(String),
}

/// The single seam between the diagnostic logic and the network. The real
/// implementation lives in `airtable_client`; tests substitute a stub.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    /// Issue exactly one read-only GET for the given request
    async fn fetch(&self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError>;
}
