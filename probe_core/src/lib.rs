pub mod endpoint;
pub mod lookup;
pub mod runner;
pub mod transport;

// Re-export the types callers assemble a probe from
pub use endpoint::{extract_error_message, PayloadError, ProbeEndpoint};
pub use lookup::find_named_item;
pub use runner::{DiagnosticRunner, DEFAULT_MAX_ITEMS};
pub use transport::{ProbeRequest, ProbeResponse, ProbeTransport, TransportError};

use serde::{Deserialize, Serialize};

/// Credential pair required for any probe. Both values are sourced externally
/// (environment or config file) and passed in explicitly so the runner never
/// touches process state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Airtable personal access token
    pub personal_access_token: String,

    /// Airtable base ID
    pub base_id: String,
}

impl Credentials {
    pub fn new(personal_access_token: impl Into<String>, base_id: impl Into<String>) -> Self {
        Self {
            personal_access_token: personal_access_token.into(),
            base_id: base_id.into(),
        }
    }

    /// A whitespace-only token can never authenticate, so it counts as missing
    pub fn has_token(&self) -> bool {
        !self.personal_access_token.trim().is_empty()
    }

    pub fn has_base_id(&self) -> bool {
        !self.base_id.trim().is_empty()
    }

    /// Shape summary of the credentials, safe to print
    pub fn diagnostics(&self) -> CredentialDiagnostics {
        let token = self.personal_access_token.trim();
        CredentialDiagnostics {
            token_present: self.has_token(),
            token_length: token.len(),
            token_has_pat_prefix: token.starts_with("pat"),
            base_id_present: self.has_base_id(),
        }
    }

    /// Masked token preview for logs and reports. The full token is never
    /// rendered anywhere.
    pub fn masked_token(&self) -> String {
        let token = self.personal_access_token.trim();
        if token.is_empty() {
            "<not set>".to_string()
        } else if token.len() >= 12 {
            format!("{}...{}", &token[..4], &token[token.len() - 4..])
        } else {
            "***".to_string()
        }
    }
}

/// Shape summary of a credential pair: everything the preflight report needs,
/// nothing sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialDiagnostics {
    pub token_present: bool,
    pub token_length: usize,
    pub token_has_pat_prefix: bool,
    pub base_id_present: bool,
}

/// Minimal projection of a listed resource (a table, or a record)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Display name
    pub name: String,

    /// Stable identifier (`tblXXX` for tables, `recXXX` for records)
    pub id: String,
}

/// Classified probe failure cause
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorClassification {
    MissingToken,
    MissingResourceId,
    Unauthorized,
    Forbidden,
    NotFound,
    NetworkUnreachable,
    Unknown,
}

impl ErrorClassification {
    /// Map an HTTP status to a classification. Only statuses the original
    /// diagnostics distinguish get their own variant.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorClassification::Unauthorized,
            403 => ErrorClassification::Forbidden,
            404 => ErrorClassification::NotFound,
            _ => ErrorClassification::Unknown,
        }
    }

    /// Fixed remediation hints rendered under a failure report
    pub fn remediation_hints(&self) -> &'static [&'static str] {
        match self {
            ErrorClassification::MissingToken => &[
                "Generate a new personal access token in Airtable",
                "Copy the entire token",
                "Paste it into .env as AIRTABLE_PERSONAL_ACCESS_TOKEN",
                "Ensure no extra spaces",
            ],
            ErrorClassification::MissingResourceId => &[
                "Open your Airtable base",
                "Check the URL for the base ID (the app... segment)",
                "Add it to .env as AIRTABLE_BASE_ID",
            ],
            ErrorClassification::Unauthorized => &[
                "Token may be invalid",
                "Token may have expired",
                "Token may be missing the required scopes",
            ],
            ErrorClassification::Forbidden => &[
                "The base may not be shared with this account",
                "The token may lack permission for this base",
            ],
            ErrorClassification::NotFound => &[
                "Verify the base ID is correct",
                "The base may have been deleted",
                "Confirm the target table exists in this base",
            ],
            ErrorClassification::NetworkUnreachable => &[
                "Check your network connection",
                "Verify DNS resolution for api.airtable.com",
                "Check proxy or firewall settings",
            ],
            ErrorClassification::Unknown => &[
                "Regenerate the personal access token",
                "Verify the base ID",
                "Check Airtable account permissions",
                "Ensure the correct account is used",
            ],
        }
    }
}

impl std::fmt::Display for ErrorClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorClassification::MissingToken => "missing access token",
            ErrorClassification::MissingResourceId => "missing base ID",
            ErrorClassification::Unauthorized => "authentication failed",
            ErrorClassification::Forbidden => "access forbidden",
            ErrorClassification::NotFound => "base or table not found",
            ErrorClassification::NetworkUnreachable => "network unreachable",
            ErrorClassification::Unknown => "unknown error",
        };
        write!(f, "{}", label)
    }
}

/// Outcome of a single probe. Anticipated failures are data, never errors
/// propagated out of the runner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProbeResult {
    Success {
        /// Listed resources, in response order
        items: Vec<Item>,
    },
    Failure {
        classification: ErrorClassification,
        http_status: Option<u16>,
        raw_message: Option<String>,
    },
}

impl ProbeResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeResult::Success { .. })
    }

    /// The failure classification, if this is a failure
    pub fn classification(&self) -> Option<ErrorClassification> {
        match self {
            ProbeResult::Success { .. } => None,
            ProbeResult::Failure { classification, .. } => Some(*classification),
        }
    }
}
