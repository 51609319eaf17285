use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] ConfigError),
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// Probe endpoint selectors accepted in `probe.endpoint`
pub const ENDPOINT_TABLE_METADATA: &str = "table-metadata";
pub const ENDPOINT_TABLE_RECORDS: &str = "table-records";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// General system settings
    pub system: SystemSettings,

    /// Airtable API credentials and connection settings
    pub airtable: AirtableConfig,

    /// Probe behavior settings
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSettings {
    /// Enable debug mode (more verbose report output)
    pub debug_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirtableConfig {
    /// Airtable personal access token
    pub personal_access_token: String,

    /// Airtable base ID (the `appXXXXXXXXXXXXXX` value from the base URL)
    pub base_id: String,

    /// Airtable API base URL
    pub api_base_url: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Which endpoint to probe: "table-metadata" or "table-records"
    pub endpoint: String,

    /// Table name to look up in the probe results (and to read when
    /// probing the record-listing endpoint)
    pub target_table_name: String,

    /// View name passed to the record-listing endpoint, if any
    pub view: Option<String>,

    /// Page-size cap for endpoints that accept one
    pub max_items: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            system: SystemSettings { debug_mode: false },
            airtable: AirtableConfig {
                personal_access_token: "".to_string(), // Must be set in .env or config file
                base_id: "".to_string(),               // Must be set in .env or config file
                api_base_url: "https://api.airtable.com".to_string(),
                request_timeout_seconds: 10,
            },
            probe: ProbeConfig {
                endpoint: ENDPOINT_TABLE_METADATA.to_string(),
                target_table_name: "Content Pipeline".to_string(),
                view: Some("Grid view".to_string()),
                max_items: 5,
            },
        }
    }
}

impl AirtableConfig {
    /// Validate connection settings. Credential presence is deliberately not
    /// checked here: a missing token or base ID is a diagnostic outcome the
    /// probe reports, not a reason to refuse to run.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(ConfigurationError::InvalidValue(
                "Airtable API base URL is required".to_string(),
            ));
        }

        if self.request_timeout_seconds == 0 {
            return Err(ConfigurationError::InvalidValue(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl ProbeConfig {
    /// Validate probe settings
    pub fn validate(&self) -> Result<()> {
        match self.endpoint.as_str() {
            ENDPOINT_TABLE_METADATA | ENDPOINT_TABLE_RECORDS => {}
            other => {
                return Err(ConfigurationError::InvalidValue(format!(
                    "Unknown probe endpoint: '{}' (expected '{}' or '{}')",
                    other, ENDPOINT_TABLE_METADATA, ENDPOINT_TABLE_RECORDS
                )));
            }
        }

        if self.target_table_name.trim().is_empty() {
            return Err(ConfigurationError::InvalidValue(
                "Target table name is required".to_string(),
            ));
        }

        if self.max_items == 0 {
            return Err(ConfigurationError::InvalidValue(
                "max_items must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl SystemConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let mut config_builder = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&SystemConfig::default())?);

        // Add config file if it exists
        if config_path.as_ref().exists() {
            info!(
                "Loading configuration from: {}",
                config_path.as_ref().display()
            );
            config_builder = config_builder.add_source(File::from(config_path.as_ref()));
        } else {
            debug!("Config file not found, using defaults and environment variables");
        }

        // Add environment variables with prefix, e.g.
        // DOCTOR__AIRTABLE__PERSONAL_ACCESS_TOKEN
        config_builder = config_builder.add_source(
            Environment::with_prefix("DOCTOR")
                .try_parsing(true)
                .separator("__"),
        );

        let config = config_builder.build()?;
        let mut system_config: SystemConfig = config.try_deserialize()?;

        // The original debug scripts read these two variables directly; honor
        // them as overrides so existing .env files keep working.
        apply_credential_overrides(
            &mut system_config,
            std::env::var("AIRTABLE_PERSONAL_ACCESS_TOKEN").ok(),
            std::env::var("AIRTABLE_BASE_ID").ok(),
        );

        system_config.validate()?;

        Ok(system_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.airtable.validate()?;
        self.probe.validate()?;
        Ok(())
    }
}

/// Apply the legacy flat environment variable names on top of a loaded
/// configuration. Empty values are ignored so a blank line in .env does not
/// clobber a value set through the prefixed variables.
pub fn apply_credential_overrides(
    config: &mut SystemConfig,
    token: Option<String>,
    base_id: Option<String>,
) {
    if let Some(token) = token {
        if !token.is_empty() {
            debug!("Using AIRTABLE_PERSONAL_ACCESS_TOKEN from environment");
            config.airtable.personal_access_token = token;
        }
    }

    if let Some(base_id) = base_id {
        if !base_id.is_empty() {
            debug!("Using AIRTABLE_BASE_ID from environment");
            config.airtable.base_id = base_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_structurally_valid() {
        let config = SystemConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.probe.endpoint, ENDPOINT_TABLE_METADATA);
        assert_eq!(config.probe.target_table_name, "Content Pipeline");
        assert_eq!(config.probe.max_items, 5);
        assert_eq!(config.airtable.request_timeout_seconds, 10);
    }

    #[test]
    fn default_config_has_empty_credentials() {
        // Credentials come from the environment; the probe classifies their
        // absence instead of config validation rejecting it.
        let config = SystemConfig::default();
        assert!(config.airtable.personal_access_token.is_empty());
        assert!(config.airtable.base_id.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let mut config = SystemConfig::default();
        config.probe.endpoint = "base-schema".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = SystemConfig::default();
        config.airtable.request_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_max_items_is_rejected() {
        let mut config = SystemConfig::default();
        config.probe.max_items = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_target_table_name_is_rejected() {
        let mut config = SystemConfig::default();
        config.probe.target_table_name = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn legacy_env_names_override_credentials() {
        let mut config = SystemConfig::default();
        apply_credential_overrides(
            &mut config,
            Some("pat_legacy_token".to_string()),
            Some("appLEGACY123".to_string()),
        );
        assert_eq!(config.airtable.personal_access_token, "pat_legacy_token");
        assert_eq!(config.airtable.base_id, "appLEGACY123");
    }

    #[test]
    fn empty_legacy_values_do_not_clobber() {
        let mut config = SystemConfig::default();
        config.airtable.personal_access_token = "pat_existing".to_string();
        config.airtable.base_id = "appEXISTING".to_string();
        apply_credential_overrides(&mut config, Some("".to_string()), None);
        assert_eq!(config.airtable.personal_access_token, "pat_existing");
        assert_eq!(config.airtable.base_id, "appEXISTING");
    }
}
