mod report;

use airtable_client::{AirtableClient, AirtableClientConfig};
use anyhow::Result;
use config_manager::{SystemConfig, ENDPOINT_TABLE_RECORDS};
use probe_core::{Credentials, DiagnosticRunner, ProbeEndpoint};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Airtable Connectivity Diagnostic ===");

    let config = SystemConfig::load()?;
    debug!("Configuration loaded");

    if config.system.debug_mode {
        println!("Probe endpoint:  {}", config.probe.endpoint);
        println!("API base URL:    {}", config.airtable.api_base_url);
        println!("Request timeout: {}s", config.airtable.request_timeout_seconds);
    }

    let credentials = Credentials::new(
        config.airtable.personal_access_token.clone(),
        config.airtable.base_id.clone(),
    );
    print!("{}", report::render_preflight(&credentials));

    let endpoint = if config.probe.endpoint == ENDPOINT_TABLE_RECORDS {
        ProbeEndpoint::TableRecords {
            table_name: config.probe.target_table_name.clone(),
            view: config.probe.view.clone(),
        }
    } else {
        ProbeEndpoint::TableMetadata
    };

    let client = AirtableClient::new(AirtableClientConfig {
        api_base_url: config.airtable.api_base_url.clone(),
        request_timeout_seconds: config.airtable.request_timeout_seconds,
    })?;

    let runner = DiagnosticRunner::new(client, endpoint).with_max_items(config.probe.max_items);

    println!();
    println!("Probing {}...", runner.endpoint().describe());
    let result = runner.run(&credentials).await;

    print!(
        "{}",
        report::render_result(&result, &config.probe.target_table_name)
    );

    if !result.is_success() {
        std::process::exit(report::exit_code(&result));
    }

    Ok(())
}
