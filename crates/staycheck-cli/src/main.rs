mod search;
mod verify;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use staycheck_agoda::AgodaClient;
use tracing_subscriber::EnvFilter;

use crate::search::{CitySearchArgs, StayArgs};

#[derive(Debug, Parser)]
#[command(name = "staycheck")]
#[command(about = "Check whether affiliate-linked hotel properties are still bookable")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Verify availability of one or more property ids
    Verify {
        /// Property id to verify (repeatable)
        #[arg(long = "property", required = true)]
        properties: Vec<i64>,
        /// Currency code (defaults to STAYCHECK_CURRENCY)
        #[arg(long)]
        currency: Option<String>,
        /// Number of adults (defaults to STAYCHECK_ADULTS)
        #[arg(long)]
        adults: Option<u32>,
    },
    /// Verify a JSON list of `{display_text, raw_url, property_id}` links
    VerifyLinks {
        /// Path to the JSON file
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        adults: Option<u32>,
    },
    /// Search hotels in a city
    SearchCity(CitySearchArgs),
    /// Search specific hotels by id
    SearchHotels {
        /// Hotel id to search (repeatable)
        #[arg(long = "hotel-id", required = true)]
        hotel_ids: Vec<i64>,
        #[command(flatten)]
        stay: StayArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = staycheck_core::load_app_config()?;
    config.verbose |= cli.verbose;

    let directive = log_directive(&config, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let env_filter = EnvFilter::try_new(directive)
        .or_else(|_| EnvFilter::try_new(config.effective_log_level()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = build_client(&config)?;

    match cli.command {
        Commands::Verify {
            properties,
            currency,
            adults,
        } => {
            verify::run_verify(client, &config, &properties, currency.as_deref(), adults).await
        }
        Commands::VerifyLinks {
            input,
            currency,
            adults,
        } => verify::run_verify_links(client, &config, &input, currency.as_deref(), adults).await,
        Commands::SearchCity(args) => search::run_search_city(&client, &config, &args).await,
        Commands::SearchHotels { hotel_ids, stay } => {
            search::run_search_hotels(&client, &config, hotel_ids, &stay).await
        }
    }
}

/// Filter directive for the subscriber. Verbose mode forces `debug` even
/// when `RUST_LOG` is set.
fn log_directive(config: &staycheck_core::AppConfig, rust_log: Option<String>) -> String {
    match rust_log {
        Some(directive) if !config.verbose && !directive.trim().is_empty() => directive,
        _ => config.effective_log_level().to_owned(),
    }
}

/// Builds the API client, failing before any network activity if
/// credentials are not configured.
fn build_client(config: &staycheck_core::AppConfig) -> anyhow::Result<AgodaClient> {
    let creds = config.credentials.as_ref().ok_or_else(|| {
        anyhow::anyhow!(
            "API credentials not found; set AGODA_SITE_ID and AGODA_API_KEY in the environment or .env"
        )
    })?;
    AgodaClient::new(&creds.site_id, &creds.api_key)
        .map_err(|e| anyhow::anyhow!("failed to build Agoda client: {e}"))
}
