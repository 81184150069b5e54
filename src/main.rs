//! Command-line front end for the resilient call layer.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller ──▶ ResilientExecutor ──▶ primary call (ApiClient GET)
//!                 │   ▲                 │
//!                 │   └── retry/backoff ┘ (timeout, classify, log)
//!                 │
//!                 ├──▶ fallback call (once)
//!                 ├──▶ bounded error log ──▶ statistics / health report
//!                 └──▶ monitoring sink (critical, production only)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use clap::{Parser, Subcommand};
use serde_json::Value;

use weather_resilience::config::{self, ResilienceConfig};
use weather_resilience::http::ApiClient;
use weather_resilience::observability::{logging, metrics};
use weather_resilience::{ErrorContext, ResilientExecutor};

#[derive(Parser)]
#[command(name = "weather-resilience")]
#[command(about = "Resilient API calls for the weather-safety dashboard", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(short, long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe capability health endpoints and print the report
    Health,
    /// GET a path through the resilient executor
    Fetch {
        /// Path relative to the base URL, e.g. /api/weather/alerts
        path: String,

        /// JSON value returned when every attempt fails
        #[arg(long)]
        fallback: Option<String>,

        #[arg(long)]
        component: Option<String>,

        #[arg(long)]
        action: Option<String>,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ResilienceConfig::default(),
    };
    if let Some(base_url) = cli.base_url {
        config = config::override_base_url(config, base_url)?;
    }

    logging::init_logging(&config.observability);
    tracing::debug!(
        mode = ?config.mode,
        base_url = %config.api.base_url,
        max_attempts = config.retries.max_attempts,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let executor = ResilientExecutor::from_config(&config)?;

    match cli.command {
        Commands::Health => {
            let report = executor.check_health().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Fetch { path, fallback, component, action } => {
            let fallback = fallback
                .map(|raw| serde_json::from_str::<Value>(&raw))
                .transpose()?;

            let mut context = ErrorContext::new().url(path.clone());
            context.component = component;
            context.action = action;

            let api = ApiClient::new(
                reqwest::Client::new(),
                config.api.base_url.parse()?,
                Duration::from_millis(config.timeouts.primary_ms),
            );
            let result = match fallback {
                Some(value) => {
                    executor
                        .execute_with_fallback(
                            || api.get_json::<Value>(&path),
                            move || async move { Ok(value) },
                            context,
                        )
                        .await
                }
                None => executor.execute(|| api.get_json::<Value>(&path), context).await,
            };

            tracing::debug!(
                statistics = %serde_json::to_string(&executor.statistics())?,
                "Call statistics"
            );

            match result {
                Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                Err(e) => {
                    eprintln!("Error [{}]: {}", e.code, e);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
