//! Veo CLI
//!
//! Command-line interface for generating videos with Vertex AI Veo.

mod commands;
mod config;
mod output;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "veo")]
#[command(about = "Vertex AI Veo video generation CLI", long_about = None)]
struct Cli {
    /// Google Cloud project ID (falls back to GOOGLE_CLOUD_PROJECT)
    #[arg(long, global = true, env = "VEO_PROJECT_ID")]
    project: Option<String>,

    /// Vertex AI region (default: us-central1)
    #[arg(long, global = true, env = "VEO_LOCATION")]
    location: Option<String>,

    /// Veo model identifier (default: veo-3.0-generate-preview)
    #[arg(long, global = true, env = "VEO_MODEL_ID")]
    model: Option<String>,

    /// API root override, e.g. a local test server
    #[arg(long, global = true, env = "VEO_ENDPOINT")]
    endpoint: Option<String>,

    /// OAuth access token
    #[arg(long, global = true, env = "GOOGLE_CLOUD_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Seconds between two status checks (default: 5)
    #[arg(long, global = true, env = "VEO_POLL_INTERVAL")]
    poll_interval: Option<u64>,

    /// Seconds to keep polling before giving up (default: 300)
    #[arg(long, global = true, env = "VEO_MAX_WAIT")]
    max_wait: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veo_cli=warn,veo_jobs=warn,veo_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // clap already folded the VEO_* variables into the flags; `from_env` only
    // adds the GOOGLE_CLOUD_PROJECT fallback
    let mut jobs = match cli.project {
        Some(project_id) => veo_jobs::Config::new(project_id),
        None => veo_jobs::Config::from_env().context("No project configured: pass --project")?,
    };

    if let Some(location) = cli.location {
        jobs.location = location;
    }

    if let Some(model_id) = cli.model {
        jobs.model_id = model_id;
    }

    if let Some(endpoint) = cli.endpoint {
        jobs.endpoint = Some(endpoint);
    }

    if let Some(secs) = cli.poll_interval {
        jobs.polling.poll_interval = Duration::from_secs(secs);
    }

    if let Some(secs) = cli.max_wait {
        jobs.polling.max_wait = Duration::from_secs(secs);
    }

    let config = Config {
        jobs,
        access_token: cli.access_token,
    };
    config.jobs.validate()?;

    debug!(
        project = %config.jobs.project_id,
        location = %config.jobs.location,
        model = %config.jobs.model_id,
        "Loaded configuration"
    );

    handle_command(cli.command, &config).await
}
