use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;

use stacmap_config::{Settings, check};

const DEFAULT_PROBE_ZOOM: u32 = 10;

#[derive(Parser)]
#[command(
    name = "stacmap-config",
    about = "Inspect and verify stacmap runtime settings"
)]
struct Cli {
    /// JSON settings file overriding the baked-in defaults
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective settings as JSON
    Show {
        /// Single-line output instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Load and validate settings, reporting the first problem found
    Validate,

    /// Probe the configured STAC API and tile endpoints
    Check {
        /// Zoom level for the probe tiles
        #[arg(short, long, default_value_t = DEFAULT_PROBE_ZOOM)]
        zoom: u32,
    },
}

fn build_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent("stacmap-config/0.1")
        .build()?)
}

/// Effective settings plus the derived per-worker budget, for display.
fn render_settings(settings: &Settings) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(settings)?;
    value["worker_memory"] = json!(settings.worker_memory());
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::effective(cli.settings.as_deref())?;

    match cli.command {
        Commands::Show { compact } => {
            let value = render_settings(&settings)?;
            if compact {
                println!("{}", serde_json::to_string(&value)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
        }

        Commands::Validate => {
            // Settings::effective already validated; report the summary.
            eprintln!(
                "Settings OK: {} workers x {} GiB ({} GiB total), STAC at {}",
                settings.n_workers,
                settings.worker_memory(),
                settings.memory,
                settings.stac_api_url,
            );
        }

        Commands::Check { zoom } => {
            let client = build_client()?;
            check::run(&client, &settings, zoom).await?;
        }
    }

    Ok(())
}
