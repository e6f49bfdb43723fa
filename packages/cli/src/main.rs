#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line explorer for the crash map dashboard.
//!
//! `summarize` replays a chain of filters and prints the resulting
//! publication as JSON. `explore` (the default) opens a menu loop where
//! each pick narrows the working set and redraws the summaries.

mod interactive;
mod views;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use crash_map_dashboard::{Dashboard, DashboardConfig, Filter, ViewConsumer};
use crash_map_ingest::{LoadedInputs, load_inputs};

#[derive(Parser)]
#[command(name = "crash_map_cli", about = "Cross-filtering explorer for motor vehicle collisions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Input resources and configuration shared by every command.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Crash records CSV
    #[arg(long)]
    pub records: PathBuf,
    /// Borough boundaries `GeoJSON`
    #[arg(long)]
    pub boundaries: PathBuf,
    /// Dashboard config TOML (overrides `CRASH_MAP_CONFIG` env var)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply filters and print the final summaries as JSON
    Summarize {
        #[command(flatten)]
        inputs: InputArgs,
        /// Filter to apply, as facet=value (borough, factor, vehicle, hour).
        /// Repeat to chain filters in order.
        #[arg(long = "filter", value_name = "FACET=VALUE")]
        filters: Vec<Filter>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Explore the data interactively
    Explore {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(None).await;
    };

    match command {
        Commands::Summarize {
            inputs,
            filters,
            pretty,
        } => summarize(&inputs, filters, pretty).await?,
        Commands::Explore { inputs } => interactive::run(Some(inputs)).await?,
    }

    Ok(())
}

/// Loads both inputs and returns a dashboard that has already published
/// its unfiltered state to `views`.
///
/// # Errors
///
/// Returns an error if the config or either input cannot be loaded.
pub async fn open_dashboard(
    inputs: &InputArgs,
    views: Vec<Box<dyn ViewConsumer>>,
) -> Result<Dashboard, Box<dyn std::error::Error>> {
    let config = DashboardConfig::resolve(inputs.config.as_deref())?;

    let LoadedInputs {
        records,
        boundaries,
    } = load_inputs(&inputs.records, &inputs.boundaries)
        .await
        .inspect_err(|e| log::error!("Failed to load inputs: {e}"))?;

    let mut dashboard = Dashboard::new(config);
    for view in views {
        dashboard.register(view);
    }
    dashboard.load(records, boundaries);

    Ok(dashboard)
}

async fn summarize(
    inputs: &InputArgs,
    filters: Vec<Filter>,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut dashboard = open_dashboard(inputs, Vec::new()).await?;

    for filter in filters {
        dashboard.apply(filter);
    }

    let publication = dashboard.snapshot();
    let json = if pretty {
        serde_json::to_string_pretty(&publication)?
    } else {
        serde_json::to_string(&publication)?
    };
    println!("{json}");

    Ok(())
}
