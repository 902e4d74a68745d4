use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use disasterwatch::{
    AppContext, DisasterWatchConfig, EvacuationRequest, Location, PredictionRequest, logging, web,
};

/// Disaster risk prediction and evacuation planning
#[derive(Parser, Debug)]
#[command(name = "disasterwatch")]
#[command(author, version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Port to listen on, overriding the config
        #[arg(long)]
        port: Option<u16>,
    },

    /// Predict the risk of one disaster type at a location
    Predict {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// earthquake, flood, wildfire or hurricane
        #[arg(long)]
        disaster: String,
        /// Forecast window in days
        #[arg(long)]
        days: Option<u32>,
    },

    /// Find the nearest shelters outside the disaster radius
    Evacuate {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long)]
        disaster: String,
        /// Exclusion radius in kilometres
        #[arg(long)]
        radius: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = DisasterWatchConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    let _guard = logging::init(&config.logging, cli.verbose)?;

    let context = AppContext::from_config(&config).context("Failed to initialise DisasterWatch")?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            web::run(&config.server, &context).await?;
        }
        Commands::Predict {
            lat,
            lon,
            disaster,
            days,
        } => {
            let request = PredictionRequest::new(
                Location::new(lat, lon),
                disaster,
                days.unwrap_or(context.default_time_window),
            );
            print_json(&context.orchestrator().predict(&request)?)?;
        }
        Commands::Evacuate {
            lat,
            lon,
            disaster,
            radius,
        } => {
            let request = EvacuationRequest::new(Location::new(lat, lon), disaster, radius);
            print_json(&context.planner().plan(&request)?)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
