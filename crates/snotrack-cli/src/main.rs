//! snotrack - elevation lookups against the MapQuest profile service.
//!
//! Usage:
//!   snotrack elevation --coords "39.61,-106.55;39.62,-106.56"
//!   snotrack elevation --input coords.json
//!   snotrack enrich --input hydrants.json

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snotrack_cli::input::{coords_from_json, hydrants_from_json};
use snotrack_cli::{parse_coords, Config, HydrantRecord};
use snotrack_elevation::{enrich_hydrants, ElevationResolver, MapquestClient};

#[derive(Parser, Debug)]
#[command(author, version, about = "SnoTrack elevation tools")]
struct Args {
    /// Elevation profile endpoint [env: SNOTRACK_ELEVATION_URL]
    #[arg(long, global = true)]
    url: Option<String>,

    /// MapQuest API key [env: SNOTRACK_MAPQUEST_KEY]
    #[arg(long, global = true)]
    key: Option<String>,

    /// Request timeout in seconds [env: SNOTRACK_ELEVATION_TIMEOUT_S]
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print elevations for a list of coordinates
    Elevation {
        /// Semicolon-separated `lat,lon` pairs
        #[arg(long, conflicts_with = "input")]
        coords: Option<String>,

        /// JSON file holding an array of [lat, lon] pairs
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Fill in elevations for a hydrant file and print the result
    Enrich {
        /// JSON file holding an array of hydrants
        #[arg(long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("snotrack=info".parse()?))
        .init();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(url) = args.url {
        config.elevation_url = url;
    }
    if let Some(key) = args.key {
        config.mapquest_key = Some(key);
    }
    if let Some(timeout) = args.timeout {
        config.elevation_timeout = Duration::from_secs(timeout);
    }

    let client = MapquestClient::new(
        config.elevation_url.clone(),
        config.mapquest_key.clone(),
        config.elevation_timeout,
    )?;
    if client.base_url() == snotrack_elevation::client::DEFAULT_ELEVATION_URL
        && config.mapquest_key.is_none()
    {
        tracing::warn!("No MapQuest key configured; the public endpoint will reject requests");
    }
    let resolver = ElevationResolver::new(client);

    match args.command {
        Command::Elevation { coords, input } => {
            let coords = match (coords, input) {
                (Some(text), _) => parse_coords(&text)?,
                (None, Some(path)) => coords_from_json(&read(&path)?)?,
                (None, None) => bail!("pass --coords or --input"),
            };
            tracing::info!("Resolving {} coordinates", coords.len());
            let samples = resolver.try_resolve(&coords).await?;
            println!("{}", serde_json::to_string_pretty(&samples)?);
        }
        Command::Enrich { input } => {
            let mut hydrants = hydrants_from_json(&read(&input)?)?;
            let known = enrich_hydrants(&resolver, &mut hydrants).await;
            tracing::info!("Resolved {}/{} hydrant elevations", known, hydrants.len());
            let records: Vec<HydrantRecord> = hydrants.iter().map(HydrantRecord::from).collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }

    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
