//! One-shot country lookup from the command line.
//!
//! Loads the border dataset, resolves a single coordinate and prints the
//! result as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gazetteer::config::Config;
use gazetteer::{BorderDataset, Coordinate, DatasetSource, PointResolver, Resolution};

#[derive(Parser, Debug)]
#[command(name = "lookup")]
#[command(about = "Resolve a coordinate to the country containing it")]
struct Args {
    /// Latitude
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,

    /// Border dataset path or URL (overrides config)
    #[arg(short, long)]
    dataset: Option<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let output = run(&args).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Load the dataset and resolve the requested coordinate.
///
/// Fails only when the dataset cannot be loaded; a miss is still a result.
async fn run(args: &Args) -> Result<Value> {
    let config = Config::load_or_default(args.config.as_ref())?;

    let source = match &args.dataset {
        Some(dataset) => DatasetSource::parse(dataset),
        None => config.dataset_source(),
    };

    let dataset = BorderDataset::load(&source, &config.code_overrides())
        .await
        .context("Border dataset unavailable")?;
    let resolver = PointResolver::new(Arc::new(dataset));

    Ok(render(resolver.resolve(Coordinate::new(args.lng, args.lat))))
}

fn render(resolution: Resolution<'_>) -> Value {
    match resolution {
        Resolution::Match(feature) => json!({
            "status": "match",
            "country": feature.summary(),
        }),
        Resolution::NoMatch => json!({ "status": "no_match" }),
        Resolution::NotReady => json!({ "status": "not_ready" }),
    }
}
