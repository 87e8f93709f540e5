//! Recommend a 5G NR configuration for one coordinate.
//!
//! Usage: nr-config --lat 48.8566 --lon 2.3522 [--json]

use anyhow::{Context, Result};
use clap::Parser;
use nr_core::Coordinate;
use nr_geodata::{
    compute_configuration, CollectorSettings, FeatureCollector, DEFAULT_ELEVATION_URL,
    DEFAULT_MOUNTAIN_PEAK_THRESHOLD, DEFAULT_OVERPASS_URL,
};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "nr-config")]
#[command(about = "Recommend a 5G NR site configuration from open map data")]
struct Args {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Search radius in km for roads, buildings and peaks
    #[arg(long, default_value_t = nr_core::DEFAULT_SEARCH_RADIUS_KM)]
    radius_km: f64,

    /// Peaks required (strictly more than) to treat the site as mountainous
    #[arg(long, default_value_t = DEFAULT_MOUNTAIN_PEAK_THRESHOLD)]
    peak_threshold: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_s: u64,

    /// Overpass interpreter URL
    #[arg(long, env = "NR_OVERPASS_URL", default_value = DEFAULT_OVERPASS_URL)]
    overpass_url: String,

    /// Elevation lookup URL
    #[arg(long, env = "NR_ELEVATION_URL", default_value = DEFAULT_ELEVATION_URL)]
    elevation_url: String,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nr_geodata=warn".parse()?),
        )
        .init();

    let args = Args::parse();
    let point = Coordinate::new(args.lat, args.lon).context("invalid coordinate")?;

    let settings = CollectorSettings {
        overpass_url: args.overpass_url,
        elevation_url: args.elevation_url,
        search_radius_km: args.radius_km,
        mountain_peak_threshold: args.peak_threshold,
        request_timeout: Duration::from_secs(args.timeout_s.max(1)),
        ..CollectorSettings::default()
    };
    let collector = FeatureCollector::new(settings);

    tracing::debug!("Collecting features around {}", point);
    let report = compute_configuration(&collector, point).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", nr_cli::render_summary(&report));
    }

    Ok(())
}
