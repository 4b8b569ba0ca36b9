//! # ransomscraper
//!
//! Tracks a fixed set of leak sites: discovers which of their mirrors are
//! online, checks which mirrors show activity inside a trailing window of
//! days, and extracts structured posts from the sources whose page layout is
//! known.
//!
//! ## Usage
//!
//! ```sh
//! ransomscraper --base-url https://listing.example --days 7 \
//!     --proxy-host 127.0.0.1 --proxy-port 9050
//! ```
//!
//! ## Architecture
//!
//! The run is a strictly sequential pipeline:
//! 1. **Discovery**: read the listing, collect online mirrors per source, save a snapshot
//! 2. **Fetching**: GET every mirror once and look for recent dates in the text
//! 3. **Aggregation**: keep one active page per source
//! 4. **Extraction**: run the source's extractor over that page
//! 5. **Output**: write the records and fetch summary for the report side

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod aggregate;
mod cli;
mod dates;
mod discovery;
mod fetcher;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use dates::Window;
use fetcher::build_client;
use outputs::json;
use scrapers::Registry;
use utils::ensure_parent_writable;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = dotenvy::dotenv();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("ransomscraper starting up");

    let args = Cli::parse();
    debug!(?args.base_url, days = args.days, %args.sources_file, %args.output, "Parsed CLI arguments");

    for path in [&args.sources_file, &args.output] {
        if let Err(e) = ensure_parent_writable(path).await {
            error!(%path, error = %e, "Output location is not writable");
            return Err(e);
        }
    }

    let window = Window::trailing_days(args.days);
    info!(days = args.days, since = %window.start(), "Recency window");

    // ---- Discovery ----
    match args.base_url.as_deref() {
        Some(base_url) => {
            let client = build_client(None)?;
            let sources = discovery::discover(&client, base_url).await;
            json::write_sources(&sources, &args.sources_file).await?;
        }
        None => {
            error!(snapshot = %args.sources_file, "BASE_URL not set; reusing the existing source snapshot");
        }
    }

    // ---- Fetch, aggregate, extract ----
    let sources = json::read_sources(&args.sources_file).await?;
    let proxy = args.proxy();
    if let Some(proxy) = &proxy {
        info!(proxy = %proxy.url(), "Routing mirror fetches through proxy");
    }
    let client = build_client(proxy.as_ref())?;
    let registry = Registry::default();
    debug!(extractors = ?registry.names(), "Registered extractors");

    let report = pipeline::scan(&client, &sources, &registry, &window).await;

    // ---- Output ----
    json::write_report(&report, &args.output).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        records = report.records.len(),
        attempts = report.summary.total_attempts,
        ok = report.summary.status_ok,
        "Execution complete"
    );

    Ok(())
}
