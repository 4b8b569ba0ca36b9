//! One scan over a discovery snapshot: fetch, filter, extract.

use crate::aggregate::{aggregate, extract_records};
use crate::dates::Window;
use crate::fetcher::fetch_all;
use crate::models::{Report, RunSummary, Sources};
use crate::scrapers::Registry;
use reqwest::Client;
use tracing::{info, instrument};

/// Fetch every mirror in `sources`, keep one active page per source, and
/// extract its records.
#[instrument(level = "info", skip_all, fields(sources = sources.len(), days = window.days()))]
pub async fn scan(client: &Client, sources: &Sources, registry: &Registry, window: &Window) -> Report {
    let results = fetch_all(client, sources, window).await;
    let summary = RunSummary::from_results(&results);

    let rows = aggregate(&results);
    info!(candidates = rows.len(), "Selected active pages");

    let records = extract_records(&rows, registry, window);
    info!(
        records = records.len(),
        attempts = summary.total_attempts,
        ok = summary.status_ok,
        "Scan complete"
    );

    Report {
        generated_at: window.now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        window_days: window.days(),
        summary,
        records,
    }
}
