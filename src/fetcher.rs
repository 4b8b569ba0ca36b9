//! Mirror fetching and activity detection.
//!
//! Every mirror of every source gets exactly one GET, strictly in snapshot
//! order. A 200 response is kept along with the recent dates found in its
//! text; any other status is recorded as-is, and transport failures are
//! recorded as [`FetchStatus::Error`]. Nothing is retried.

use crate::dates::{find_recent_dates, Window};
use crate::models::{FetchResult, FetchStatus, Sources};
use futures::stream::{self, StreamExt};
use reqwest::{Client, Proxy};
use scraper::Html;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Per-request timeout for discovery and mirror fetches.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// SOCKS endpoint used to reach mirrors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    /// `socks5h` so that hostnames are resolved by the proxy, which onion
    /// mirrors require.
    pub fn url(&self) -> String {
        format!("socks5h://{}:{}", self.host, self.port)
    }
}

/// Build an HTTP client with the fixed timeout, optionally routed through a proxy.
pub fn build_client(proxy: Option<&ProxyConfig>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().timeout(REQUEST_TIMEOUT);
    if let Some(proxy) = proxy {
        builder = builder.proxy(Proxy::all(proxy.url())?);
    }
    builder.build()
}

/// Text content of an HTML document with markup stripped.
///
/// Non-HTML bodies (JSON feeds) come back essentially unchanged.
pub fn page_text(body: &str) -> String {
    Html::parse_document(body).root_element().text().collect()
}

/// Fetch every mirror of every source, one at a time.
///
/// Each mirror gets a single GET. A 200 body is scanned for dates inside
/// `window`; other statuses and transport failures are recorded without a
/// body. A failing mirror never stops the remaining ones.
///
/// # Arguments
///
/// * `client` - HTTP client, proxied or not (see [`build_client`])
/// * `sources` - Discovery snapshot naming every mirror to visit
/// * `window` - Recency window the page dates are checked against
///
/// # Returns
///
/// One [`FetchResult`] per `(source, mirror)` pair, in source order and then
/// mirror order.
#[instrument(level = "info", skip_all, fields(sources = sources.len(), days = window.days()))]
pub async fn fetch_all(client: &Client, sources: &Sources, window: &Window) -> Vec<FetchResult> {
    let pairs = sources.iter().flat_map(|(name, links)| {
        links
            .mirror_links
            .iter()
            .map(move |mirror| (name.as_str(), mirror.as_str()))
    });

    let results: Vec<FetchResult> = stream::iter(pairs)
        .then(|(name, mirror)| fetch_mirror(client, name, mirror, window))
        .collect()
        .await;

    info!(
        attempts = results.len(),
        ok = results.iter().filter(|r| r.status.is_ok()).count(),
        active = results.iter().filter(|r| r.is_active() == Some(true)).count(),
        "Fetched mirrors"
    );
    results
}

/// Fetch one mirror and classify it.
#[instrument(level = "debug", skip(client, window))]
pub async fn fetch_mirror(
    client: &Client,
    source_name: &str,
    mirror_link: &str,
    window: &Window,
) -> FetchResult {
    let response = match client.get(mirror_link).send().await {
        Ok(response) => response,
        Err(e) => {
            error!(source = source_name, url = mirror_link, error = %e, "Mirror request failed");
            return FetchResult::failed(source_name, mirror_link);
        }
    };

    let code = response.status().as_u16();
    if code != 200 {
        warn!(source = source_name, url = mirror_link, status = code, "Mirror answered without content");
        return FetchResult {
            source_name: source_name.to_string(),
            mirror_link: mirror_link.to_string(),
            status: FetchStatus::Code(code),
            body: None,
            matched_dates: Vec::new(),
        };
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            error!(source = source_name, url = mirror_link, error = %e, "Failed reading mirror body");
            return FetchResult::failed(source_name, mirror_link);
        }
    };

    let matched_dates = find_recent_dates(&page_text(&body), window);
    let result = FetchResult {
        source_name: source_name.to_string(),
        mirror_link: mirror_link.to_string(),
        status: FetchStatus::Code(code),
        body: Some(body),
        matched_dates,
    };
    info!(
        source = source_name,
        url = mirror_link,
        recent_dates = result.match_count(),
        "Fetched mirror"
    );
    debug!(dates = ?result.matched_dates, "Recent dates on mirror");
    result
}
