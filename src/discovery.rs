//! Discovery of tracked sources and their online mirrors.
//!
//! The listing page is a set of table rows. A row whose first `td` is the
//! online marker names a source in its `th` link; that link (appended to the
//! base URL as-is) is the source's detail page. Each detail page is another
//! table where a row with the marker in its second cell carries a mirror URL
//! inside a `code` element of its first cell.

use crate::models::{SourceLinks, Sources};
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::{debug, error, info, instrument};

/// Status glyph the listing site uses for "online".
pub const ONLINE_MARKER: &str = "🟢";

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid selector"));
static HEADER: Lazy<Selector> = Lazy::new(|| Selector::parse("th").expect("valid selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid selector"));
static CODE: Lazy<Selector> = Lazy::new(|| Selector::parse("code").expect("valid selector"));

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Discover online sources and their online mirrors.
///
/// Loads the listing at `base_url`, keeps the rows marked online, then loads
/// each source's detail page in listing order and collects its online mirror
/// URLs. Requests go out one at a time.
///
/// # Arguments
///
/// * `client` - HTTP client used for the listing and every detail page
/// * `base_url` - Listing page URL; detail links are appended to it verbatim
///
/// # Returns
///
/// A [`Sources`] map in listing order. A failure loading the listing is
/// logged and yields an empty map. A failure loading one detail page is
/// logged and leaves that source with no mirrors.
#[instrument(level = "info", skip(client))]
pub async fn discover(client: &Client, base_url: &str) -> Sources {
    let listing = match fetch_page(client, base_url).await {
        Ok(html) => html,
        Err(e) => {
            error!(url = base_url, error = %e, "Failed to load source listing");
            return Sources::new();
        }
    };

    let mut sources = parse_listing(&listing, base_url);
    info!(count = sources.len(), "Indexed online sources");

    for (name, links) in sources.iter_mut() {
        debug!(source = %name, detail = %links.detail_link, "Loading detail page");
        match fetch_page(client, &links.detail_link).await {
            Ok(html) => {
                links.mirror_links = parse_mirrors(&html);
                info!(source = %name, mirrors = links.mirror_links.len(), "Collected online mirrors");
            }
            Err(e) => {
                error!(source = %name, url = %links.detail_link, error = %e, "Failed to load detail page");
            }
        }
    }

    sources
}

async fn fetch_page(client: &Client, url: &str) -> Result<String, Box<dyn Error>> {
    let body = client.get(url).send().await?.error_for_status()?.text().await?;
    Ok(body)
}

/// Collect online sources from the listing page.
///
/// A repeated name keeps its first position but takes the later detail link.
pub fn parse_listing(html: &str, base_url: &str) -> Sources {
    let document = Html::parse_document(html);
    let mut sources = Sources::new();

    for row in document.select(&ROW) {
        let online = row
            .select(&CELL)
            .next()
            .is_some_and(|cell| text_of(cell) == ONLINE_MARKER);
        if !online {
            continue;
        }
        let Some(header) = row.select(&HEADER).next() else {
            continue;
        };
        let Some(anchor) = header.select(&ANCHOR).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let name = text_of(anchor).trim().to_string();
        sources.insert(
            name,
            SourceLinks {
                detail_link: format!("{base_url}{href}"),
                mirror_links: Vec::new(),
            },
        );
    }

    sources
}

/// Collect online mirror URLs from a detail page, in row order.
pub fn parse_mirrors(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut mirrors = Vec::new();

    for row in document.select(&ROW) {
        let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
        if cells.len() < 2 || text_of(cells[1]) != ONLINE_MARKER {
            continue;
        }
        if let Some(code) = cells[0].select(&CODE).next() {
            let link = text_of(code).trim().to_string();
            debug!(%link, "Online mirror");
            mirrors.push(link);
        }
    }

    mirrors
}
