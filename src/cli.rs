//! Command-line interface definitions for ransomscraper.
//!
//! Every option can also come from the environment (or a `.env` file, which
//! is loaded before parsing).

use crate::fetcher::ProxyConfig;
use clap::Parser;

/// Longest accepted recency window, in days.
pub const MAX_DAYS: i64 = 36_500;

/// Command-line arguments for a scraping run.
///
/// # Examples
///
/// ```sh
/// # Discover, fetch and extract posts from the last week
/// ransomscraper --base-url https://listing.example --days 7
///
/// # Fetch mirrors through a local Tor SOCKS port
/// ransomscraper --base-url https://listing.example --days 7 \
///     --proxy-host 127.0.0.1 --proxy-port 9050
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Listing page with the tracked sources. Without it, discovery is skipped
    /// and the existing snapshot is used.
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Recency window in days (at most a century)
    #[arg(short, long, env = "DAYS", value_parser = clap::value_parser!(u32).range(1..=MAX_DAYS))]
    pub days: u32,

    /// SOCKS proxy host used for mirror fetches
    #[arg(long, env = "PROXY_HOST", requires = "proxy_port")]
    pub proxy_host: Option<String>,

    /// SOCKS proxy port used for mirror fetches
    #[arg(long, env = "PROXY_PORT", requires = "proxy_host")]
    pub proxy_port: Option<u16>,

    /// Discovery snapshot path
    #[arg(short, long, env = "SOURCES_FILE", default_value = "groups.json")]
    pub sources_file: String,

    /// Report output path
    #[arg(short, long, env = "REPORT_OUTPUT", default_value = "ransomscraper.json")]
    pub output: String,
}

impl Cli {
    pub fn proxy(&self) -> Option<ProxyConfig> {
        match (&self.proxy_host, self.proxy_port) {
            (Some(host), Some(port)) => Some(ProxyConfig {
                host: host.clone(),
                port,
            }),
            _ => None,
        }
    }
}
