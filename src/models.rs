//! Data models flowing through the scraping pipeline.
//!
//! This module defines the values handed from one stage to the next:
//! - [`SourceLinks`] / [`Sources`]: the discovery snapshot, keyed by source name
//! - [`FetchResult`]: one attempted mirror fetch
//! - [`CandidateRow`]: the single active page kept per source after dedup
//! - [`Post`] / [`Record`]: structured items produced by extractors
//! - [`RunSummary`] / [`Report`]: the handoff consumed by reporting
//!
//! Every value is built once and passed along by ownership; no stage mutates
//! another stage's output.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Detail page and mirror list for one tracked source.
///
/// The legacy field names `link_grupo` / `links_online` are still accepted when
/// reading an older snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceLinks {
    /// Detail page on the listing site, `base_url + href`.
    #[serde(alias = "link_grupo")]
    pub detail_link: String,
    /// Mirror URLs marked online on the detail page, in row order.
    #[serde(alias = "links_online", default)]
    pub mirror_links: Vec<String>,
}

/// Discovery snapshot. Insertion order is the fetch order.
pub type Sources = IndexMap<String, SourceLinks>;

/// Outcome of a single GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// The server answered with this status code.
    Code(u16),
    /// Transport-level failure (timeout, refused connection, DNS, proxy).
    Error,
}

impl FetchStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, FetchStatus::Code(200))
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Code(code) => write!(f, "{code}"),
            FetchStatus::Error => f.write_str("error"),
        }
    }
}

/// One `(source, mirror)` fetch attempt.
///
/// `body` is only set on a 200 response, and `matched_dates` is only
/// populated when `body` is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub source_name: String,
    pub mirror_link: String,
    pub status: FetchStatus,
    pub body: Option<String>,
    pub matched_dates: Vec<String>,
}

impl FetchResult {
    /// Result for a request that never produced a response.
    pub fn failed(source_name: &str, mirror_link: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            mirror_link: mirror_link.to_string(),
            status: FetchStatus::Error,
            body: None,
            matched_dates: Vec::new(),
        }
    }

    /// `None` unless the page was downloaded; otherwise whether any recent date was seen.
    pub fn is_active(&self) -> Option<bool> {
        self.body.as_ref().map(|_| !self.matched_dates.is_empty())
    }

    pub fn match_count(&self) -> usize {
        self.matched_dates.len()
    }
}

/// The page selected for one source after filtering and dedup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRow {
    pub source_name: String,
    pub mirror_link: String,
    pub body: String,
    pub matched_dates: Vec<String>,
}

/// An item pulled out of one page by an extractor, before it is attributed
/// to a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    pub site: Option<String>,
    /// The date text exactly as it appeared on the page.
    pub date: String,
}

impl Post {
    pub fn into_record(self, source_name: &str) -> Record {
        Record {
            source_name: source_name.to_string(),
            title: self.title,
            site: self.site,
            date: self.date,
        }
    }
}

/// A post attributed to the source it was extracted from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Record {
    pub source_name: String,
    pub title: String,
    pub site: Option<String>,
    pub date: String,
}

/// Fetch counts for the report, computed over every attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunSummary {
    /// Number of mirror fetches attempted.
    pub total_attempts: usize,
    /// Number of attempts answered with status 200.
    pub status_ok: usize,
}

impl RunSummary {
    pub fn from_results(results: &[FetchResult]) -> Self {
        Self {
            total_attempts: results.len(),
            status_ok: results.iter().filter(|r| r.status.is_ok()).count(),
        }
    }
}

/// Everything the report/notify side receives from one run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Report {
    /// Local timestamp the recency window was anchored on.
    pub generated_at: String,
    pub window_days: u32,
    pub summary: RunSummary,
    pub records: Vec<Record>,
}
