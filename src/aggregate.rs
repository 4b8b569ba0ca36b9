//! Reduction of fetch results to one page per source, and record extraction.
//!
//! Active pages are deduplicated first by body (a mirror answering for two
//! listed names is attributed to whichever name came first), then by source
//! name (the first active mirror of a source wins). Two unrelated sources
//! serving the same page, a shared seizure notice for instance, therefore
//! leave only the first of them.

use crate::dates::Window;
use crate::models::{CandidateRow, FetchResult, Record};
use crate::scrapers::Registry;
use crate::utils::truncate_for_log;
use itertools::Itertools;
use tracing::{error, info, instrument};

/// Keep active pages, deduplicated by body then by source name.
///
/// # Arguments
///
/// * `results` - Fetch results in fetch order
///
/// # Returns
///
/// One [`CandidateRow`] per surviving page, in fetch order. Pages that failed,
/// answered with a non-200 status, or showed no recent date are dropped. When
/// two pages share a body only the earlier one is kept, and afterwards only
/// the first page of each source name remains.
pub fn aggregate(results: &[FetchResult]) -> Vec<CandidateRow> {
    results
        .iter()
        .filter(|r| r.is_active() == Some(true))
        .filter_map(|r| {
            r.body.as_ref().map(|body| CandidateRow {
                source_name: r.source_name.clone(),
                mirror_link: r.mirror_link.clone(),
                body: body.clone(),
                matched_dates: r.matched_dates.clone(),
            })
        })
        .unique_by(|row| row.body.clone())
        .unique_by(|row| row.source_name.clone())
        .collect()
}

/// Run each candidate through its extractor and tag the results.
///
/// An extractor error is logged against its source and counts as no records.
#[instrument(level = "info", skip_all, fields(rows = rows.len()))]
pub fn extract_records(rows: &[CandidateRow], registry: &Registry, window: &Window) -> Vec<Record> {
    let mut records = Vec::new();
    for row in rows {
        match registry.extract(&row.source_name, &row.body, window) {
            Ok(posts) => {
                info!(
                    source = %row.source_name,
                    recent_dates = row.matched_dates.len(),
                    posts = posts.len(),
                    "Extracted posts"
                );
                records.extend(posts.into_iter().map(|p| p.into_record(&row.source_name)));
            }
            Err(e) => {
                error!(
                    source = %row.source_name,
                    url = %row.mirror_link,
                    error = %e,
                    body_preview = %truncate_for_log(&row.body, 200),
                    "Failed to extract posts"
                );
            }
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::Window;
    use crate::models::{FetchStatus, Post};
    use crate::scrapers::Extractor;
    use chrono::NaiveDate;
    use std::error::Error;

    fn window() -> Window {
        Window::at(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap().and_hms_opt(12, 0, 0).unwrap(), 7)
    }

    fn active(source: &str, mirror: &str, body: &str) -> FetchResult {
        FetchResult {
            source_name: source.to_string(),
            mirror_link: mirror.to_string(),
            status: FetchStatus::Code(200),
            body: Some(body.to_string()),
            matched_dates: vec!["2025-03-08".to_string()],
        }
    }

    fn names(rows: &[CandidateRow]) -> Vec<(&str, &str)> {
        rows.iter().map(|r| (r.source_name.as_str(), r.mirror_link.as_str())).collect()
    }

    #[test]
    fn test_inactive_and_failed_results_are_dropped() {
        let mut quiet = active("alpha", "http://a1", "quiet");
        quiet.matched_dates.clear();
        let results = vec![
            quiet,
            FetchResult::failed("alpha", "http://a2"),
            FetchResult {
                status: FetchStatus::Code(404),
                body: None,
                matched_dates: Vec::new(),
                ..active("alpha", "http://a3", "")
            },
        ];
        assert!(aggregate(&results).is_empty());
    }

    #[test]
    fn test_same_body_keeps_first_source() {
        let results = vec![
            active("alpha", "http://shared", "<p>seized 2025-03-08</p>"),
            active("beta", "http://shared-too", "<p>seized 2025-03-08</p>"),
        ];
        assert_eq!(names(&aggregate(&results)), vec![("alpha", "http://shared")]);
    }

    #[test]
    fn test_same_source_keeps_first_mirror() {
        let results = vec![
            active("alpha", "http://a1", "first 2025-03-08"),
            active("alpha", "http://a2", "second 2025-03-08"),
            active("beta", "http://b1", "beta 2025-03-08"),
        ];
        assert_eq!(
            names(&aggregate(&results)),
            vec![("alpha", "http://a1"), ("beta", "http://b1")]
        );
    }

    #[test]
    fn test_body_dedup_runs_before_name_dedup() {
        // beta's first mirror copies alpha, so beta falls through to its second mirror.
        let results = vec![
            active("alpha", "http://a1", "alpha page"),
            active("beta", "http://b1", "alpha page"),
            active("beta", "http://b2", "beta page"),
        ];
        assert_eq!(
            names(&aggregate(&results)),
            vec![("alpha", "http://a1"), ("beta", "http://b2")]
        );
    }

    struct Failing;

    impl Extractor for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn extract(&self, _body: &str, _window: &Window) -> Result<Vec<Post>, Box<dyn Error>> {
            Err("layout changed".into())
        }
    }

    #[test]
    fn test_extraction_failures_are_isolated() {
        let mut registry = Registry::default();
        registry.register(Box::new(Failing));

        let feed = r#"{"data": [{"actionDate": "08/03/2025", "header": "Acme", "url": "acme.com"}]}"#;
        let rows = aggregate(&[
            active("failing", "http://f", "anything"),
            active("unknown", "http://u", "<p>2025-03-08</p>"),
            active("ransomhouse", "http://r", feed),
        ]);
        assert_eq!(rows.len(), 3);

        let records = extract_records(&rows, &registry, &window());
        assert_eq!(
            records,
            vec![Record {
                source_name: "ransomhouse".to_string(),
                title: "Acme".to_string(),
                site: Some("acme.com".to_string()),
                date: "08/03/2025".to_string(),
            }]
        );
    }
}
