//! JSON persistence for the discovery snapshot and the report handoff.
//!
//! The snapshot is the only state kept between runs. It is pretty-printed
//! with entries in discovery order so the fetch order survives the round
//! trip through disk.

use crate::models::{Report, Sources};
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Write the discovered sources to `path`.
#[instrument(level = "info", skip(sources), fields(sources = sources.len()))]
pub async fn write_sources(sources: &Sources, path: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(sources)?;
    fs::write(path, json).await?;
    info!(%path, "Wrote source snapshot");
    Ok(())
}

/// Read a snapshot previously written by [`write_sources`].
#[instrument(level = "info")]
pub async fn read_sources(path: &str) -> Result<Sources, Box<dyn Error>> {
    let json = fs::read_to_string(path).await?;
    let sources: Sources = serde_json::from_str(&json)?;
    let mirrors: usize = sources.values().map(|s| s.mirror_links.len()).sum();
    info!(%path, sources = sources.len(), mirrors, "Loaded source snapshot");
    Ok(sources)
}

/// Write the report handoff to `path`.
#[instrument(level = "info", skip(report), fields(records = report.records.len()))]
pub async fn write_report(report: &Report, path: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).await?;
    info!(%path, "Wrote report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Record, RunSummary, SourceLinks};
    use std::env::temp_dir;

    fn scratch(name: &str) -> String {
        temp_dir()
            .join(format!("ransomscraper-{}-{name}", std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[tokio::test]
    async fn test_snapshot_preserves_order() {
        let mut sources = Sources::new();
        for name in ["zeta", "alpha", "mu"] {
            sources.insert(
                name.to_string(),
                SourceLinks {
                    detail_link: format!("http://listing.example/{name}"),
                    mirror_links: vec![format!("http://{name}.onion")],
                },
            );
        }

        let path = scratch("snapshot.json");
        write_sources(&sources, &path).await.unwrap();
        let loaded = read_sources(&path).await.unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mu"]);
        assert_eq!(loaded, sources);
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_an_error() {
        assert!(read_sources(&scratch("does-not-exist.json")).await.is_err());
    }

    #[tokio::test]
    async fn test_report_is_written() {
        let report = Report {
            generated_at: "2025-03-10T12:00:00".to_string(),
            window_days: 7,
            summary: RunSummary {
                total_attempts: 3,
                status_ok: 1,
            },
            records: vec![Record {
                source_name: "play".to_string(),
                title: "Acme".to_string(),
                site: None,
                date: "2025-03-08".to_string(),
            }],
        };

        let path = scratch("report.json");
        write_report(&report, &path).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let parsed: Report = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.summary, report.summary);
        assert_eq!(parsed.records, report.records);
    }
}
