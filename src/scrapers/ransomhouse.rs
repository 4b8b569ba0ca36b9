//! RansomHouse JSON feed.
//!
//! The mirror serves a JSON document rather than HTML:
//!
//! ```json
//! {"data": [{"header": "Acme", "url": "acme.com", "actionDate": "08/03/2025"}]}
//! ```
//!
//! `actionDate` is day-first and is compared against the window directly.

use super::Extractor;
use crate::dates::Window;
use crate::models::Post;
use serde_json::Value;
use std::error::Error;
use tracing::debug;

const ACTION_DATE_FORMAT: &str = "%d/%m/%Y";

pub struct RansomHouse;

impl Extractor for RansomHouse {
    fn name(&self) -> &'static str {
        "ransomhouse"
    }

    fn extract(&self, body: &str, window: &Window) -> Result<Vec<Post>, Box<dyn Error>> {
        let document: Value = serde_json::from_str(body)?;
        let entries = document
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let posts: Vec<Post> = entries
            .iter()
            .filter_map(|entry| {
                let date = entry.get("actionDate")?.as_str()?;
                if date.is_empty() || !window.contains_text(date, ACTION_DATE_FORMAT) {
                    return None;
                }
                Some(Post {
                    title: entry.get("header").and_then(Value::as_str).unwrap_or_default().to_string(),
                    site: entry.get("url").and_then(Value::as_str).map(str::to_string),
                    date: date.to_string(),
                })
            })
            .collect();

        debug!(entries = entries.len(), kept = posts.len(), "Parsed RansomHouse feed");
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window_at(y: i32, m: u32, d: u32, days: u32) -> Window {
        Window::at(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(12, 0, 0).unwrap(), days)
    }

    const FEED: &str = r#"{"data": [{"actionDate": "01/02/2025", "header": "X", "url": "http://x"}]}"#;

    #[test]
    fn test_entry_inside_window() {
        let posts = RansomHouse.extract(FEED, &window_at(2025, 2, 3, 7)).unwrap();
        assert_eq!(
            posts,
            vec![Post {
                title: "X".to_string(),
                site: Some("http://x".to_string()),
                date: "01/02/2025".to_string(),
            }]
        );
    }

    #[test]
    fn test_entry_outside_window() {
        assert!(RansomHouse.extract(FEED, &window_at(2025, 6, 1, 7)).unwrap().is_empty());
        assert!(RansomHouse.extract(FEED, &window_at(2025, 1, 30, 7)).unwrap().is_empty());
    }

    #[test]
    fn test_skips_malformed_entries() {
        let feed = r#"{"data": [
            {"header": "no date"},
            {"actionDate": "", "header": "empty date"},
            {"actionDate": "2025-02-01", "header": "wrong format"},
            {"actionDate": 20250201, "header": "not a string"},
            {"actionDate": "02/02/2025"}
        ]}"#;
        let posts = RansomHouse.extract(feed, &window_at(2025, 2, 3, 7)).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "");
        assert_eq!(posts[0].site, None);
        assert_eq!(posts[0].date, "02/02/2025");
    }

    #[test]
    fn test_missing_data_array() {
        let w = window_at(2025, 2, 3, 7);
        assert!(RansomHouse.extract("{}", &w).unwrap().is_empty());
        assert!(RansomHouse.extract(r#"{"data": "nope"}"#, &w).unwrap().is_empty());
    }

    #[test]
    fn test_non_json_body_is_an_error() {
        assert!(RansomHouse.extract("<html></html>", &window_at(2025, 2, 3, 7)).is_err());
    }
}
