//! Handala WordPress blog.
//!
//! Posts are `li.wp-block-post` items with an `h2 a` title, a
//! `time[datetime]` ISO timestamp and an excerpt paragraph. The victim's site
//! is not marked up, so the first hostname-looking token of the excerpt is
//! used when there is one.

use super::Extractor;
use crate::dates::Window;
use crate::models::Post;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::error::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

static HOSTNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:https?://|www\.)?([\w.-]+(?:\.[a-z]{2,}))\b").expect("hostname pattern must compile")
});

/// First hostname-like token in `text`, including any scheme or `www.` prefix.
pub fn find_hostname(text: &str) -> Option<String> {
    HOSTNAME.find(text).map(|m| m.as_str().to_string())
}

pub struct Handala;

impl Extractor for Handala {
    fn name(&self) -> &'static str {
        "handala"
    }

    fn extract(&self, body: &str, window: &Window) -> Result<Vec<Post>, Box<dyn Error>> {
        let document = Html::parse_document(body);
        let item = Selector::parse("li.wp-block-post")?;
        let title = Selector::parse("h2 a")?;
        let time = Selector::parse("time")?;
        let excerpt = Selector::parse("p.wp-block-post-excerpt__excerpt")?;

        let mut posts = Vec::new();
        for li in document.select(&item) {
            let Some(heading) = li.select(&title).next() else {
                continue;
            };
            let Some(datetime) = li.select(&time).next().and_then(|t| t.value().attr("datetime")) else {
                continue;
            };
            let date = datetime.split('T').next().unwrap_or_default();
            if !window.contains_text(date, DATE_FORMAT) {
                continue;
            }

            let description: String = li
                .select(&excerpt)
                .next()
                .map(|p| p.text().collect())
                .unwrap_or_default();
            posts.push(Post {
                title: heading.text().collect(),
                site: find_hostname(&description),
                date: date.to_string(),
            });
        }
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window() -> Window {
        Window::at(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap().and_hms_opt(12, 0, 0).unwrap(), 7)
    }

    fn post(title: &str, datetime: &str, excerpt: &str) -> String {
        format!(
            r#"<li class="wp-block-post">
                 <h2 class="wp-block-post-title"><a href="/p">{title}</a></h2>
                 <div class="wp-block-post-date"><time datetime="{datetime}">March</time></div>
                 <p class="wp-block-post-excerpt__excerpt">{excerpt}</p>
               </li>"#
        )
    }

    #[test]
    fn test_find_hostname() {
        assert_eq!(find_hostname("we breached www.acme.co.il today").as_deref(), Some("www.acme.co.il"));
        assert_eq!(find_hostname("see https://globex.com/leak").as_deref(), Some("https://globex.com"));
        assert_eq!(find_hostname("no host here"), None);
    }

    #[test]
    fn test_extracts_recent_posts() {
        let html = format!(
            "<ul>{}{}</ul>",
            post("Acme hacked", "2025-03-08T14:00:00+02:00", "All data of acme.co.il is out."),
            post("Old hack", "2024-12-01T09:00:00+02:00", "globex.com")
        );
        let posts = Handala.extract(&html, &window()).unwrap();
        assert_eq!(
            posts,
            vec![Post {
                title: "Acme hacked".to_string(),
                site: Some("acme.co.il".to_string()),
                date: "2025-03-08".to_string(),
            }]
        );
    }

    #[test]
    fn test_skips_items_missing_parts() {
        let html = r#"<ul>
            <li class="wp-block-post"><h2>No link</h2><time datetime="2025-03-08T00:00:00"></time></li>
            <li class="wp-block-post"><h2><a>No time</a></h2></li>
            <li class="wp-block-post"><h2><a>No excerpt</a></h2><time datetime="2025-03-09T00:00:00"></time></li>
        </ul>"#;
        let posts = Handala.extract(html, &window()).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "No excerpt");
        assert_eq!(posts[0].site, None);
    }
}
