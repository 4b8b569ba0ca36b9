//! Play leak site.
//!
//! Every post is a `th.News` cell:
//!
//! ```html
//! <th class="News">Acme Corp <i class="link"></i> acme.com
//!   <div>publication date: 2025-03-08</div></th>
//! ```
//!
//! The leading text node is the title, the text right after `i.link` is the
//! site, and the text after the last `:` of the "publication date:" line is
//! the date.

use super::Extractor;
use crate::dates::Window;
use crate::models::Post;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;

const PUBLICATION_MARKER: &str = "publication date:";
const PUBLICATION_FORMAT: &str = "%Y-%m-%d";

pub struct Play;

impl Play {
    fn title(cell: ElementRef<'_>) -> String {
        cell.children()
            .next()
            .and_then(|node| node.value().as_text().map(|t| t.trim().to_string()))
            .unwrap_or_default()
    }

    fn site(cell: ElementRef<'_>, link: &Selector) -> Option<String> {
        let marker = cell.select(link).next()?;
        let sibling = marker.next_sibling()?;
        sibling.value().as_text().map(|t| t.trim().to_string())
    }

    fn publication_date(cell: ElementRef<'_>) -> Option<String> {
        let line = cell.text().find(|t| t.contains(PUBLICATION_MARKER))?;
        line.trim().rsplit(':').next().map(|d| d.trim().to_string())
    }
}

impl Extractor for Play {
    fn name(&self) -> &'static str {
        "play"
    }

    fn extract(&self, body: &str, window: &Window) -> Result<Vec<Post>, Box<dyn Error>> {
        let document = Html::parse_document(body);
        let news = Selector::parse("th.News")?;
        let link = Selector::parse("i.link")?;

        let posts = document
            .select(&news)
            .filter_map(|cell| {
                let date = Self::publication_date(cell)?;
                if !window.contains_text(&date, PUBLICATION_FORMAT) {
                    return None;
                }
                Some(Post {
                    title: Self::title(cell),
                    site: Self::site(cell, &link),
                    date,
                })
            })
            .collect();
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

    fn page(cells: &str) -> String {
        format!("<html><body><table><tr>{cells}</tr></table></body></html>")
    }

    #[test]
    fn test_extracts_title_site_and_date() {
        let html = page(
            r#"<th class="News">Acme Corp <i class="link"></i> acme.com
                <div class="location">US</div>
                <div class="date">views: 120 added: 2025-03-01 publication date: 2025-03-08</div></th>"#,
        );
        let posts = Play.extract(&html, &window()).unwrap();
        assert_eq!(
            posts,
            vec![Post {
                title: "Acme Corp".to_string(),
                site: Some("acme.com".to_string()),
                date: "2025-03-08".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_link_marker_leaves_site_empty() {
        let html = page(r#"<th class="News">Initech<div>publication date: 2025-03-09</div></th>"#);
        let posts = Play.extract(&html, &window()).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Initech");
        assert_eq!(posts[0].site, None);
    }

    #[test]
    fn test_skips_old_and_undated_cells() {
        let html = page(
            r#"<th class="News">Old Co<div>publication date: 2024-01-01</div></th>
               <th class="News">Soon Co<div>status: pending</div></th>
               <th class="Other">Hidden<div>publication date: 2025-03-08</div></th>"#,
        );
        assert!(Play.extract(&html, &window()).unwrap().is_empty());
    }
}
