//! Monti leak site.
//!
//! Posts are `h5` headings followed somewhere later by a
//! `div.col-auto.published` holding a `%Y-%m-%d %H:%M:%S` timestamp. The
//! title of a timestamp is the last `h5` seen before it in document order.

use super::Extractor;
use crate::dates::Window;
use crate::models::Post;
use scraper::{Html, Selector};
use std::error::Error;

const PUBLISHED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MISSING_TITLE: &str = "Title not found";

pub struct Monti;

impl Extractor for Monti {
    fn name(&self) -> &'static str {
        "monti"
    }

    fn extract(&self, body: &str, window: &Window) -> Result<Vec<Post>, Box<dyn Error>> {
        let document = Html::parse_document(body);
        let selector = Selector::parse("h5, div.col-auto.published")?;

        let mut heading: Option<String> = None;
        let mut posts = Vec::new();
        for element in document.select(&selector) {
            let text = element.text().collect::<String>().trim().to_string();
            if element.value().name() == "h5" {
                heading = Some(text);
                continue;
            }
            if window.contains_text(&text, PUBLISHED_FORMAT) {
                posts.push(Post {
                    title: heading.clone().unwrap_or_else(|| MISSING_TITLE.to_string()),
                    site: None,
                    date: text,
                });
            }
        }
        Ok(posts)
    }
}
