//! BlackByte leak site.
//!
//! Each mirror page is dedicated to one victim: the name sits in
//! `caption.target-name` and the table below lists upload timestamps. Every
//! recent timestamp becomes one post titled with the victim name.

use super::Extractor;
use crate::dates::Window;
use crate::models::Post;
use scraper::{Html, Selector};
use std::error::Error;
use tracing::warn;

const CELL_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct BlackByte;

impl Extractor for BlackByte {
    fn name(&self) -> &'static str {
        "blackbyte"
    }

    fn extract(&self, body: &str, window: &Window) -> Result<Vec<Post>, Box<dyn Error>> {
        let document = Html::parse_document(body);
        let caption = Selector::parse("caption.target-name")?;
        let cell = Selector::parse("td")?;

        let Some(target) = document.select(&caption).next() else {
            warn!(source = self.name(), "No target caption on page, layout may have changed");
            return Ok(Vec::new());
        };
        let target: String = target.text().collect();

        let posts = document
            .select(&cell)
            .map(|td| td.text().collect::<String>().trim().to_string())
            .filter(|text| window.contains_text(text, CELL_FORMAT))
            .map(|date| Post {
                title: target.clone(),
                site: None,
                date,
            })
            .collect();
        Ok(posts)
    }
}
