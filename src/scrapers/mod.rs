//! Source-specific extractors turning one page body into structured posts.
//!
//! Each module parses exactly one source's page layout. They share nothing
//! but the [`Extractor`] contract and are looked up by source name in the
//! [`Registry`].
//!
//! # Supported Sources
//!
//! | Source | Module | Page shape |
//! |--------|--------|------------|
//! | RansomHouse | [`ransomhouse`] | JSON feed with a `data` array |
//! | Monti | [`monti`] | `published` markers under `h5` headings |
//! | Play | [`play`] | `th.News` label/value cells |
//! | Handala | [`handala`] | WordPress post list |
//! | BlackByte | [`blackbyte`] | Captioned table of timestamps |
//!
//! # Common Patterns
//!
//! Extractors:
//! - are pure: same body and window in, same posts out
//! - skip malformed items instead of failing the page
//! - compare dates against the [`Window`] by parsing the field directly
//! - return `Err` only when the page as a whole cannot be read
//!
//! Adding a source means adding a module and registering it in
//! [`Registry::default`].

use crate::dates::Window;
use crate::models::Post;
use std::collections::HashMap;
use std::error::Error;
use tracing::warn;

pub mod blackbyte;
pub mod handala;
pub mod monti;
pub mod play;
pub mod ransomhouse;

/// A parser for one source's page layout.
pub trait Extractor {
    /// Source name as it appears in the discovery snapshot.
    fn name(&self) -> &'static str;

    /// Pull every post dated inside `window` out of `body`.
    fn extract(&self, body: &str, window: &Window) -> Result<Vec<Post>, Box<dyn Error>>;
}

/// Source name to extractor lookup.
pub struct Registry {
    extractors: HashMap<&'static str, Box<dyn Extractor>>,
}

impl Registry {
    /// A registry with no extractors.
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Register an extractor under its own name, replacing any previous one.
    pub fn register(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.insert(extractor.name(), extractor);
    }

    pub fn get(&self, source_name: &str) -> Option<&dyn Extractor> {
        self.extractors.get(source_name).map(|e| &**e)
    }

    /// Names with a registered extractor, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.extractors.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Run the extractor registered for `source_name`.
    ///
    /// # Arguments
    ///
    /// * `source_name` - Name from the discovery snapshot
    /// * `body` - Raw page body fetched from one of the source's mirrors
    /// * `window` - Recency window posts must fall inside
    ///
    /// # Returns
    ///
    /// The posts dated inside `window`. Sources without an extractor yield an
    /// empty list and a warning.
    ///
    /// # Errors
    ///
    /// Whatever the extractor returns when the page as a whole cannot be
    /// read, such as a JSON feed that does not parse.
    pub fn extract(
        &self,
        source_name: &str,
        body: &str,
        window: &Window,
    ) -> Result<Vec<Post>, Box<dyn Error>> {
        match self.get(source_name) {
            Some(extractor) => extractor.extract(body, window),
            None => {
                warn!(source = source_name, "No extractor registered for source yet");
                Ok(Vec::new())
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(ransomhouse::RansomHouse));
        registry.register(Box::new(monti::Monti));
        registry.register(Box::new(play::Play));
        registry.register(Box::new(handala::Handala));
        registry.register(Box::new(blackbyte::BlackByte));
        registry
    }
}
