//! Files produced and consumed by a run.
//!
//! # Submodules
//!
//! - [`json`]: the discovery snapshot and the report handoff
//!
//! # Output Structure
//!
//! ```text
//! groups.json          # discovered sources and mirrors, reread before fetching
//! ransomscraper.json   # run summary and extracted records for reporting
//! ```

pub mod json;
