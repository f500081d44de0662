//! Output module for reporting crawl results
//!
//! This module handles:
//! - Tallying per-URL outcomes into a run summary
//! - Logging the summary when the run completes

pub mod stats;

pub use stats::{log_summary, CrawlSummary};
