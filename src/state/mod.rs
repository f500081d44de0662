//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RunState`: Tracks the state of the whole run (fetching sitemap, crawling, done, failed)
//! - `UrlOutcome`: Records what happened to each sitemap URL (skipped, crawled, failed)

mod run_state;
mod url_outcome;

// Re-export main types
pub use run_state::RunState;
pub use url_outcome::UrlOutcome;
