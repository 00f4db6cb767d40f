//! Core modules for query building, HTTP fetching, and listing extraction.

pub mod client;
pub mod extractor;
pub mod jsonld;
pub mod models;
pub mod query;

pub use client::{HttpFetcher, PageFetcher};
pub use extractor::Extractor;
pub use models::{Listing, SiteError, SiteOutcome};
pub use query::{build_search_url, QUERY_PLACEHOLDER};
