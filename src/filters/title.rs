//! Query-in-title relevance filter.

use super::Filter;
use crate::scout::models::Listing;

/// Keeps listings whose title contains the search query.
///
/// Matching is case-insensitive with whitespace runs collapsed, so
/// "bosch  drill" matches "BOSCH Drill 18V". Listings without a title (as
/// recovered from structured data) pass: absence of a title is not evidence
/// of irrelevance.
pub struct TitleMatchFilter {
    query: String,
}

impl TitleMatchFilter {
    /// Creates a filter for the given query.
    pub fn new(query: &str) -> Self {
        Self { query: normalize(query) }
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

impl Filter for TitleMatchFilter {
    fn matches(&self, listing: &Listing) -> bool {
        if listing.title.is_empty() {
            return true;
        }

        normalize(&listing.title).contains(&self.query)
    }

    fn description(&self) -> String {
        format!("Title contains: {}", self.query)
    }
}
