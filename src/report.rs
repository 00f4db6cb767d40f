//! Run aggregation: merging per-site outcomes and ranking by price.

use crate::scout::models::{Listing, SiteError, SiteOutcome};
use serde::Serialize;
use std::collections::HashSet;

/// The merged outcome of one query across all configured sites.
///
/// Listings are sorted ascending by price; equal prices keep site order and
/// then document order. Owned by the reporting step and discarded after
/// rendering.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// The query that produced this run
    pub query: String,
    /// All listings across sites, cheapest first
    pub listings: Vec<Listing>,
    /// Per-site failures, in site order
    pub errors: Vec<SiteError>,
}

impl RunResult {
    /// Merges per-site outcomes into a ranked result.
    ///
    /// `outcomes` must be in site order; the stable sort preserves that
    /// order as the tie-break for equal prices.
    pub fn collect(query: impl Into<String>, outcomes: Vec<SiteOutcome>) -> Self {
        let mut listings = Vec::new();
        let mut errors = Vec::new();

        for outcome in outcomes {
            match outcome.result {
                Ok(found) => listings.extend(found),
                Err(reason) => errors.push(SiteError { site: outcome.site, reason }),
            }
        }

        // A card and a structured-data block often describe the same offer;
        // first occurrence wins.
        let mut seen = HashSet::new();
        listings.retain(|l| {
            seen.insert((l.site.clone(), l.url.clone(), l.price.to_bits(), l.currency.clone()))
        });

        listings.sort_by(|a, b| a.price.total_cmp(&b.price));

        Self { query: query.into(), listings, errors }
    }

    /// The minimum-price listing, if any listing survived.
    pub fn best(&self) -> Option<&Listing> {
        self.listings.first()
    }

    /// Returns true if no listings were found.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Number of listings.
    pub fn count(&self) -> usize {
        self.listings.len()
    }
}
