//! Data models for extracted listings and per-site run outcomes.

use serde::{Deserialize, Serialize};

/// One extracted product record, attributed to one site.
///
/// A tile only becomes a `Listing` once it has yielded a numeric price, so
/// `price` is always present. The title may be empty for offers recovered
/// from structured data blocks that carry no product name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Site label this listing came from
    pub site: String,
    /// Product title
    pub title: String,
    /// Price text exactly as it appeared in the markup
    pub raw_price: String,
    /// Normalized numeric price
    pub price: f64,
    /// Currency code if detected or hinted (USD, GBP, ...)
    pub currency: Option<String>,
    /// Absolute product URL if the link selector matched
    pub url: Option<String>,
}

impl Listing {
    /// Creates a listing with just site, title, and price.
    pub fn new(site: impl Into<String>, title: impl Into<String>, price: f64) -> Self {
        Self {
            site: site.into(),
            title: title.into(),
            raw_price: format!("{:.2}", price),
            price,
            currency: None,
            url: None,
        }
    }

    /// Sets the currency code.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Sets the product URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Price with currency for display, e.g. "9.99 GBP" or "9.99".
    pub fn display_price(&self) -> String {
        match &self.currency {
            Some(c) => format!("{:.2} {}", self.price, c),
            None => format!("{:.2}", self.price),
        }
    }
}

/// A per-site failure, carried through to the final report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteError {
    /// Site label
    pub site: String,
    /// Human-readable failure reason
    pub reason: String,
}

/// Outcome of one site's fetch-then-extract step.
///
/// Failures are data rather than control flow so one unreachable site cannot
/// abort the rest of the run.
#[derive(Debug, Clone)]
pub struct SiteOutcome {
    /// Site label
    pub site: String,
    /// Extracted listings, or the failure reason
    pub result: Result<Vec<Listing>, String>,
}

impl SiteOutcome {
    /// Creates a successful outcome.
    pub fn success(site: impl Into<String>, listings: Vec<Listing>) -> Self {
        Self { site: site.into(), result: Ok(listings) }
    }

    /// Creates a failed outcome.
    pub fn failure(site: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { site: site.into(), result: Err(reason.into()) }
    }
}
