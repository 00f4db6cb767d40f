//! Selector-driven extraction of listings from search result markup.

use crate::config::SiteConfig;
use crate::error::ConfigError;
use crate::scout::jsonld;
use crate::scout::models::Listing;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};
use url::Url;

/// Extracts listings from one site's search results page.
///
/// Selectors come from user configuration, so compiling them can fail; those
/// failures are reported as `ConfigError` for the site rather than panics.
pub struct Extractor<'a> {
    site: &'a SiteConfig,
}

impl<'a> Extractor<'a> {
    /// Creates an extractor for the given site.
    pub fn new(site: &'a SiteConfig) -> Self {
        Self { site }
    }

    /// Extracts all listings from the markup, in document order.
    ///
    /// `base_url` is the search URL, used to absolutize relative links.
    /// A page where the card selector matches nothing yields an empty vec;
    /// that is a legitimate "no results" outcome, not an error.
    pub fn extract(&self, html: &str, base_url: &str) -> Result<Vec<Listing>, ConfigError> {
        let document = Html::parse_document(html);

        let card = self.compile(&self.site.card_selector, "card")?;
        let title = self.compile(&self.site.title_selector, "title")?;
        let price = self.compile(&self.site.price_selector, "price")?;
        let link = match self.site.link_selector.trim() {
            "" => None,
            sel => Some(self.compile(sel, "link")?),
        };

        let mut listings = Vec::new();

        for element in document.select(&card).take(self.site.max_results) {
            match self.extract_card(element, &title, &price, link.as_ref(), base_url) {
                Some(listing) => {
                    trace!("Extracted: {} - {}", listing.display_price(), listing.title);
                    listings.push(listing);
                }
                // Not a usable listing (no title or no numeric price), skip
                None => trace!("Skipping card without a title or numeric price"),
            }
        }

        // Offers embedded as JSON-LD structured data are a second source the
        // configured selectors cannot see.
        for offer in jsonld::extract_offers(&document, base_url) {
            listings.push(offer.into_listing(&self.site.name, self.site.currency_hint.as_deref()));
        }

        debug!("Extracted {} listings from {}", listings.len(), self.site.name);

        Ok(listings)
    }

    /// Compiles a user-supplied selector, attributing failures to the site.
    fn compile(&self, selector: &str, kind: &'static str) -> Result<Selector, ConfigError> {
        Selector::parse(selector).map_err(|_| ConfigError::BadSelector {
            site: self.site.name.clone(),
            kind,
            selector: selector.to_string(),
        })
    }

    /// Extracts a single card, scoping all sub-selections to the card so
    /// fields from neighbouring products cannot cross-contaminate.
    fn extract_card(
        &self,
        card: ElementRef,
        title: &Selector,
        price: &Selector,
        link: Option<&Selector>,
        base_url: &str,
    ) -> Option<Listing> {
        let title = card.select(title).next().map(element_text).filter(|t| !t.is_empty())?;

        let raw_price = card.select(price).next().map(element_text)?;
        let value = normalize_price(&raw_price)?;

        let currency = detect_currency(&raw_price)
            .map(String::from)
            .or_else(|| self.site.currency_hint.clone());

        let url = link
            .and_then(|sel| card.select(sel).next())
            .and_then(|e| e.value().attr("href"))
            .and_then(|href| absolutize(base_url, href));

        Some(Listing {
            site: self.site.name.clone(),
            title,
            raw_price,
            price: value,
            currency,
            url,
        })
    }
}

/// Collects an element's text with runs of whitespace collapsed to one space.
fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes a price string to a number.
///
/// Strips everything but digits and separators, then disambiguates between
/// the `1,234.56` and `1.234,56` shapes by treating the rightmost separator
/// as the decimal mark. Returns `None` when no number remains, e.g. for
/// "Out of stock".
pub fn normalize_price(text: &str) -> Option<f64> {
    let cleaned: String =
        text.chars().filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',').collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(comma)) => {
            // A single comma with two trailing digits reads as a decimal
            // mark ("9,99"); anything else as a thousands separator.
            if cleaned.matches(',').count() == 1 && cleaned.len() - comma == 3 {
                cleaned.replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        _ => cleaned,
    };

    normalized.parse().ok().filter(|p: &f64| p.is_finite() && *p >= 0.0)
}

/// Detects a currency from a symbol or ISO code in the raw price text.
pub fn detect_currency(text: &str) -> Option<&'static str> {
    const SYMBOLS: [(&str, &str); 4] = [("€", "EUR"), ("£", "GBP"), ("$", "USD"), ("¥", "JPY")];
    const CODES: [&str; 8] = ["USD", "EUR", "GBP", "JPY", "CAD", "AUD", "PLN", "SEK"];

    for (symbol, code) in SYMBOLS {
        if text.contains(symbol) {
            return Some(code);
        }
    }

    CODES.into_iter().find(|code| text.contains(code))
}

/// Resolves a possibly-relative href against the page URL.
fn absolutize(base_url: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    Url::parse(base_url).ok()?.join(href).ok().map(Into::into)
}
