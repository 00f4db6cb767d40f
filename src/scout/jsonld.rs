//! Recovery of offers from JSON-LD structured data blocks.
//!
//! Many shops embed `Product`/`Offer` nodes as `application/ld+json` even
//! when their visible markup is selector-hostile, so this runs as a second
//! extraction source after the configured selectors.

use crate::scout::models::Listing;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use url::Url;

static LD_JSON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[type='application/ld+json']").unwrap());

/// An offer recovered from structured data, before site attribution.
#[derive(Debug, Clone)]
pub struct StructuredOffer {
    /// Product name; empty when the node carries none
    pub title: String,
    /// Price text as it appeared in the JSON
    pub raw_price: String,
    /// Parsed price
    pub price: f64,
    /// `priceCurrency` if present
    pub currency: Option<String>,
    /// Offer URL, absolutized
    pub url: Option<String>,
}

impl StructuredOffer {
    /// Attributes the offer to a site, falling back to its currency hint.
    pub fn into_listing(self, site: &str, currency_hint: Option<&str>) -> Listing {
        Listing {
            site: site.to_string(),
            title: self.title,
            raw_price: self.raw_price,
            price: self.price,
            currency: self.currency.or_else(|| currency_hint.map(String::from)),
            url: self.url,
        }
    }
}

/// Scans all JSON-LD blocks in the document for offers.
///
/// Malformed JSON blocks are skipped silently; they are common in the wild.
pub fn extract_offers(document: &Html, base_url: &str) -> Vec<StructuredOffer> {
    let mut offers = Vec::new();

    for script in document.select(&LD_JSON) {
        let text = script.text().collect::<String>();
        match serde_json::from_str::<Value>(text.trim()) {
            Ok(data) => walk(&data, base_url, &mut offers),
            Err(_) => continue,
        }
    }

    offers
}

/// Walks arbitrarily nested JSON looking for product/offer nodes.
fn walk(node: &Value, base_url: &str, out: &mut Vec<StructuredOffer>) {
    match node {
        Value::Array(items) => {
            for item in items {
                walk(item, base_url, out);
            }
        }
        Value::Object(map) => {
            let node_type = map.get("@type").and_then(Value::as_str);

            match node_type {
                Some("Product") => {
                    let name = map.get("name").and_then(Value::as_str).unwrap_or("");
                    match map.get("offers") {
                        Some(offer @ Value::Object(_)) => {
                            out.extend(offer_from(offer, name, base_url));
                        }
                        Some(Value::Array(list)) => {
                            for offer in list {
                                out.extend(offer_from(offer, name, base_url));
                            }
                        }
                        _ => {}
                    }
                }
                Some("Offer") | Some("AggregateOffer") => {
                    let name = map.get("name").and_then(Value::as_str).unwrap_or("");
                    out.extend(offer_from(node, name, base_url));
                }
                _ => {}
            }

            // Keep descending, but not into offers already consumed above.
            for (key, value) in map {
                if node_type == Some("Product") && key == "offers" {
                    continue;
                }
                walk(value, base_url, out);
            }
        }
        _ => {}
    }
}

/// Builds an offer from an `Offer`/`AggregateOffer` object, if it carries a
/// numeric `price` or `lowPrice`.
fn offer_from(obj: &Value, title: &str, base_url: &str) -> Option<StructuredOffer> {
    let map = obj.as_object()?;

    let price_value = map.get("price").or_else(|| map.get("lowPrice"))?;
    let (raw_price, price) = match price_value {
        Value::Number(n) => (n.to_string(), n.as_f64()?),
        Value::String(s) => (s.clone(), s.trim().parse().ok()?),
        _ => return None,
    };

    if !price.is_finite() || price < 0.0 {
        return None;
    }

    let currency =
        map.get("priceCurrency").and_then(Value::as_str).filter(|c| !c.is_empty()).map(String::from);

    let url = map
        .get("url")
        .and_then(Value::as_str)
        .and_then(|href| Url::parse(base_url).ok()?.join(href).ok())
        .map(Into::into);

    Some(StructuredOffer { title: title.to_string(), raw_price, price, currency, url })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offers_from(html: &str) -> Vec<StructuredOffer> {
        let document = Html::parse_document(html);
        extract_offers(&document, "https://shop.test/s?q=widget")
    }

    #[test]
    fn test_product_with_single_offer() {
        let html = r#"
            <script type="application/ld+json">
            {
                "@type": "Product",
                "name": "Widget Pro",
                "offers": {
                    "@type": "Offer",
                    "price": "19.99",
                    "priceCurrency": "GBP",
                    "url": "/p/widget-pro"
                }
            }
            </script>
        "#;

        let offers = offers_from(html);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].title, "Widget Pro");
        assert_eq!(offers[0].price, 19.99);
        assert_eq!(offers[0].currency.as_deref(), Some("GBP"));
        assert_eq!(offers[0].url.as_deref(), Some("https://shop.test/p/widget-pro"));
    }

    #[test]
    fn test_product_with_offer_list() {
        let html = r#"
            <script type="application/ld+json">
            {
                "@type": "Product",
                "name": "Widget",
                "offers": [
                    {"@type": "Offer", "price": 12.5},
                    {"@type": "Offer", "price": 11.0}
                ]
            }
            </script>
        "#;

        let offers = offers_from(html);
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].price, 12.5);
        assert_eq!(offers[1].price, 11.0);
    }

    #[test]
    fn test_aggregate_offer_low_price() {
        let html = r#"
            <script type="application/ld+json">
            {"@type": "AggregateOffer", "name": "Widget", "lowPrice": "8.99", "priceCurrency": "EUR"}
            </script>
        "#;

        let offers = offers_from(html);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].price, 8.99);
    }

    #[test]
    fn test_nested_in_graph() {
        let html = r#"
            <script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@graph": [
                    {"@type": "WebPage", "name": "irrelevant"},
                    {"@type": "Product", "name": "Buried Widget",
                     "offers": {"@type": "Offer", "price": "3.50"}}
                ]
            }
            </script>
        "#;

        let offers = offers_from(html);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].title, "Buried Widget");
    }

    #[test]
    fn test_malformed_json_skipped() {
        let html = r#"
            <script type="application/ld+json">{not json at all</script>
            <script type="application/ld+json">
            {"@type": "Offer", "price": "2.00"}
            </script>
        "#;

        let offers = offers_from(html);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].price, 2.0);
    }

    #[test]
    fn test_offer_without_price_ignored() {
        let html = r#"
            <script type="application/ld+json">
            {"@type": "Offer", "name": "priceless", "priceCurrency": "USD"}
            </script>
        "#;

        assert!(offers_from(html).is_empty());
    }

    #[test]
    fn test_unparseable_price_ignored() {
        let html = r#"
            <script type="application/ld+json">
            {"@type": "Offer", "price": "call us"}
            </script>
        "#;

        assert!(offers_from(html).is_empty());
    }

    #[test]
    fn test_into_listing_currency_fallback() {
        let offer = StructuredOffer {
            title: "Widget".to_string(),
            raw_price: "5".to_string(),
            price: 5.0,
            currency: None,
            url: None,
        };

        let listing = offer.into_listing("ShopTest", Some("GBP"));
        assert_eq!(listing.site, "ShopTest");
        assert_eq!(listing.currency.as_deref(), Some("GBP"));
    }
}
