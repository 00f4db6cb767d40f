//! Search URL construction from a site's URL template.

use crate::config::SiteConfig;
use crate::error::ConfigError;

/// The literal token in a URL template marking where the search term goes.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Builds the search URL for a site by substituting the percent-encoded
/// query into the template.
///
/// Fails if the query is blank or the template lacks the placeholder.
pub fn build_search_url(site: &SiteConfig, query: &str) -> Result<String, ConfigError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ConfigError::EmptyQuery);
    }

    if !site.url_template.contains(QUERY_PLACEHOLDER) {
        return Err(ConfigError::MissingPlaceholder { site: site.name.clone() });
    }

    let encoded = urlencoding::encode(query);
    Ok(site.url_template.replace(QUERY_PLACEHOLDER, &encoded))
}
