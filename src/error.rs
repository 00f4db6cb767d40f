//! Error types for site configuration problems.

use thiserror::Error;

/// A problem with a site's configuration, attributed to the offending site.
///
/// These surface at edit time in the shell or as a per-site failure during a
/// run; they never abort the other sites.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{site}: url_template must contain the {{query}} placeholder")]
    MissingPlaceholder { site: String },

    #[error("{site}: {field} must not be empty")]
    EmptyField { site: String, field: &'static str },

    #[error("{site}: invalid {kind} selector: {selector}")]
    BadSelector { site: String, kind: &'static str, selector: String },

    #[error("search query must not be empty")]
    EmptyQuery,
}
