//! price-scout - Multi-site lowest-price finder
//!
//! Define e-commerce sites at runtime (URL template + CSS selectors), fetch
//! each site's search page for a query, and report the lowest price found.

pub mod commands;
pub mod config;
pub mod error;
pub mod filters;
pub mod format;
pub mod registry;
pub mod report;
pub mod scout;

pub use config::{Config, SiteConfig};
pub use error::ConfigError;
pub use registry::SiteRegistry;
pub use report::RunResult;
pub use scout::models::Listing;
