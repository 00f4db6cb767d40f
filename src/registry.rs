//! Session-scoped, ordered collection of site configurations.

use crate::config::SiteConfig;
use crate::error::ConfigError;

/// The set of sites a session searches, in user-defined order.
///
/// Order matters: it is the documented tie-break when two listings share a
/// price. Edits happen only between runs; each run takes a snapshot so an
/// in-flight query never observes a mutation.
#[derive(Debug, Clone, Default)]
pub struct SiteRegistry {
    sites: Vec<SiteConfig>,
}

impl SiteRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry seeded from configuration, keeping order.
    pub fn from_sites(sites: Vec<SiteConfig>) -> Self {
        Self { sites }
    }

    /// Appends a site after validating it.
    pub fn add(&mut self, site: SiteConfig) -> Result<(), ConfigError> {
        site.validate()?;
        self.sites.push(site);
        Ok(())
    }

    /// Replaces the site at `index` after validating the replacement.
    pub fn update(&mut self, index: usize, site: SiteConfig) -> Result<(), ConfigError> {
        site.validate()?;
        if let Some(slot) = self.sites.get_mut(index) {
            *slot = site;
        }
        Ok(())
    }

    /// Removes and returns the site at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<SiteConfig> {
        if index < self.sites.len() {
            Some(self.sites.remove(index))
        } else {
            None
        }
    }

    /// Returns the site at `index`.
    pub fn get(&self, index: usize) -> Option<&SiteConfig> {
        self.sites.get(index)
    }

    /// Iterates sites in order.
    pub fn iter(&self) -> impl Iterator<Item = &SiteConfig> {
        self.sites.iter()
    }

    /// Number of configured sites.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Returns true if no sites are configured.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Clones the current sites for one run.
    pub fn snapshot(&self) -> Vec<SiteConfig> {
        self.sites.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> SiteConfig {
        SiteConfig { name: name.to_string(), ..SiteConfig::example() }
    }

    #[test]
    fn test_add_preserves_order() {
        let mut registry = SiteRegistry::new();
        registry.add(named("A")).unwrap();
        registry.add(named("B")).unwrap();
        registry.add(named("C")).unwrap();

        let names: Vec<_> = registry.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn test_add_rejects_invalid_site() {
        let mut registry = SiteRegistry::new();
        let mut site = named("Broken");
        site.url_template = "https://no-placeholder.test/s".to_string();

        assert!(registry.add(site).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_update_and_remove() {
        let mut registry = SiteRegistry::from_sites(vec![named("A"), named("B")]);

        registry.update(1, named("B2")).unwrap();
        assert_eq!(registry.get(1).unwrap().name, "B2");

        let removed = registry.remove(0).unwrap();
        assert_eq!(removed.name, "A");
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(5).is_none());
    }

    #[test]
    fn test_update_rejects_invalid_site() {
        let mut registry = SiteRegistry::from_sites(vec![named("A")]);
        let mut bad = named("A");
        bad.card_selector = String::new();

        assert!(registry.update(0, bad).is_err());
        assert_eq!(registry.get(0).unwrap().card_selector, ".product-card");
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut registry = SiteRegistry::from_sites(vec![named("A")]);
        let snapshot = registry.snapshot();

        registry.remove(0);
        assert!(registry.is_empty());
        assert_eq!(snapshot.len(), 1);
    }
}
