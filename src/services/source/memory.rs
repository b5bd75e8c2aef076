//! In-memory section backends
//!
//! Two storage strategies over the same data model, so the benchmark harness
//! has something meaningful to compare: [`ScanBackend`] answers lookups by
//! walking every section, [`IndexedBackend`] keeps a reverse index from item
//! to sections and pays for it on every write.

use std::collections::{BTreeSet, HashMap};

use super::{CachedAdapter, Items, SectionBackend, Sections, SourceError};

fn missing(section: &str) -> SourceError {
    SourceError::SectionNotFound(section.to_string())
}

/// Sections kept in a sorted map. Lookups scan every section.
#[derive(Debug, Clone, Default)]
pub struct ScanBackend {
    sections: Sections,
}

impl ScanBackend {
    pub fn new(sections: Sections) -> Self {
        Self { sections }
    }
}

impl SectionBackend for ScanBackend {
    fn load_all(&self) -> Result<Sections, SourceError> {
        Ok(self.sections.clone())
    }

    fn load_section(&self, section: &str) -> Result<Items, SourceError> {
        self.sections.get(section).cloned().ok_or_else(|| missing(section))
    }

    fn has_section(&self, section: &str) -> Result<bool, SourceError> {
        Ok(self.sections.contains_key(section))
    }

    fn find_sections(&self, item: &str) -> Result<BTreeSet<String>, SourceError> {
        Ok(self
            .sections
            .iter()
            .filter(|(_, items)| items.contains(item))
            .map(|(section, _)| section.clone())
            .collect())
    }

    fn create_section(&mut self, section: &str) -> Result<(), SourceError> {
        self.sections.insert(section.to_string(), Items::new());
        Ok(())
    }

    fn rename_section(&mut self, section: &str, new_name: &str) -> Result<(), SourceError> {
        let items = self.sections.remove(section).ok_or_else(|| missing(section))?;
        self.sections.insert(new_name.to_string(), items);
        Ok(())
    }

    fn delete_section(&mut self, section: &str) -> Result<(), SourceError> {
        self.sections.remove(section).ok_or_else(|| missing(section))?;
        Ok(())
    }

    fn store_items(&mut self, section: &str, items: Items) -> Result<(), SourceError> {
        let slot = self.sections.get_mut(section).ok_or_else(|| missing(section))?;
        *slot = items;
        Ok(())
    }
}

/// Sections plus a reverse index from item to the sections containing it.
#[derive(Debug, Clone, Default)]
pub struct IndexedBackend {
    sections: Sections,
    index: HashMap<String, BTreeSet<String>>,
}

impl IndexedBackend {
    pub fn new(sections: Sections) -> Self {
        let mut backend = Self::default();
        for (section, items) in sections {
            backend.index_items(&section, &items);
            backend.sections.insert(section, items);
        }
        backend
    }

    fn index_items(&mut self, section: &str, items: &Items) {
        for item in items {
            self.index
                .entry(item.clone())
                .or_default()
                .insert(section.to_string());
        }
    }

    fn unindex_items(&mut self, section: &str, items: &Items) {
        for item in items {
            if let Some(sections) = self.index.get_mut(item) {
                sections.remove(section);
                if sections.is_empty() {
                    self.index.remove(item);
                }
            }
        }
    }
}

impl SectionBackend for IndexedBackend {
    fn load_all(&self) -> Result<Sections, SourceError> {
        Ok(self.sections.clone())
    }

    fn load_section(&self, section: &str) -> Result<Items, SourceError> {
        self.sections.get(section).cloned().ok_or_else(|| missing(section))
    }

    fn has_section(&self, section: &str) -> Result<bool, SourceError> {
        Ok(self.sections.contains_key(section))
    }

    fn find_sections(&self, item: &str) -> Result<BTreeSet<String>, SourceError> {
        Ok(self.index.get(item).cloned().unwrap_or_default())
    }

    fn create_section(&mut self, section: &str) -> Result<(), SourceError> {
        self.sections.insert(section.to_string(), Items::new());
        Ok(())
    }

    fn rename_section(&mut self, section: &str, new_name: &str) -> Result<(), SourceError> {
        let items = self.sections.remove(section).ok_or_else(|| missing(section))?;
        self.unindex_items(section, &items);
        self.index_items(new_name, &items);
        self.sections.insert(new_name.to_string(), items);
        Ok(())
    }

    fn delete_section(&mut self, section: &str) -> Result<(), SourceError> {
        let items = self.sections.remove(section).ok_or_else(|| missing(section))?;
        self.unindex_items(section, &items);
        Ok(())
    }

    fn store_items(&mut self, section: &str, items: Items) -> Result<(), SourceError> {
        let previous = self.sections.get(section).cloned().ok_or_else(|| missing(section))?;
        self.unindex_items(section, &previous);
        self.index_items(section, &items);
        self.sections.insert(section.to_string(), items);
        Ok(())
    }
}

/// Writable adapter over an empty [`ScanBackend`].
pub fn scan_adapter() -> CachedAdapter<ScanBackend> {
    CachedAdapter::new(ScanBackend::default())
}

/// Writable adapter over an empty [`IndexedBackend`].
pub fn indexed_adapter() -> CachedAdapter<IndexedBackend> {
    CachedAdapter::new(IndexedBackend::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(list: &[&str]) -> Items {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Sections {
        let mut sections = Sections::new();
        sections.insert("admins".to_string(), items(&["alice", "bob"]));
        sections.insert("developers".to_string(), items(&["bob", "carol"]));
        sections
    }

    #[test]
    fn test_scan_backend_find_sections() {
        let backend = ScanBackend::new(sample());

        assert_eq!(backend.find_sections("bob").unwrap(), items(&["admins", "developers"]));
        assert_eq!(backend.find_sections("alice").unwrap(), items(&["admins"]));
        assert!(backend.find_sections("mallory").unwrap().is_empty());
    }

    #[test]
    fn test_indexed_backend_builds_index() {
        let backend = IndexedBackend::new(sample());

        assert_eq!(backend.find_sections("bob").unwrap(), items(&["admins", "developers"]));
        assert_eq!(backend.load_all().unwrap(), sample());
    }

    #[test]
    fn test_indexed_backend_tracks_writes() {
        let mut backend = IndexedBackend::new(sample());

        backend.store_items("admins", items(&["carol"])).unwrap();
        assert_eq!(backend.find_sections("alice").unwrap(), Items::new());
        assert_eq!(backend.find_sections("carol").unwrap(), items(&["admins", "developers"]));

        backend.rename_section("developers", "devs").unwrap();
        assert_eq!(backend.find_sections("bob").unwrap(), items(&["devs"]));
        assert!(backend.index.values().all(|sections| !sections.contains("developers")));
        assert_eq!(backend.find_sections("carol").unwrap(), items(&["admins", "devs"]));

        backend.delete_section("admins").unwrap();
        assert_eq!(backend.find_sections("carol").unwrap(), items(&["devs"]));
        assert!(backend.index.get("alice").is_none());
    }

    #[test]
    fn test_backends_agree() {
        let scan = ScanBackend::new(sample());
        let indexed = IndexedBackend::new(sample());

        for item in ["alice", "bob", "carol", "dave"] {
            assert_eq!(
                scan.find_sections(item).unwrap(),
                indexed.find_sections(item).unwrap(),
                "backends disagree on {}",
                item
            );
        }
    }

    #[test]
    fn test_missing_sections_reported() {
        let mut scan = ScanBackend::default();
        let mut indexed = IndexedBackend::default();

        assert_eq!(
            scan.load_section("admins"),
            Err(SourceError::SectionNotFound("admins".to_string()))
        );
        assert_eq!(
            indexed.delete_section("admins"),
            Err(SourceError::SectionNotFound("admins".to_string()))
        );
        assert_eq!(
            scan.store_items("admins", Items::new()),
            Err(SourceError::SectionNotFound("admins".to_string()))
        );
    }
}
