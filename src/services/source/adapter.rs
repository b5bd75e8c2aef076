use std::collections::BTreeSet;
use tracing::{debug, trace};

use super::{CacheState, Items, SectionQuery, Sections, SourceAdapter, SourceError};

/// Raw storage behind a [`CachedAdapter`].
///
/// Backends never cache. Existence checks, writability and cache coherence
/// are handled by the adapter before a backend method is called, so e.g.
/// `delete_section` is only ever called for a section that exists.
pub trait SectionBackend {
    fn load_all(&self) -> Result<Sections, SourceError>;

    fn load_section(&self, section: &str) -> Result<Items, SourceError>;

    fn has_section(&self, section: &str) -> Result<bool, SourceError>;

    /// Names of the sections containing `item`.
    fn find_sections(&self, item: &str) -> Result<BTreeSet<String>, SourceError>;

    fn create_section(&mut self, section: &str) -> Result<(), SourceError>;

    fn rename_section(&mut self, section: &str, new_name: &str) -> Result<(), SourceError>;

    fn delete_section(&mut self, section: &str) -> Result<(), SourceError>;

    fn store_items(&mut self, section: &str, items: Items) -> Result<(), SourceError>;
}

/// [`SourceAdapter`] that caches what it reads from a [`SectionBackend`].
///
/// Reads fill the cache and writes keep it coherent. Once every section has
/// been loaded, lookups are answered from memory.
#[derive(Debug)]
pub struct CachedAdapter<B> {
    backend: B,
    writable: bool,
    cache: CacheState,
}

impl<B: SectionBackend> CachedAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            writable: true,
            cache: CacheState::default(),
        }
    }

    /// An adapter that rejects every write with [`SourceError::NotWritable`].
    pub fn read_only(backend: B) -> Self {
        Self {
            writable: false,
            ..Self::new(backend)
        }
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn check_writable(&self) -> Result<(), SourceError> {
        if self.writable {
            Ok(())
        } else {
            Err(SourceError::NotWritable)
        }
    }

    fn section_exists(&self, section: &str) -> Result<bool, SourceError> {
        if self.cache.loaded_sections.contains_key(section) {
            return Ok(true);
        }
        if self.cache.all_sections_loaded {
            return Ok(false);
        }
        self.backend.has_section(section)
    }

    fn check_section_existence(&self, section: &str) -> Result<(), SourceError> {
        if self.section_exists(section)? {
            Ok(())
        } else {
            Err(SourceError::SectionNotFound(section.to_string()))
        }
    }

    fn store(&mut self, section: &str, items: Items) -> Result<(), SourceError> {
        self.backend.store_items(section, items.clone())?;
        self.cache.loaded_sections.insert(section.to_string(), items);
        Ok(())
    }
}

impl<B: SectionBackend> SourceAdapter for CachedAdapter<B> {
    fn get_all_sections(&mut self) -> Result<Sections, SourceError> {
        if !self.cache.all_sections_loaded {
            trace!("loading every section from backend");
            self.cache.loaded_sections = self.backend.load_all()?;
            self.cache.all_sections_loaded = true;
        }
        Ok(self.cache.loaded_sections.clone())
    }

    fn get_section_items(&mut self, section: &str) -> Result<Items, SourceError> {
        self.check_section_existence(section)?;
        if let Some(items) = self.cache.loaded_sections.get(section) {
            return Ok(items.clone());
        }
        let items = self.backend.load_section(section)?;
        self.cache
            .loaded_sections
            .insert(section.to_string(), items.clone());
        Ok(items)
    }

    fn set_section_items(&mut self, section: &str, items: &[String]) -> Result<(), SourceError> {
        self.check_writable()?;
        self.check_section_existence(section)?;
        self.store(section, items.iter().cloned().collect())
    }

    fn include_items(&mut self, section: &str, items: &[String]) -> Result<(), SourceError> {
        self.check_writable()?;
        let mut current = self.get_section_items(section)?;
        current.extend(items.iter().cloned());
        self.store(section, current)
    }

    fn exclude_items(&mut self, section: &str, items: &[String]) -> Result<(), SourceError> {
        self.check_writable()?;
        let mut current = self.get_section_items(section)?;
        for item in items {
            if !current.remove(item) {
                return Err(SourceError::ItemNotFound {
                    section: section.to_string(),
                    item: item.clone(),
                });
            }
        }
        self.store(section, current)
    }

    fn create_section(&mut self, section: &str) -> Result<(), SourceError> {
        self.check_writable()?;
        if self.section_exists(section)? {
            return Err(SourceError::SectionExists(section.to_string()));
        }
        self.backend.create_section(section)?;
        self.cache
            .loaded_sections
            .insert(section.to_string(), Items::new());
        debug!(section, "section created");
        Ok(())
    }

    fn rename_section(&mut self, section: &str, new_name: &str) -> Result<(), SourceError> {
        self.check_writable()?;
        self.check_section_existence(section)?;
        if self.section_exists(new_name)? {
            return Err(SourceError::SectionExists(new_name.to_string()));
        }
        self.backend.rename_section(section, new_name)?;
        if let Some(items) = self.cache.loaded_sections.remove(section) {
            self.cache.loaded_sections.insert(new_name.to_string(), items);
        }
        debug!(section, new_name, "section renamed");
        Ok(())
    }

    fn delete_section(&mut self, section: &str) -> Result<(), SourceError> {
        self.check_writable()?;
        self.check_section_existence(section)?;
        self.backend.delete_section(section)?;
        self.cache.loaded_sections.remove(section);
        debug!(section, "section deleted");
        Ok(())
    }

    fn find_sections(&mut self, query: &SectionQuery) -> Result<BTreeSet<String>, SourceError> {
        let Some(item) = query.item() else {
            return Ok(BTreeSet::new());
        };

        if self.cache.all_sections_loaded {
            return Ok(self
                .cache
                .loaded_sections
                .iter()
                .filter(|(_, items)| items.contains(item))
                .map(|(section, _)| section.clone())
                .collect());
        }

        self.backend.find_sections(item)
    }

    fn reset_cache(&mut self) {
        self.cache = CacheState::default();
    }

    fn cache_state(&self) -> &CacheState {
        &self.cache
    }
}
