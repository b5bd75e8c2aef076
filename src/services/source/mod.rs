//! Source adapters
//!
//! A source adapter is a sectioned key/value store that resolves group and
//! permission membership: each section (a group, a permission) holds a set
//! of items (users, groups). The harness in [`crate::benchmarks`] and the
//! built-in actions only talk to [`SourceAdapter`].

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::auth::Credentials;

pub mod adapter;
pub mod memory;

pub use adapter::*;
pub use memory::*;

/// Items of one section.
pub type Items = BTreeSet<String>;

/// Every section of a source, by name.
pub type Sections = BTreeMap<String, Items>;

/// Seed data used to repopulate a source: section name to its items.
pub type SourceData = BTreeMap<String, Vec<String>>;

/// What [`SourceAdapter::find_sections`] looks up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionQuery {
    /// Sections containing the user identified by the credentials.
    /// Anonymous credentials match nothing.
    Credentials(Credentials),
    /// Sections containing this item.
    Item(String),
}

impl SectionQuery {
    /// The item to look for, if the query can match anything at all.
    pub fn item(&self) -> Option<&str> {
        match self {
            SectionQuery::Credentials(credentials) => credentials.user_id.as_deref(),
            SectionQuery::Item(item) => Some(item),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Section already exists: {0}")]
    SectionExists(String),

    #[error("Item \"{item}\" not found in section \"{section}\"")]
    ItemNotFound { section: String, item: String },

    #[error("Source is read-only")]
    NotWritable,

    #[error("Source backend error: {0}")]
    Backend(String),
}

/// Cache owned by an adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheState {
    /// Sections loaded so far, with their items.
    pub loaded_sections: Sections,
    /// Whether every section in the source has been loaded.
    pub all_sections_loaded: bool,
}

impl CacheState {
    /// True right after a reset.
    pub fn is_cold(&self) -> bool {
        self.loaded_sections.is_empty() && !self.all_sections_loaded
    }
}

pub trait SourceAdapter {
    fn get_all_sections(&mut self) -> Result<Sections, SourceError>;

    fn get_section_items(&mut self, section: &str) -> Result<Items, SourceError>;

    /// Replace the items of an existing section.
    fn set_section_items(&mut self, section: &str, items: &[String]) -> Result<(), SourceError>;

    /// Add items to an existing section. Items already present are kept.
    fn include_items(&mut self, section: &str, items: &[String]) -> Result<(), SourceError>;

    /// Remove items from an existing section. Every item must be present.
    fn exclude_items(&mut self, section: &str, items: &[String]) -> Result<(), SourceError>;

    fn create_section(&mut self, section: &str) -> Result<(), SourceError>;

    fn rename_section(&mut self, section: &str, new_name: &str) -> Result<(), SourceError>;

    fn delete_section(&mut self, section: &str) -> Result<(), SourceError>;

    /// Names of the sections matching `query`.
    fn find_sections(&mut self, query: &SectionQuery) -> Result<BTreeSet<String>, SourceError>;

    /// Drop every cached section and clear the all-loaded flag. The backing
    /// store is left untouched.
    fn reset_cache(&mut self);

    fn cache_state(&self) -> &CacheState;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_item_from_credentials() {
        let query = SectionQuery::Credentials(Credentials::for_user("alice"));
        assert_eq!(query.item(), Some("alice"));
    }

    #[test]
    fn test_anonymous_query_has_no_item() {
        let query = SectionQuery::Credentials(Credentials::default());
        assert_eq!(query.item(), None);
    }

    #[test]
    fn test_query_item_direct() {
        let query = SectionQuery::Item("admins".to_string());
        assert_eq!(query.item(), Some("admins"));
    }

    #[test]
    fn test_default_cache_state_is_cold() {
        assert!(CacheState::default().is_cold());

        let warm = CacheState {
            loaded_sections: Sections::new(),
            all_sections_loaded: true,
        };
        assert!(!warm.is_cold());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SourceError::SectionNotFound("admins".to_string()).to_string(),
            "Section not found: admins"
        );
        assert_eq!(
            SourceError::ItemNotFound {
                section: "admins".to_string(),
                item: "mallory".to_string(),
            }
            .to_string(),
            "Item \"mallory\" not found in section \"admins\""
        );
    }
}
