pub mod source;

pub use source::{SectionQuery, SourceAdapter, SourceData, SourceError};
