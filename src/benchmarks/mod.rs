//! Source adapter benchmarks
//!
//! Measures how long interchangeable
//! [`SourceAdapter`](crate::services::source::SourceAdapter) implementations take
//! to answer the same queries over the same data.
//!
//! - [`AdapterBenchmark`] wraps one adapter and times repeated runs of an
//!   action. Before every iteration the adapter's source can be reseeded,
//!   and its cache is always reset, so each run starts cold.
//! - [`compare_benchmarks`] runs a list of actions across two or more named
//!   benchmarks with identical seed data and iteration counts.
//! - [`GroupsRetrievalAction`] and [`PermissionsRetrievalAction`] exercise
//!   the two lookups authorization needs most.
//!
//! Everything runs sequentially on the calling thread. Running benchmarks in
//! parallel would make their timings incomparable.
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use authz_gate::benchmarks::{compare_benchmarks, AdapterBenchmark, BenchmarkAction, GroupsRetrievalAction};
//! use authz_gate::services::source::{indexed_adapter, scan_adapter, SourceData};
//!
//! let mut seed = SourceData::new();
//! seed.insert("admins".to_string(), vec!["alice".to_string(), "bob".to_string()]);
//!
//! let mut benchmarks = BTreeMap::new();
//! benchmarks.insert("scan".to_string(), AdapterBenchmark::new(scan_adapter()));
//! benchmarks.insert("indexed".to_string(), AdapterBenchmark::new(indexed_adapter()));
//!
//! let action = GroupsRetrievalAction::new("alice");
//! let actions: [&dyn BenchmarkAction; 1] = [&action];
//! let results = compare_benchmarks(5, Some(&seed), &actions, &mut benchmarks).unwrap();
//! assert_eq!(results.len(), 1);
//! assert!(results[0]["scan"] >= 0.0);
//! ```

use thiserror::Error;

use crate::services::source::SourceError;

pub mod actions;
pub mod compare;
pub mod report;
pub mod runner;

pub use actions::*;
pub use compare::*;
pub use report::*;
pub use runner::*;

#[derive(Debug, Error)]
pub enum BenchmarkError {
    /// An action or the adapter failed during a run. No partial timing is
    /// available.
    #[error("Benchmark run aborted: {0}")]
    Source(#[from] SourceError),

    #[error("Invalid comparison: {0}")]
    InvalidComparison(String),
}
