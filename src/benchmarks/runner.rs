use std::time::{Duration, Instant};
use tracing::{debug, trace};

use super::{BenchmarkAction, BenchmarkError};
use crate::services::source::{SourceAdapter, SourceData, SourceError};

/// Benchmark over a single source adapter.
///
/// The adapter's source is reset before every iteration: reseeded when seed
/// data is given, and its cache is always cleared so every timed run pays
/// the same cold-cache cost.
pub struct AdapterBenchmark {
    adapter: Box<dyn SourceAdapter>,
}

impl AdapterBenchmark {
    pub fn new(adapter: impl SourceAdapter + 'static) -> Self {
        Self {
            adapter: Box::new(adapter),
        }
    }

    pub fn adapter(&self) -> &dyn SourceAdapter {
        self.adapter.as_ref()
    }

    pub fn adapter_mut(&mut self) -> &mut dyn SourceAdapter {
        self.adapter.as_mut()
    }

    /// Total time, in seconds, taken by `iterations` runs of `action`.
    ///
    /// The result is a sum, not a mean. Resetting the source is not timed.
    /// The first failing iteration aborts the whole run.
    pub fn run(
        &mut self,
        action: &dyn BenchmarkAction,
        iterations: u32,
        source: Option<&SourceData>,
    ) -> Result<f64, BenchmarkError> {
        let mut elapsed = Duration::ZERO;

        for iteration in 0..iterations {
            self.reset_source(source)?;

            let start = Instant::now();
            action.run(self.adapter.as_mut())?;
            elapsed += start.elapsed();

            trace!(iteration, action = %action.label(), "benchmark iteration complete");
        }

        debug!(
            action = %action.label(),
            iterations,
            elapsed_secs = elapsed.as_secs_f64(),
            "benchmark run complete"
        );
        Ok(elapsed.as_secs_f64())
    }

    /// Replace the adapter's source with `source`, if given, and reset its
    /// cache either way.
    pub fn reset_source(&mut self, source: Option<&SourceData>) -> Result<(), SourceError> {
        if let Some(source) = source {
            let existing = self.adapter.get_all_sections()?;
            for section in existing.keys() {
                self.adapter.delete_section(section)?;
            }
            for (section, items) in source {
                self.adapter.create_section(section)?;
                self.adapter.set_section_items(section, items)?;
            }
        }
        self.adapter.reset_cache();
        Ok(())
    }
}
