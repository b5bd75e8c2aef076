use std::collections::BTreeMap;
use tracing::{debug, info};

use super::{AdapterBenchmark, BenchmarkAction, BenchmarkError};
use crate::services::source::SourceData;

/// Elapsed seconds per benchmark name, for one action.
pub type ActionResults = BTreeMap<String, f64>;

/// One [`ActionResults`] per action, in the order the actions were given.
pub type ComparisonResults = Vec<ActionResults>;

/// Run every action against every benchmark under the same conditions.
///
/// Each (action, benchmark) pair is run `iterations` times with the source
/// reseeded from `source` on every iteration, so no benchmark ever sees data
/// written by an earlier run. Benchmarks are visited in name order.
///
/// At least one action and two benchmarks are required; anything less is
/// rejected before any timing happens. A failing run aborts the whole
/// comparison.
pub fn compare_benchmarks(
    iterations: u32,
    source: Option<&SourceData>,
    actions: &[&dyn BenchmarkAction],
    benchmarks: &mut BTreeMap<String, AdapterBenchmark>,
) -> Result<ComparisonResults, BenchmarkError> {
    if actions.is_empty() {
        return Err(BenchmarkError::InvalidComparison(
            "At least one action must be run".to_string(),
        ));
    }
    if benchmarks.len() < 2 {
        return Err(BenchmarkError::InvalidComparison(format!(
            "At least two benchmarks must be specified, got {}",
            benchmarks.len()
        )));
    }

    info!(
        actions = actions.len(),
        benchmarks = benchmarks.len(),
        iterations,
        "comparing source adapter benchmarks"
    );

    let mut results = Vec::with_capacity(actions.len());
    for action in actions {
        let mut action_results = ActionResults::new();
        for (name, benchmark) in benchmarks.iter_mut() {
            let elapsed = benchmark.run(*action, iterations, source)?;
            debug!(
                action = %action.label(),
                benchmark = %name,
                elapsed_secs = elapsed,
                "benchmark finished"
            );
            action_results.insert(name.clone(), elapsed);
        }
        results.push(action_results);
    }

    Ok(results)
}
