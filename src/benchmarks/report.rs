use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use super::{
    compare_benchmarks, ActionResults, AdapterBenchmark, BenchmarkAction, BenchmarkError,
    ComparisonResults, GroupsRetrievalAction, PermissionsRetrievalAction,
};
use crate::config::BenchmarkConfig;
use crate::services::source::{indexed_adapter, scan_adapter};

/// Comparison results for one action, labelled for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub action: String,
    pub iterations: u32,
    pub results: ActionResults,
}

impl ComparisonReport {
    /// Pair each action with its results, preserving order.
    pub fn from_results(
        actions: &[&dyn BenchmarkAction],
        iterations: u32,
        results: ComparisonResults,
    ) -> Vec<Self> {
        actions
            .iter()
            .zip(results)
            .map(|(action, results)| Self {
                action: action.label(),
                iterations,
                results,
            })
            .collect()
    }

    /// Name of the benchmark with the lowest total time.
    pub fn fastest(&self) -> Option<&str> {
        self.results
            .iter()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(name, _)| name.as_str())
    }
}

/// One benchmark per in-memory backend.
pub fn in_memory_benchmarks() -> BTreeMap<String, AdapterBenchmark> {
    let mut benchmarks = BTreeMap::new();
    benchmarks.insert("indexed".to_string(), AdapterBenchmark::new(indexed_adapter()));
    benchmarks.insert("scan".to_string(), AdapterBenchmark::new(scan_adapter()));
    benchmarks
}

/// Compare the in-memory backends on group and permission lookups.
///
/// Group lookups run over the configured group source and permission lookups
/// over the permission source.
pub fn run_configured_benchmarks(
    config: &BenchmarkConfig,
) -> Result<Vec<ComparisonReport>, BenchmarkError> {
    let mut benchmarks = in_memory_benchmarks();
    let mut reports = Vec::with_capacity(2);

    let groups = GroupsRetrievalAction::new(config.user_id.as_str());
    let actions: [&dyn BenchmarkAction; 1] = [&groups];
    let results = compare_benchmarks(config.iterations, Some(&config.groups), &actions, &mut benchmarks)?;
    reports.extend(ComparisonReport::from_results(&actions, config.iterations, results));

    let permissions = PermissionsRetrievalAction::new(config.group_id.as_str());
    let actions: [&dyn BenchmarkAction; 1] = [&permissions];
    let results = compare_benchmarks(
        config.iterations,
        Some(&config.permissions),
        &actions,
        &mut benchmarks,
    )?;
    reports.extend(ComparisonReport::from_results(&actions, config.iterations, results));

    for report in &reports {
        info!(
            action = %report.action,
            fastest = report.fastest().unwrap_or_default(),
            "comparison complete"
        );
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_follow_action_order() {
        let groups = GroupsRetrievalAction::new("alice");
        let permissions = PermissionsRetrievalAction::new("admins");
        let actions: [&dyn BenchmarkAction; 2] = [&groups, &permissions];
        let results = vec![
            ActionResults::from([("a".to_string(), 0.5), ("b".to_string(), 0.25)]),
            ActionResults::from([("a".to_string(), 0.1), ("b".to_string(), 0.2)]),
        ];

        let reports = ComparisonReport::from_results(&actions, 10, results);

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].action, "groups:alice");
        assert_eq!(reports[0].fastest(), Some("b"));
        assert_eq!(reports[1].action, "permissions:admins");
        assert_eq!(reports[1].fastest(), Some("a"));
        assert_eq!(reports[1].iterations, 10);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = ComparisonReport {
            action: "groups:alice".to_string(),
            iterations: 3,
            results: ActionResults::from([("scan".to_string(), 0.5)]),
        };

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["action"], "groups:alice");
        assert_eq!(json["iterations"], 3);
        assert_eq!(json["results"]["scan"], 0.5);
    }

    #[test]
    fn test_empty_report_has_no_fastest() {
        let report = ComparisonReport {
            action: "custom".to_string(),
            iterations: 1,
            results: ActionResults::new(),
        };

        assert_eq!(report.fastest(), None);
    }

    #[test]
    fn test_run_configured_benchmarks_with_defaults() {
        let config = BenchmarkConfig {
            iterations: 3,
            ..BenchmarkConfig::default()
        };

        let reports = run_configured_benchmarks(&config).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].action, format!("groups:{}", config.user_id));
        assert_eq!(reports[1].action, format!("permissions:{}", config.group_id));
        for report in &reports {
            let names: Vec<&str> = report.results.keys().map(String::as_str).collect();
            assert_eq!(names, vec!["indexed", "scan"]);
            assert!(report.results.values().all(|elapsed| *elapsed >= 0.0));
        }
    }
}
