use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::services::source::SourceData;

#[derive(Debug, Deserialize, Serialize, Validate, Default)]
pub struct AppConfig {
    #[garde(dive)]
    #[serde(default)]
    pub logging: LoggingConfig,

    #[garde(dive)]
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct LoggingConfig {
    #[garde(length(min = 1))]
    #[serde(default = "default_log_level")]
    pub level: String,  // trace, debug, info, warn, error

    #[garde(pattern(r"^(json|pretty)$"))]
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Keep authorization audit lines at info even when `level` is quieter.
    /// When false the `audit` target is switched off.
    #[garde(skip)]
    #[serde(default = "default_audit")]
    pub audit: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_audit() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            audit: default_audit(),
        }
    }
}

/// What `authz-bench` compares and with which data.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct BenchmarkConfig {
    #[garde(range(min = 1, max = 1_000_000))]
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// User whose groups are looked up.
    #[garde(length(min = 1))]
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Group whose permissions are looked up.
    #[garde(length(min = 1))]
    #[serde(default = "default_group_id")]
    pub group_id: String,

    /// Group source: group name to member user ids.
    #[garde(custom(validate_source))]
    #[serde(default = "default_groups")]
    pub groups: SourceData,

    /// Permission source: permission name to granted group ids.
    #[garde(custom(validate_source))]
    #[serde(default = "default_permissions")]
    pub permissions: SourceData,
}

fn default_iterations() -> u32 {
    100
}

fn default_user_id() -> String {
    "alice".to_string()
}

fn default_group_id() -> String {
    "admins".to_string()
}

fn source(entries: &[(&str, &[&str])]) -> SourceData {
    entries
        .iter()
        .map(|(section, items)| {
            (
                section.to_string(),
                items.iter().map(|item| item.to_string()).collect(),
            )
        })
        .collect()
}

fn default_groups() -> SourceData {
    source(&[
        ("admins", &["alice", "bob"]),
        ("developers", &["bob", "carol", "dave"]),
        ("trolls", &["mallory"]),
    ])
}

fn default_permissions() -> SourceData {
    source(&[
        ("edit-site", &["admins"]),
        ("commit", &["admins", "developers"]),
        ("see-site", &["admins", "developers", "trolls"]),
    ])
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            user_id: default_user_id(),
            group_id: default_group_id(),
            groups: default_groups(),
            permissions: default_permissions(),
        }
    }
}

// Section names and items must be non-empty
fn validate_source(value: &SourceData, _: &()) -> garde::Result {
    for (section, items) in value {
        if section.trim().is_empty() {
            return Err(garde::Error::new("Section names must not be empty"));
        }
        if items.iter().any(|item| item.trim().is_empty()) {
            return Err(garde::Error::new(format!(
                "Section \"{}\" contains an empty item",
                section
            )));
        }
    }
    Ok(())
}
