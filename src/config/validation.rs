use clap::Parser;
use figment::{Figment, providers::{Env, Format, Toml, Serialized}};
use garde::Validate;
use serde_json::json;
use std::path::PathBuf;

use super::AppConfig;
use crate::services::source::SourceData;
use crate::error::AppError;

#[derive(Parser, Clone, Debug, Default)]
#[command(name = "authz-bench", about = "Compare source adapter lookup performance")]
pub struct Cli {
    /// Path to an extra configuration file, merged over the defaults
    #[arg(long, env = "APP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Iterations per action and adapter
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Environment name, selects config/<environment>.toml
    #[arg(long, env = "ENVIRONMENT")]
    pub environment: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Settings given on the command line, shaped like [`AppConfig`].
    fn overrides(&self) -> serde_json::Value {
        let mut overrides = json!({});
        if let Some(iterations) = self.iterations {
            overrides["benchmark"] = json!({ "iterations": iterations });
        }
        if self.debug {
            overrides["logging"] = json!({ "level": "debug" });
        }
        overrides
    }
}

/// Load configuration, lowest priority first:
/// 1. `config/default.toml`
/// 2. `config/<environment>.toml` (environment defaults to "development")
/// 3. the file passed with `--config`
/// 4. `APP_` environment variables, nested with `__`
/// 5. command line flags
///
/// Anything left unset takes its built-in default. Seed maps are not merged
/// across layers: `benchmark.groups` and `benchmark.permissions` each come
/// whole from the highest layer that sets them.
///
/// Missing default and environment files are skipped, a missing `--config`
/// file is an error. The merged result is validated before it is returned.
pub fn load_config(cli: &Cli) -> Result<AppConfig, AppError> {
    let env_name = cli
        .environment
        .clone()
        .unwrap_or_else(|| "development".to_string());

    let mut layers = vec![
        Figment::from(Toml::file("config/default.toml")),
        Figment::from(Toml::file(format!("config/{}.toml", env_name))),
    ];

    if let Some(path) = &cli.config {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        layers.push(Figment::from(Toml::file(path)));
    }
    layers.push(Figment::from(Env::prefixed("APP_").split("__")));

    let figment = layers
        .iter()
        .fold(Figment::new(), |figment, layer| figment.merge(layer.clone()))
        .merge(Serialized::defaults(cli.overrides()));

    let mut config: AppConfig = figment
        .extract()
        .map_err(|e| AppError::Config(e.to_string()))?;

    if let Some(groups) = top_layer_seed(&layers, "benchmark.groups")? {
        config.benchmark.groups = groups;
    }
    if let Some(permissions) = top_layer_seed(&layers, "benchmark.permissions")? {
        config.benchmark.permissions = permissions;
    }

    config
        .validate()
        .map_err(|report| AppError::InvalidInput(report.to_string()))?;

    Ok(config)
}

/// The seed map at `key` from the highest layer that sets it.
fn top_layer_seed(layers: &[Figment], key: &str) -> Result<Option<SourceData>, AppError> {
    let Some(layer) = layers.iter().rev().find(|layer| layer.contains(key)) else {
        return Ok(None);
    };
    layer
        .extract_inner(key)
        .map(Some)
        .map_err(|e| AppError::Config(e.to_string()))
}
