pub mod auth;
pub mod benchmarks;
pub mod config;
pub mod error;
pub mod helpers;
pub mod logging;
pub mod services;

pub use config::*;
pub use error::*;
pub use helpers::*;

use std::panic;

use crate::benchmarks::{run_configured_benchmarks, ComparisonReport};

/// Library entry point for `authz-bench`.
///
/// Loads configuration from `cli`, installs logging and a panic hook, then
/// compares the in-memory source adapters with the configured data.
pub fn run(cli: &Cli) -> Result<Vec<ComparisonReport>, AppError> {
    let config = load_config(cli)?;

    // Initialize logging FIRST
    logging::setup_tracing(&config.logging)?;

    // Panic hook after logging so it can use it
    panic::set_hook(Box::new(|panic_info| {
        ::tracing::error!(?panic_info, "FATAL: Panic occurred");
        std::process::exit(1);
    }));

    ::tracing::info!(
        iterations = config.benchmark.iterations,
        user_id = %config.benchmark.user_id,
        group_id = %config.benchmark.group_id,
        "authz-bench starting"
    );

    Ok(run_configured_benchmarks(&config.benchmark)?)
}
