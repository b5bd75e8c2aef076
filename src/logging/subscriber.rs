use anyhow::{bail, Result};
use tracing_subscriber::{
    filter::Directive, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::LoggingConfig;

const AUDIT_TARGET: &str = "audit";

/// Install the global subscriber for `authz-bench`.
///
/// Log lines always go to stderr; stdout carries the comparison report.
/// Format is "json" or "pretty". `RUST_LOG` takes precedence over the
/// configured level, and the `audit` target is then pinned by
/// [`LoggingConfig::audit`].
pub fn setup_tracing(config: &LoggingConfig) -> Result<()> {
    let output = match config.format.as_str() {
        "json" => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        "pretty" => fmt::layer()
            .pretty()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        other => bail!("Unsupported log format: {}. Use 'json' or 'pretty'", other),
    };

    tracing_subscriber::registry()
        .with(output)
        .with(build_filter(config)?)
        .try_init()?;

    Ok(())
}

/// Level filter with the audit target set independently of the base level.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    Ok(base.add_directive(audit_directive(config.audit)?))
}

fn audit_directive(enabled: bool) -> Result<Directive> {
    let level = if enabled { "info" } else { "off" };
    Ok(format!("{}={}", AUDIT_TARGET, level).parse()?)
}
