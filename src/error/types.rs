use thiserror::Error;

use crate::benchmarks::BenchmarkError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Benchmark(#[from] BenchmarkError),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Process exit code for `authz-bench`. Bad configuration is reported as
    /// a usage error, anything that fails after startup as a general failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) | AppError::InvalidInput(_) => 2,
            AppError::Benchmark(_) | AppError::Internal(_) => 1,
        }
    }
}
