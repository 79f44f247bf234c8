use thiserror::Error;

/// Errors from scoring and monitoring.
#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("vector dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("window size must be positive, got {0}")]
    InvalidWindow(usize),

    #[error("unknown metric field: {0}")]
    UnknownField(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type MetricsResult<T> = Result<T, MetricsError>;
