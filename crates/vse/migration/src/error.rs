use thiserror::Error;

/// Errors from the migration engine.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("unknown migration target: {0}")]
    UnknownTarget(String),
}

pub type MigrationResult<T> = Result<T, MigrationError>;
