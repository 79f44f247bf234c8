use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BridgeError {
    #[error("cost component {component} must be non-negative, got {value}")]
    NegativeCost { component: &'static str, value: f64 },
}

pub type BridgeResult<T> = Result<T, BridgeError>;
