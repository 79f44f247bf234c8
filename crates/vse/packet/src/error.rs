use thiserror::Error;

/// Errors from packet construction and decoding.
#[derive(Debug, Error)]
pub enum PacketError {
    /// A construction-time invariant was violated.
    #[error("invalid packet: {0}")]
    InvalidPacket(String),

    /// Malformed text or JSON serialization.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for PacketError {
    fn from(e: serde_json::Error) -> Self {
        PacketError::Parse(e.to_string())
    }
}

/// Convenience type alias for packet results.
pub type PacketResult<T> = Result<T, PacketError>;
