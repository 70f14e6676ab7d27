/// Error types for upstream air-quality requests
use thiserror::Error;

/// HTTP status the upstream API uses to signal rate limiting.
pub const RATE_LIMITED_STATUS: u16 = 429;

/// Failure of a live upstream fetch
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// Upstream answered with a non-success status
    #[error("air-quality request failed ({status})")]
    Status { status: u16 },

    /// Request never produced a response
    #[error("air-quality request failed: {0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("failed to parse air-quality response: {0}")]
    ResponseParse(String),

    /// Year has no valid calendar range
    #[error("invalid year: {0}")]
    InvalidYear(i32),
}

impl UpstreamError {
    /// True when the upstream asked us to slow down.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, UpstreamError::Status { status } if *status == RATE_LIMITED_STATUS)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

/// Type alias for Results using UpstreamError
pub type Result<T> = std::result::Result<T, UpstreamError>;

#[cfg(test)]
mod tests {
    use super::UpstreamError;

    #[test]
    fn test_rate_limit_detection() {
        assert!(UpstreamError::Status { status: 429 }.is_rate_limited());
        assert!(!UpstreamError::Status { status: 500 }.is_rate_limited());
        assert!(!UpstreamError::Transport("429".into()).is_rate_limited());
    }

    #[test]
    fn test_message_carries_status() {
        let message = UpstreamError::Status { status: 429 }.to_string();
        assert_eq!(message, "air-quality request failed (429)");
    }
}
