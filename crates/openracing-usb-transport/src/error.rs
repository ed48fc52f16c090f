//! Transport error types.

use thiserror::Error;

use crate::transfer::{CompletionStatus, Direction, Endpoint};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Buffer or transfer handle could not be allocated; nothing was queued.
    #[error("resource exhaustion: {0}")]
    ResourceExhaustion(String),

    /// The device did not complete the transfer in time; it was cancelled.
    #[error("{endpoint} {direction} timed out after {timeout_ms}ms")]
    Timeout {
        endpoint: Endpoint,
        direction: Direction,
        timeout_ms: u64,
    },

    /// The device completed the transfer with an error status.
    #[error("{endpoint} {direction} rejected with status {status}")]
    Rejected {
        endpoint: Endpoint,
        direction: Direction,
        status: CompletionStatus,
    },

    /// The transport dropped the transfer without completing it.
    #[error("device disconnected")]
    Disconnected,

    /// The transport has no interrupt OUT endpoint to send on.
    #[error("no interrupt OUT endpoint available")]
    NoInterruptEndpoint,
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// The device answered, but with an error.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Whether the caller may reasonably try the same transfer again.
    /// The transport itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::ResourceExhaustion(_))
    }
}

/// A setup sequence aborted at step `index`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("setup data at index {index} couldn't be sent: {source}")]
pub struct SetupError {
    pub index: usize,
    #[source]
    pub source: TransportError,
}

pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_distinct_from_rejected() {
        let timeout = TransportError::Timeout {
            endpoint: Endpoint::new(0x02),
            direction: Direction::Out,
            timeout_ms: 5000,
        };
        let rejected = TransportError::Rejected {
            endpoint: Endpoint::new(0x02),
            direction: Direction::Out,
            status: CompletionStatus::Stall,
        };
        assert!(timeout.is_timeout());
        assert!(!timeout.is_rejected());
        assert!(rejected.is_rejected());
        assert!(!rejected.is_timeout());
        assert!(timeout.is_retryable());
        assert!(!rejected.is_retryable());
    }

    #[test]
    fn test_display() {
        let err = SetupError {
            index: 1,
            source: TransportError::Timeout {
                endpoint: Endpoint::new(0x02),
                direction: Direction::Out,
                timeout_ms: 20,
            },
        };
        assert_eq!(
            err.to_string(),
            "setup data at index 1 couldn't be sent: ep2 out timed out after 20ms"
        );
    }
}
