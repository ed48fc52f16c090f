//! Driver error type and its classification.

use core::fmt;

use openracing_usb_transport::{SetupError, TransportError};
use racing_wheel_hid_tmff_protocol::{ProtocolError, ReportWriteError};

use crate::state::LifecycleState;

/// Top-level error returned by [`crate::DeviceHandle`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    /// A single transfer failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Bring-up traffic aborted part way.
    #[error("setup failed: {0}")]
    Setup(#[from] SetupError),

    /// No usable FF field, or a malformed one.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The host report transmission primitive failed.
    #[error("report write failed: {0}")]
    ReportWrite(#[from] ReportWriteError),

    /// The operation isn't allowed in the current lifecycle state.
    #[error("{operation} not allowed in state {state}")]
    InvalidState {
        state: LifecycleState,
        operation: &'static str,
    },

    /// The model has no such capability.
    #[error("{model} does not support {feature}")]
    FeatureNotSupported {
        model: String,
        feature: &'static str,
    },

    /// Driver configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The input layer refused to open.
    #[error("input open failed: {0}")]
    InputOpen(String),
}

impl DriverError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DriverError::Transport(e) => transport_category(e),
            DriverError::Setup(e) => transport_category(&e.source),
            DriverError::Protocol(_) => ErrorCategory::ProtocolMismatch,
            DriverError::ReportWrite(_) => ErrorCategory::TransportRejected,
            DriverError::InvalidState { .. } => ErrorCategory::InvalidState,
            DriverError::FeatureNotSupported { .. } => ErrorCategory::InvalidParameter,
            DriverError::Config(_) => ErrorCategory::InvalidParameter,
            DriverError::InputOpen(_) => ErrorCategory::InvalidState,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::ProtocolMismatch => ErrorSeverity::Critical,
            ErrorCategory::ResourceExhaustion
            | ErrorCategory::TransportTimeout
            | ErrorCategory::TransportRejected => ErrorSeverity::Error,
            ErrorCategory::InvalidState | ErrorCategory::InvalidParameter => {
                ErrorSeverity::Warning
            }
        }
    }

    /// The device may still work after this error.
    pub fn is_recoverable(&self) -> bool {
        self.severity() < ErrorSeverity::Critical
    }

    pub(crate) fn invalid_state(state: LifecycleState, operation: &'static str) -> Self {
        DriverError::InvalidState { state, operation }
    }
}

fn transport_category(error: &TransportError) -> ErrorCategory {
    match error {
        TransportError::ResourceExhaustion(_) => ErrorCategory::ResourceExhaustion,
        TransportError::Timeout { .. } => ErrorCategory::TransportTimeout,
        TransportError::Rejected { .. }
        | TransportError::Disconnected
        | TransportError::NoInterruptEndpoint => ErrorCategory::TransportRejected,
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Buffer or transfer allocation failed
    ResourceExhaustion = 0,
    /// Device did not answer in time
    TransportTimeout = 1,
    /// Device answered with an error
    TransportRejected = 2,
    /// No valid FF field
    ProtocolMismatch = 3,
    /// Out-of-bounds or unsupported request
    InvalidParameter = 4,
    /// Wrong lifecycle state
    InvalidState = 5,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::ResourceExhaustion => write!(f, "ResourceExhaustion"),
            ErrorCategory::TransportTimeout => write!(f, "TransportTimeout"),
            ErrorCategory::TransportRejected => write!(f, "TransportRejected"),
            ErrorCategory::ProtocolMismatch => write!(f, "ProtocolMismatch"),
            ErrorCategory::InvalidParameter => write!(f, "InvalidParameter"),
            ErrorCategory::InvalidState => write!(f, "InvalidState"),
        }
    }
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    Info = 0,
    Warning = 1,
    Error = 2,
    /// The device can't reach READY
    Critical = 3,
}

pub type DriverResult<T> = Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;
    use openracing_usb_transport::{CompletionStatus, Direction, Endpoint};

    #[test]
    fn test_categories_follow_transport_failure() {
        let timeout: DriverError = TransportError::Timeout {
            endpoint: Endpoint::new(0x02),
            direction: Direction::Out,
            timeout_ms: 5000,
        }
        .into();
        assert_eq!(timeout.category(), ErrorCategory::TransportTimeout);

        let rejected: DriverError = SetupError {
            index: 3,
            source: TransportError::Rejected {
                endpoint: Endpoint::new(0x02),
                direction: Direction::Out,
                status: CompletionStatus::Stall,
            },
        }
        .into();
        assert_eq!(rejected.category(), ErrorCategory::TransportRejected);

        let exhausted: DriverError = TransportError::ResourceExhaustion("urb".into()).into();
        assert_eq!(exhausted.category(), ErrorCategory::ResourceExhaustion);
    }

    #[test]
    fn test_protocol_mismatch_is_not_recoverable() {
        let err = DriverError::from(ProtocolError::FieldNotFound);
        assert_eq!(err.category(), ErrorCategory::ProtocolMismatch);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_invalid_state_display() {
        let err = DriverError::invalid_state(LifecycleState::Destroyed, "play");
        assert_eq!(err.to_string(), "play not allowed in state DESTROYED");
        assert!(err.is_recoverable());
    }
}
