//! Protocol-level error types.

use thiserror::Error;

/// Why a candidate FF field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field carries {value_count} values, at least 2 required")]
    TooFewValues { value_count: usize },

    #[error("field carries {value_count} values, at most {max} allowed")]
    TooManyValues { value_count: usize, max: usize },

    #[error("degenerate logical range [{logical_minimum}, {logical_maximum}]")]
    DegenerateRange {
        logical_minimum: i32,
        logical_maximum: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("can't find FF field in output reports")]
    FieldNotFound,

    #[error("device exposes no output reports")]
    NoOutputReports,

    #[error("invalid FF field {field_index} in report {report_id:#04x}: {reason}")]
    InvalidField {
        report_id: u8,
        field_index: usize,
        reason: FieldError,
    },

    #[error("setup packet is {len} bytes, maximum is {max}")]
    PacketTooLong { len: usize, max: usize },

    #[error("{0}")]
    InvalidProfile(String),
}

/// Failure of the host's report transmission primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("report {report_id:#04x} write failed: {message}")]
pub struct ReportWriteError {
    pub report_id: u8,
    pub message: String,
}

impl ReportWriteError {
    pub fn new(report_id: u8, message: impl Into<String>) -> Self {
        Self {
            report_id,
            message: message.into(),
        }
    }
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
