//! Output report structure as enumerated by the host HID layer.
//!
//! Descriptor parsing happens upstream; this crate only sees the already
//! parsed report list, in descriptor order.

use serde::{Deserialize, Serialize};

/// HID usage carrying FF data on most Thrustmaster devices
/// (Generic Desktop page, usage 0xbb).
pub const USAGE_GENDESK_FF: u32 = 0x0001_00BB;

/// Vendor-page FF usage seen on some gamepads.
pub const USAGE_VENDOR_FF: u32 = 0xFF00_000A;

/// Usages accepted as an FF field during discovery.
pub const FF_USAGES: [u32; 2] = [USAGE_GENDESK_FF, USAGE_VENDOR_FF];

pub fn is_ff_usage(usage: u32) -> bool {
    FF_USAGES.contains(&usage)
}

/// One field of an output report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportField {
    /// Usages in declaration order. Only the first one classifies the field.
    pub usages: Vec<u32>,
    pub logical_minimum: i32,
    pub logical_maximum: i32,
    /// Number of values (HID report count) the field carries.
    pub report_count: usize,
}

impl ReportField {
    pub fn new(
        usage: u32,
        logical_minimum: i32,
        logical_maximum: i32,
        report_count: usize,
    ) -> Self {
        Self {
            usages: vec![usage],
            logical_minimum,
            logical_maximum,
            report_count,
        }
    }

    /// A padding or constant field with no usages.
    pub fn unnamed(report_count: usize) -> Self {
        Self {
            usages: Vec::new(),
            logical_minimum: 0,
            logical_maximum: 0,
            report_count,
        }
    }

    pub fn primary_usage(&self) -> Option<u32> {
        self.usages.first().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputReport {
    pub id: u8,
    pub fields: Vec<ReportField>,
}

impl OutputReport {
    pub fn new(id: u8, fields: Vec<ReportField>) -> Self {
        Self { id, fields }
    }
}
