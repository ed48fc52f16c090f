//! FF field discovery and the per-device field binding.
//!
//! A device gets exactly one binding. Discovery is first-match: the first
//! field that passes validation wins, and later candidates are logged and
//! ignored rather than compared.

use tracing::{debug, warn};

use crate::error::{FieldError, ProtocolError, ProtocolResult};
use crate::report::{OutputReport, ReportField, is_ff_usage};

/// Largest value count a field may declare (the HID usage limit).
pub const MAX_FIELD_VALUES: usize = 12288;

/// The output report field that carries FF values for one device.
///
/// Owns the value array written by the dispatcher and transmitted as the
/// report payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    report_id: u8,
    field_index: usize,
    logical_minimum: i32,
    logical_maximum: i32,
    values: Vec<i32>,
}

impl FieldBinding {
    /// Validate `field` and bind it.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] if the field has fewer than two values, more
    /// than [`MAX_FIELD_VALUES`], or its logical maximum does not exceed its
    /// logical minimum.
    pub fn new(report_id: u8, field_index: usize, field: &ReportField) -> Result<Self, FieldError> {
        validate(field)?;
        Ok(Self {
            report_id,
            field_index,
            logical_minimum: field.logical_minimum,
            logical_maximum: field.logical_maximum,
            values: vec![0; field.report_count],
        })
    }

    pub fn report_id(&self) -> u8 {
        self.report_id
    }

    pub fn field_index(&self) -> usize {
        self.field_index
    }

    pub fn logical_minimum(&self) -> i32 {
        self.logical_minimum
    }

    pub fn logical_maximum(&self) -> i32 {
        self.logical_maximum
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// Write the two leading values. Trailing values are left untouched.
    pub fn set_pair(&mut self, first: i32, second: i32) {
        if let [a, b, ..] = self.values.as_mut_slice() {
            *a = first;
            *b = second;
        }
    }

    fn is_same(&self, report_id: u8, field_index: usize) -> bool {
        self.report_id == report_id && self.field_index == field_index
    }
}

fn validate(field: &ReportField) -> Result<(), FieldError> {
    if field.report_count < 2 {
        return Err(FieldError::TooFewValues {
            value_count: field.report_count,
        });
    }
    if field.report_count > MAX_FIELD_VALUES {
        return Err(FieldError::TooManyValues {
            value_count: field.report_count,
            max: MAX_FIELD_VALUES,
        });
    }
    if field.logical_maximum <= field.logical_minimum {
        return Err(FieldError::DegenerateRange {
            logical_minimum: field.logical_minimum,
            logical_maximum: field.logical_maximum,
        });
    }
    Ok(())
}

/// Scan `reports` in order and bind the first valid FF field.
///
/// Unknown usages and invalid or conflicting FF fields are logged and
/// skipped; none of them abort the scan.
///
/// # Errors
///
/// [`ProtocolError::FieldNotFound`] if no report yields a valid field.
pub fn discover(reports: &[OutputReport]) -> ProtocolResult<FieldBinding> {
    let mut binding: Option<FieldBinding> = None;

    for report in reports {
        for (field_index, field) in report.fields.iter().enumerate() {
            let Some(usage) = field.primary_usage() else {
                continue;
            };

            if !is_ff_usage(usage) {
                warn!(
                    report_id = report.id,
                    field_index, "ignoring unknown output usage {usage:08x}"
                );
                continue;
            }

            if let Err(reason) = validate(field) {
                warn!(report_id = report.id, field_index, "ignoring FF field: {reason}");
                continue;
            }

            match &binding {
                Some(bound) if bound.report_id != report.id => {
                    warn!(report_id = report.id, field_index, "ignoring FF field in other report");
                }
                Some(bound) if !bound.is_same(report.id, field_index) => {
                    warn!(report_id = report.id, field_index, "ignoring duplicate FF field");
                }
                Some(_) => {}
                None => {
                    debug!(
                        report_id = report.id,
                        field_index,
                        logical_minimum = field.logical_minimum,
                        logical_maximum = field.logical_maximum,
                        "bound FF field"
                    );
                    binding = Some(FieldBinding::new(report.id, field_index, field).map_err(
                        |reason| ProtocolError::InvalidField {
                            report_id: report.id,
                            field_index,
                            reason,
                        },
                    )?);
                }
            }
        }
    }

    binding.ok_or(ProtocolError::FieldNotFound)
}

/// Bind field 0 of the first output report without looking at usages.
///
/// Used by models whose descriptor is known to put the FF payload first.
///
/// # Errors
///
/// [`ProtocolError::NoOutputReports`] when there is nothing to bind, and
/// [`ProtocolError::InvalidField`] when the field breaks the binding
/// invariants.
pub fn bind_first_output_field(reports: &[OutputReport]) -> ProtocolResult<FieldBinding> {
    let report = reports.first().ok_or(ProtocolError::NoOutputReports)?;
    let field = report.fields.first().ok_or(ProtocolError::FieldNotFound)?;
    FieldBinding::new(report.id, 0, field).map_err(|reason| ProtocolError::InvalidField {
        report_id: report.id,
        field_index: 0,
        reason,
    })
}
