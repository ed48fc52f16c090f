//! Effect dispatch: scale an effect into the bound field and send the report.

use tracing::debug;

use crate::binding::FieldBinding;
use crate::effects::{ConstantEffect, EffectDescriptor, RumbleEffect};
use crate::error::ReportWriteError;
use crate::scaling::{scale_signed8, scale_unsigned16};

/// Host primitive that transmits an output report (HID SET_REPORT).
///
/// Implementations queue the report and return; they are never subject to
/// the transfer timeout used for setup traffic.
pub trait ReportWriter {
    /// Send report `report_id` carrying `values`.
    fn write_report(&mut self, report_id: u8, values: &[i32]) -> Result<(), ReportWriteError>;
}

/// Result of a successful play call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Field values were written and one report was transmitted.
    Sent,
    /// The effect kind is not handled by the field protocol; nothing was sent.
    Ignored,
}

/// Per-model quirks that change how values land in the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectDispatcher {
    motor_swap: bool,
}

impl EffectDispatcher {
    pub fn new(motor_swap: bool) -> Self {
        Self { motor_swap }
    }

    pub fn motor_swap(&self) -> bool {
        self.motor_swap
    }

    /// Write `effect` into `binding` and transmit exactly one report.
    ///
    /// Effect kinds other than constant and rumble return
    /// [`PlayOutcome::Ignored`] without touching the field.
    ///
    /// # Errors
    ///
    /// Propagates the writer's failure. The field keeps the new values.
    pub fn play<W>(
        &self,
        binding: &mut FieldBinding,
        effect: &EffectDescriptor,
        writer: &mut W,
    ) -> Result<PlayOutcome, ReportWriteError>
    where
        W: ReportWriter + ?Sized,
    {
        let (first, second) = match effect {
            EffectDescriptor::Constant(constant) => self.constant_values(binding, constant),
            EffectDescriptor::Rumble(rumble) => self.rumble_values(binding, rumble),
            other => {
                debug!(kind = ?other.kind(), "ignoring effect not carried by the FF field");
                return Ok(PlayOutcome::Ignored);
            }
        };

        binding.set_pair(first, second);
        writer.write_report(binding.report_id(), binding.values())?;
        Ok(PlayOutcome::Sent)
    }

    fn constant_values(&self, binding: &FieldBinding, effect: &ConstantEffect) -> (i32, i32) {
        let min = binding.logical_minimum();
        let max = binding.logical_maximum();
        let x = scale_signed8(i32::from(effect.start_level), min, max);
        let y = scale_signed8(i32::from(effect.end_level), min, max);
        debug!("(x, y)=({x:04x}, {y:04x})");
        (x, y)
    }

    fn rumble_values(&self, binding: &FieldBinding, effect: &RumbleEffect) -> (i32, i32) {
        let min = binding.logical_minimum();
        let max = binding.logical_maximum();
        let mut left = scale_unsigned16(u32::from(effect.weak_magnitude), min, max);
        let mut right = scale_unsigned16(u32::from(effect.strong_magnitude), min, max);

        if self.motor_swap {
            std::mem::swap(&mut left, &mut right);
        }

        debug!("(left, right)=({left:08x}, {right:08x})");
        (left, right)
    }
}
