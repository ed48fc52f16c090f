//! Upstream input-device open/close hooks.

use crate::error::DriverError;

/// Called by the lifecycle controller after any mode packets are sent.
pub trait InputHooks {
    /// # Errors
    ///
    /// Whatever the input layer reports; the device stays in its prior state.
    fn open(&mut self) -> Result<(), DriverError>;

    fn close(&mut self);
}

/// Hooks for hosts with nothing to do on open/close.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInputHooks;

impl InputHooks for NoopInputHooks {
    fn open(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn close(&mut self) {}
}
