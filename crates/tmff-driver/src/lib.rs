//! Lifecycle controller for Thrustmaster force-feedback devices.
//!
//! A [`DeviceHandle`] is created per attached device from its
//! [`ModelProfile`](racing_wheel_hid_tmff_protocol::ModelProfile). It binds
//! the FF field, replays the model's setup traffic through
//! [`openracing_usb_transport`], and then routes effect plays, open/close
//! mode switches and vendor commands until it is destroyed.

#![deny(static_mut_refs)]

pub mod config;
pub mod device;
pub mod error;
pub mod hooks;
pub mod state;

pub use config::{DEFAULT_TIMEOUT_MS, DriverConfig};
pub use device::DeviceHandle;
pub use error::{DriverError, DriverResult, ErrorCategory, ErrorSeverity};
pub use hooks::{InputHooks, NoopInputHooks};
pub use state::LifecycleState;

pub use openracing_usb_transport as transport;
pub use racing_wheel_hid_tmff_protocol as protocol;
