//! Thrustmaster legacy force-feedback protocol: field binding, effect
//! scaling and dispatch, model capability records and setup tables.
//!
//! This crate is intentionally I/O-free. Setup packets and vendor commands
//! are plain data, and report transmission goes through the caller-supplied
//! [`ReportWriter`], so everything here can be tested without hardware.

#![deny(static_mut_refs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod binding;
pub mod descriptor;
pub mod dispatch;
pub mod effects;
pub mod error;
pub mod ids;
pub mod output;
pub mod profile;
pub mod report;
pub mod scaling;
pub mod setup;

pub use binding::{FieldBinding, MAX_FIELD_VALUES, bind_first_output_field, discover};
pub use descriptor::TMX_REPORT_DESCRIPTOR;
pub use dispatch::{EffectDispatcher, PlayOutcome, ReportWriter};
pub use effects::{
    ConditionEffect, ConditionKind, ConstantEffect, EffectDescriptor, EffectKind, PeriodicEffect,
    RumbleEffect, Waveform,
};
pub use error::{FieldError, ProtocolError, ProtocolResult, ReportWriteError};
pub use ids::{Model, THRUSTMASTER_VENDOR_ID, product_ids};
pub use output::{
    ModePair, ModeSwitch, TMX_MODE_SWITCH, build_autocenter_commands, build_gain_command,
    build_range_command,
};
pub use profile::{
    BindingStrategy, ControlHandshake, DEFAULT_MAX_EFFECTS, ModelProfile, RangeBounds, TMX_RANGE,
    WheelParam,
};
pub use report::{OutputReport, ReportField, USAGE_GENDESK_FF, USAGE_VENDOR_FF};
pub use scaling::{scale_signed8, scale_unsigned16};
pub use setup::{MAX_SETUP_PACKET_LEN, SetupPacket, SetupSequence};
