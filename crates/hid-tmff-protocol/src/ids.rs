//! Thrustmaster USB vendor and product ID constants for the force-feedback
//! devices driven by this crate.

#![deny(static_mut_refs)]

/// Thrustmaster USB Vendor ID.
pub const THRUSTMASTER_VENDOR_ID: u16 = 0x044F;

/// Known product IDs.
///
/// The gamepads and older wheels bind their FF field by scanning the output
/// reports. The pre-init FFB wheel only needs its bring-up sequence, and the
/// TMX runs its own 64-byte setup table before exposing the T300 protocol.
pub mod product_ids {
    /// Generic dual-motor gamepad.
    pub const DUAL_MOTOR_PAD: u16 = 0xB300;
    /// FireStorm Dual Power 2 (and 3).
    pub const FIRESTORM_DUAL_POWER: u16 = 0xB304;
    /// Dual Trigger 2-in-1. Strong motor is wired to the left channel.
    pub const DUAL_TRIGGER_2_IN_1: u16 = 0xB320;
    /// Dual Trigger 3-in-1 in PC mode.
    pub const DUAL_TRIGGER_3_IN_1_PC: u16 = 0xB323;
    /// Dual Trigger 3-in-1 in PS3 mode.
    pub const DUAL_TRIGGER_3_IN_1_PS3: u16 = 0xB324;
    /// NASCAR Pro FF2 wheel.
    pub const NASCAR_PRO_FF2: u16 = 0xB605;
    /// FGT Rumble Force wheel.
    pub const FGT_RUMBLE_FORCE: u16 = 0xB651;
    /// RGT Force Feedback Clutch Racing wheel.
    pub const RGT_FF_CLUTCH: u16 = 0xB653;
    /// FGT Force Feedback wheel.
    pub const FGT_FORCE_FEEDBACK: u16 = 0xB654;
    /// F430 Force Feedback wheel.
    pub const F430_FORCE_FEEDBACK: u16 = 0xB65A;
    /// Pre-init "FFB Wheel" PID reported by wheels before mode switching.
    pub const FFB_WHEEL_GENERIC: u16 = 0xB65D;
    /// T300 RS, PS3 normal mode.
    pub const T300_RS: u16 = 0xB66E;
    /// TMX (Xbox One variant of the T150/T300 family).
    pub const TMX: u16 = 0xB67F;
}

/// Model identification shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    DualMotorPad,
    FireStormDualPower,
    DualTrigger2In1,
    DualTrigger3In1Pc,
    DualTrigger3In1Ps3,
    NascarProFf2,
    FgtRumbleForce,
    RgtFfClutch,
    FgtForceFeedback,
    F430ForceFeedback,
    FfbWheelGeneric,
    T300RS,
    TMX,
    Unknown,
}

impl Model {
    pub fn from_product_id(product_id: u16) -> Self {
        match product_id {
            product_ids::DUAL_MOTOR_PAD => Self::DualMotorPad,
            product_ids::FIRESTORM_DUAL_POWER => Self::FireStormDualPower,
            product_ids::DUAL_TRIGGER_2_IN_1 => Self::DualTrigger2In1,
            product_ids::DUAL_TRIGGER_3_IN_1_PC => Self::DualTrigger3In1Pc,
            product_ids::DUAL_TRIGGER_3_IN_1_PS3 => Self::DualTrigger3In1Ps3,
            product_ids::NASCAR_PRO_FF2 => Self::NascarProFf2,
            product_ids::FGT_RUMBLE_FORCE => Self::FgtRumbleForce,
            product_ids::RGT_FF_CLUTCH => Self::RgtFfClutch,
            product_ids::FGT_FORCE_FEEDBACK => Self::FgtForceFeedback,
            product_ids::F430_FORCE_FEEDBACK => Self::F430ForceFeedback,
            product_ids::FFB_WHEEL_GENERIC => Self::FfbWheelGeneric,
            product_ids::T300_RS => Self::T300RS,
            product_ids::TMX => Self::TMX,
            _ => Self::Unknown,
        }
    }

    pub fn product_id(self) -> Option<u16> {
        let pid = match self {
            Self::DualMotorPad => product_ids::DUAL_MOTOR_PAD,
            Self::FireStormDualPower => product_ids::FIRESTORM_DUAL_POWER,
            Self::DualTrigger2In1 => product_ids::DUAL_TRIGGER_2_IN_1,
            Self::DualTrigger3In1Pc => product_ids::DUAL_TRIGGER_3_IN_1_PC,
            Self::DualTrigger3In1Ps3 => product_ids::DUAL_TRIGGER_3_IN_1_PS3,
            Self::NascarProFf2 => product_ids::NASCAR_PRO_FF2,
            Self::FgtRumbleForce => product_ids::FGT_RUMBLE_FORCE,
            Self::RgtFfClutch => product_ids::RGT_FF_CLUTCH,
            Self::FgtForceFeedback => product_ids::FGT_FORCE_FEEDBACK,
            Self::F430ForceFeedback => product_ids::F430_FORCE_FEEDBACK,
            Self::FfbWheelGeneric => product_ids::FFB_WHEEL_GENERIC,
            Self::T300RS => product_ids::T300_RS,
            Self::TMX => product_ids::TMX,
            Self::Unknown => return None,
        };
        Some(pid)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::DualMotorPad => "Thrustmaster Dual Motor Gamepad",
            Self::FireStormDualPower => "Thrustmaster FireStorm Dual Power",
            Self::DualTrigger2In1 => "Thrustmaster Dual Trigger 2-in-1",
            Self::DualTrigger3In1Pc => "Thrustmaster Dual Trigger 3-in-1 (PC mode)",
            Self::DualTrigger3In1Ps3 => "Thrustmaster Dual Trigger 3-in-1 (PS3 mode)",
            Self::NascarProFf2 => "Thrustmaster NASCAR Pro FF2",
            Self::FgtRumbleForce => "Thrustmaster FGT Rumble Force",
            Self::RgtFfClutch => "Thrustmaster RGT Force Feedback Clutch",
            Self::FgtForceFeedback => "Thrustmaster FGT Force Feedback",
            Self::F430ForceFeedback => "Thrustmaster F430 Force Feedback",
            Self::FfbWheelGeneric => "Thrustmaster FFB Wheel",
            Self::T300RS => "Thrustmaster T300 RS",
            Self::TMX => "Thrustmaster TMX",
            Self::Unknown => "Thrustmaster Unknown",
        }
    }

    /// Gamepads with two rumble motors rather than a steering actuator.
    pub fn is_gamepad(self) -> bool {
        matches!(
            self,
            Self::DualMotorPad
                | Self::FireStormDualPower
                | Self::DualTrigger2In1
                | Self::DualTrigger3In1Pc
                | Self::DualTrigger3In1Ps3
        )
    }
}
