//! Per-model capability records.
//!
//! Everything model-specific (setup traffic, quirks, range bounds, which
//! field carries FF data) is resolved once at attach time into a
//! [`ModelProfile`] and passed down, so no other layer compares product ids.

use serde::{Deserialize, Serialize};

use crate::binding::{FieldBinding, bind_first_output_field, discover};
use crate::descriptor::TMX_REPORT_DESCRIPTOR;
use crate::effects::EffectKind;
use crate::error::{ProtocolError, ProtocolResult};
use crate::ids::{Model, product_ids};
use crate::output::{ModeSwitch, TMX_MODE_SWITCH};
use crate::report::OutputReport;
use crate::setup::SetupSequence;

/// Request packet of the post-setup control handshake
/// (vendor, interface, OUT; bRequest 0x53, wValue 0x0005, no data stage).
pub const HANDSHAKE_REQUEST: [u8; 8] = [0x41, 0x53, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Response template carried in the handshake buffer.
pub const HANDSHAKE_RESPONSE: [u8; 8] = [0xc1, 0x49, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00];

/// Length of the T300-family interrupt OUT send buffer.
pub const T300_SEND_BUFFER_LEN: usize = 63;

/// Effect slots the input layer allocates for a device.
pub const DEFAULT_MAX_EFFECTS: usize = 16;

fn default_max_effects() -> usize {
    DEFAULT_MAX_EFFECTS
}

/// Fixed request/response pair for the control handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlHandshake {
    pub request: [u8; 8],
    pub response: [u8; 8],
    /// Bytes transferred in the data stage.
    pub data_len: usize,
}

impl Default for ControlHandshake {
    fn default() -> Self {
        Self {
            request: HANDSHAKE_REQUEST,
            response: HANDSHAKE_RESPONSE,
            data_len: 0,
        }
    }
}

/// Inclusive rotation range bounds in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBounds {
    pub min_degrees: u16,
    pub max_degrees: u16,
}

impl RangeBounds {
    pub const fn new(min_degrees: u16, max_degrees: u16) -> Self {
        Self {
            min_degrees,
            max_degrees,
        }
    }

    /// Clamp `degrees` into the bounds, reporting whether it was changed.
    pub fn clamp(&self, degrees: u16) -> (u16, bool) {
        if degrees < self.min_degrees {
            (self.min_degrees, true)
        } else if degrees > self.max_degrees {
            (self.max_degrees, true)
        } else {
            (degrees, false)
        }
    }
}

/// How the FF field is located in the output reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingStrategy {
    /// Scan for a recognized FF usage, first match wins.
    #[default]
    Discover,
    /// Take field 0 of the first output report.
    FirstOutputField,
    /// The model only needs bring-up traffic and has no FF field.
    None,
}

impl BindingStrategy {
    /// Resolve the binding for this strategy.
    ///
    /// # Errors
    ///
    /// Any [`ProtocolError`] from discovery; `Ok(None)` for
    /// [`BindingStrategy::None`].
    pub fn bind(self, reports: &[OutputReport]) -> ProtocolResult<Option<FieldBinding>> {
        match self {
            Self::Discover => discover(reports).map(Some),
            Self::FirstOutputField => bind_first_output_field(reports).map(Some),
            Self::None => Ok(None),
        }
    }
}

/// Wheel settings a model exposes to userspace for tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelParam {
    SpringLevel,
    DamperLevel,
    FrictionLevel,
    Range,
    Gain,
}

/// Capability and configuration record for one device model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelProfile {
    pub product_id: u16,
    pub name: String,
    /// Effect kinds advertised to the host input layer.
    pub effects: Vec<EffectKind>,
    #[serde(default)]
    pub setup: SetupSequence,
    #[serde(default)]
    pub handshake: Option<ControlHandshake>,
    /// Strong motor occupies value slot 0.
    #[serde(default)]
    pub motor_swap: bool,
    #[serde(default)]
    pub range: Option<RangeBounds>,
    #[serde(default)]
    pub binding: BindingStrategy,
    #[serde(default)]
    pub mode_switch: Option<ModeSwitch>,
    /// Size of the interrupt OUT buffer used for vendor commands.
    #[serde(default)]
    pub send_buffer_len: usize,
    /// The bound field is a vendor command stream, so constant and rumble
    /// levels are not written into it.
    #[serde(default)]
    pub command_stream: bool,
    #[serde(default = "default_max_effects")]
    pub max_effects: usize,
    #[serde(default)]
    pub params: Vec<WheelParam>,
    /// Replacement for the descriptor the device reports.
    #[serde(default)]
    pub report_descriptor: Option<Vec<u8>>,
}

const NO_EFFECTS: &[EffectKind] = &[];
const RUMBLE: &[EffectKind] = &[EffectKind::Rumble];
const CONSTANT: &[EffectKind] = &[EffectKind::Constant];
const T300_EFFECTS: &[EffectKind] = &[
    EffectKind::Constant,
    EffectKind::Ramp,
    EffectKind::Spring,
    EffectKind::Damper,
    EffectKind::Friction,
    EffectKind::Inertia,
    EffectKind::Periodic,
    EffectKind::Sine,
    EffectKind::Triangle,
    EffectKind::Square,
    EffectKind::SawUp,
    EffectKind::SawDown,
    EffectKind::Autocenter,
    EffectKind::Gain,
];
const TMX_PARAMS: &[WheelParam] = &[
    WheelParam::SpringLevel,
    WheelParam::DamperLevel,
    WheelParam::FrictionLevel,
    WheelParam::Range,
    WheelParam::Gain,
];

/// TMX rotation range.
pub const TMX_RANGE: RangeBounds = RangeBounds::new(140, 900);

impl ModelProfile {
    fn basic(model: Model, product_id: u16, effects: &[EffectKind]) -> Self {
        Self {
            product_id,
            name: model.name().to_string(),
            effects: effects.to_vec(),
            setup: SetupSequence::default(),
            handshake: None,
            motor_swap: false,
            range: None,
            binding: BindingStrategy::Discover,
            mode_switch: None,
            send_buffer_len: 0,
            command_stream: false,
            max_effects: DEFAULT_MAX_EFFECTS,
            params: Vec::new(),
            report_descriptor: None,
        }
    }

    /// Built-in profile for `product_id`, `None` for unknown devices.
    pub fn for_product(product_id: u16) -> Option<Self> {
        let model = Model::from_product_id(product_id);
        let profile = match model {
            Model::DualMotorPad
            | Model::FireStormDualPower
            | Model::DualTrigger3In1Pc
            | Model::DualTrigger3In1Ps3
            | Model::FgtRumbleForce => Self::basic(model, product_id, RUMBLE),
            Model::DualTrigger2In1 => Self {
                motor_swap: true,
                ..Self::basic(model, product_id, RUMBLE)
            },
            Model::NascarProFf2
            | Model::RgtFfClutch
            | Model::FgtForceFeedback
            | Model::F430ForceFeedback
            | Model::T300RS => Self::basic(model, product_id, CONSTANT),
            // Bring-up only: no FF device is created for it.
            Model::FfbWheelGeneric => Self {
                setup: SetupSequence::legacy(),
                handshake: Some(ControlHandshake::default()),
                binding: BindingStrategy::None,
                max_effects: 0,
                ..Self::basic(model, product_id, NO_EFFECTS)
            },
            Model::TMX => Self {
                setup: SetupSequence::tmx(),
                range: Some(TMX_RANGE),
                binding: BindingStrategy::FirstOutputField,
                mode_switch: Some(TMX_MODE_SWITCH),
                send_buffer_len: T300_SEND_BUFFER_LEN,
                command_stream: true,
                params: TMX_PARAMS.to_vec(),
                report_descriptor: Some(TMX_REPORT_DESCRIPTOR.to_vec()),
                ..Self::basic(model, product_id, T300_EFFECTS)
            },
            Model::Unknown => return None,
        };
        Some(profile)
    }

    /// Every built-in profile, in product id order.
    pub fn builtin() -> Vec<Self> {
        [
            product_ids::DUAL_MOTOR_PAD,
            product_ids::FIRESTORM_DUAL_POWER,
            product_ids::DUAL_TRIGGER_2_IN_1,
            product_ids::DUAL_TRIGGER_3_IN_1_PC,
            product_ids::DUAL_TRIGGER_3_IN_1_PS3,
            product_ids::NASCAR_PRO_FF2,
            product_ids::FGT_RUMBLE_FORCE,
            product_ids::RGT_FF_CLUTCH,
            product_ids::FGT_FORCE_FEEDBACK,
            product_ids::F430_FORCE_FEEDBACK,
            product_ids::FFB_WHEEL_GENERIC,
            product_ids::T300_RS,
            product_ids::TMX,
        ]
        .into_iter()
        .filter_map(Self::for_product)
        .collect()
    }

    /// Parse a custom profile from JSON and check it is usable.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::InvalidProfile`] for malformed JSON or inconsistent
    /// fields.
    pub fn from_json_str(json: &str) -> ProtocolResult<Self> {
        let profile: Self =
            serde_json::from_str(json).map_err(|e| ProtocolError::InvalidProfile(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Check cross-field consistency.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::InvalidProfile`] describing the first problem found.
    pub fn validate(&self) -> ProtocolResult<()> {
        if let Some(range) = self.range.filter(|r| r.min_degrees > r.max_degrees) {
            return Err(ProtocolError::InvalidProfile(format!(
                "range minimum {} exceeds maximum {}",
                range.min_degrees, range.max_degrees
            )));
        }
        if (self.mode_switch.is_some() || self.range.is_some()) && self.send_buffer_len < 4 {
            return Err(ProtocolError::InvalidProfile(format!(
                "send buffer of {} bytes cannot carry vendor commands",
                self.send_buffer_len
            )));
        }
        if self.report_descriptor.as_ref().is_some_and(Vec::is_empty) {
            return Err(ProtocolError::InvalidProfile(
                "replacement report descriptor is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The descriptor the host should parse for this model.
    pub fn fixup_report_descriptor<'a>(&'a self, original: &'a [u8]) -> &'a [u8] {
        self.report_descriptor.as_deref().unwrap_or(original)
    }

    pub fn exposes(&self, param: WheelParam) -> bool {
        self.params.contains(&param)
    }

    pub fn model(&self) -> Model {
        Model::from_product_id(self.product_id)
    }

    pub fn supports(&self, kind: EffectKind) -> bool {
        self.effects.contains(&kind)
    }
}
