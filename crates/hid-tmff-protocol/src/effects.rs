//! Host-side effect records handed to the dispatcher on each play request.

use serde::{Deserialize, Serialize};

/// Effect capabilities a device can advertise to the host input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Constant,
    Ramp,
    Rumble,
    Spring,
    Damper,
    Friction,
    Inertia,
    Periodic,
    Sine,
    Triangle,
    Square,
    SawUp,
    SawDown,
    Autocenter,
    Gain,
}

/// Constant force expressed as a ramp between two signed 8-bit levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantEffect {
    /// Level at the start of playback, nominally `-0x80..=0x7f`.
    pub start_level: i16,
    /// Level at the end of playback, nominally `-0x80..=0x7f`.
    pub end_level: i16,
}

impl ConstantEffect {
    pub fn new(start_level: i16, end_level: i16) -> Self {
        Self {
            start_level,
            end_level,
        }
    }

    /// A constant force with identical start and end levels.
    pub fn level(level: i16) -> Self {
        Self::new(level, level)
    }
}

/// Dual-motor rumble.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RumbleEffect {
    /// High-frequency (light) motor magnitude, `0..=0xffff`.
    pub weak_magnitude: u16,
    /// Low-frequency (heavy) motor magnitude, `0..=0xffff`.
    pub strong_magnitude: u16,
}

impl RumbleEffect {
    pub fn new(weak_magnitude: u16, strong_magnitude: u16) -> Self {
        Self {
            weak_magnitude,
            strong_magnitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Square,
    Triangle,
    Sine,
    SawUp,
    SawDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicEffect {
    pub waveform: Waveform,
    pub period_ms: u16,
    pub magnitude: i16,
    pub offset: i16,
}

/// Conditional effects share one parameter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    Spring,
    Damper,
    Friction,
    Inertia,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionEffect {
    pub kind: ConditionKind,
    pub right_saturation: u16,
    pub left_saturation: u16,
    pub right_coeff: i16,
    pub left_coeff: i16,
    pub deadband: u16,
    pub center: i16,
}

/// One effect as delivered by the host for a single play call.
///
/// Only [`EffectDescriptor::Constant`] and [`EffectDescriptor::Rumble`] are
/// written to the FF field; the dispatcher ignores the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum EffectDescriptor {
    Constant(ConstantEffect),
    Rumble(RumbleEffect),
    Ramp(ConstantEffect),
    Periodic(PeriodicEffect),
    Condition(ConditionEffect),
}

impl EffectDescriptor {
    pub fn kind(&self) -> EffectKind {
        match self {
            Self::Constant(_) => EffectKind::Constant,
            Self::Rumble(_) => EffectKind::Rumble,
            Self::Ramp(_) => EffectKind::Ramp,
            Self::Periodic(_) => EffectKind::Periodic,
            Self::Condition(c) => match c.kind {
                ConditionKind::Spring => EffectKind::Spring,
                ConditionKind::Damper => EffectKind::Damper,
                ConditionKind::Friction => EffectKind::Friction,
                ConditionKind::Inertia => EffectKind::Inertia,
            },
        }
    }
}

impl From<ConstantEffect> for EffectDescriptor {
    fn from(effect: ConstantEffect) -> Self {
        Self::Constant(effect)
    }
}

impl From<RumbleEffect> for EffectDescriptor {
    fn from(effect: RumbleEffect) -> Self {
        Self::Rumble(effect)
    }
}
