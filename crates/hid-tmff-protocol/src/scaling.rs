//! Conversion of host-normalized effect magnitudes into a field's logical range.
//!
//! Both functions saturate instead of wrapping and truncate toward zero the
//! way the device firmware expects, so a given input always lands on the same
//! integer step regardless of platform.

/// Full scale of an unsigned 16-bit host magnitude.
pub const U16_FULL_SCALE: i128 = 0xFFFF;

/// Span of a signed 8-bit host level (`-0x80..=0x7f`).
pub const S8_FULL_SCALE: i128 = 0xFF;

/// Offset that moves a signed 8-bit level onto `0..=0xff`.
pub const S8_BIAS: i128 = 0x80;

/// Map `value` from `0..=0xffff` onto `minimum..=maximum`.
///
/// Out-of-range inputs are accepted and saturate at the bounds.
///
/// ```
/// use racing_wheel_hid_tmff_protocol::scale_unsigned16;
///
/// assert_eq!(scale_unsigned16(0, -127, 127), -127);
/// assert_eq!(scale_unsigned16(0xFFFF, -127, 127), 127);
/// assert_eq!(scale_unsigned16(0x8000, 0, 255), 127);
/// ```
pub fn scale_unsigned16(value: u32, minimum: i32, maximum: i32) -> i32 {
    let span = i128::from(maximum) - i128::from(minimum);
    let scaled = i128::from(value) * span / U16_FULL_SCALE + i128::from(minimum);
    saturate(scaled, minimum, maximum)
}

/// Map `value` from `-0x80..=0x7f` onto `minimum..=maximum`.
///
/// Out-of-range inputs are accepted and saturate at the bounds.
///
/// ```
/// use racing_wheel_hid_tmff_protocol::scale_signed8;
///
/// assert_eq!(scale_signed8(-0x80, 0, 255), 0);
/// assert_eq!(scale_signed8(0x7F, 0, 255), 255);
/// assert_eq!(scale_signed8(0, -127, 127), 0);
/// ```
pub fn scale_signed8(value: i32, minimum: i32, maximum: i32) -> i32 {
    let span = i128::from(maximum) - i128::from(minimum);
    let scaled = (i128::from(value) + S8_BIAS) * span / S8_FULL_SCALE + i128::from(minimum);
    saturate(scaled, minimum, maximum)
}

// `Ord::clamp` panics on an inverted range; this returns a bound instead.
fn saturate(value: i128, minimum: i32, maximum: i32) -> i32 {
    if value < i128::from(minimum) {
        return minimum;
    }
    if value > i128::from(maximum) {
        return maximum;
    }
    // In range of [minimum, maximum], so it fits in i32.
    i32::try_from(value).unwrap_or(maximum)
}
