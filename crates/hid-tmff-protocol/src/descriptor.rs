//! Replacement HID report descriptors.
//!
//! Some models ship a descriptor the host cannot bind FF to. The profile
//! carries the corrected bytes and the host substitutes them before parsing.

/// Corrected TMX report descriptor.
///
/// Declares output report 0x60 as a single vendor field of 63 8-bit values
/// with logical range 0..32767, which is what
/// [`BindingStrategy::FirstOutputField`](crate::BindingStrategy) binds.
#[rustfmt::skip]
pub const TMX_REPORT_DESCRIPTOR: [u8; 135] = [
    0x05, 0x01,
    0x09, 0x04,
    0xa1, 0x01,
    0x09, 0x01,
    0xa1, 0x00,
    // Report 0x07: wheel axis
    0x85, 0x07,
    0x09, 0x30,
    0x15, 0x00,
    0x27, 0xff, 0xff, 0x00, 0x00,
    0x35, 0x00,
    0x47, 0xff, 0xff, 0x00, 0x00,
    0x75, 0x10,
    0x95, 0x01,
    0x81, 0x02,
    // Brake, gas, clutch
    0x09, 0x35,
    0x26, 0xff, 0x03,
    0x46, 0xff, 0x03,
    0x81, 0x02,
    0x09, 0x32,
    0x81, 0x02,
    0x09, 0x31,
    0x81, 0x02,
    0x81, 0x03,
    // 13 buttons
    0x05, 0x09,
    0x19, 0x01,
    0x29, 0x0d,
    0x25, 0x01,
    0x45, 0x01,
    0x75, 0x01,
    0x95, 0x0d,
    0x81, 0x02,
    0x75, 0x0b,
    0x95, 0x01,
    0x81, 0x03,
    0x05, 0x01,
    // Hat switch
    0x09, 0x39,
    0x25, 0x07,
    0x46, 0x3b, 0x01,
    0x55, 0x00,
    0x65, 0x14,
    0x75, 0x04,
    0x81, 0x42,
    0x65, 0x00,
    0x81, 0x03,
    // Report 0x60: 63 vendor output values in 0..32767
    0x85, 0x60,
    0x06, 0x00, 0xff,
    0x09, 0x60,
    0x75, 0x08,
    0x95, 0x3f,
    0x26, 0xff, 0x7f,
    0x15, 0x00,
    0x46, 0xff, 0x7f,
    0x36, 0x00, 0x80,
    0x91, 0x02,
    0x85, 0x02,
    0x09, 0x02,
    0x81, 0x02,
    0x09, 0x14,
    0x85, 0x14,
    0x81, 0x02,
    0xc0,
    0xc0,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_tmx_descriptor_declares_command_report() {
        // Report ID 0x60, vendor page, 8-bit x 63, logical max 32767, output.
        assert!(contains(&TMX_REPORT_DESCRIPTOR, &[0x85, 0x60, 0x06, 0x00, 0xff]));
        assert!(contains(&TMX_REPORT_DESCRIPTOR, &[0x75, 0x08, 0x95, 0x3f]));
        assert!(contains(&TMX_REPORT_DESCRIPTOR, &[0x26, 0xff, 0x7f, 0x15, 0x00]));
        assert!(contains(&TMX_REPORT_DESCRIPTOR, &[0x91, 0x02]));
    }

    #[test]
    fn test_tmx_descriptor_closes_both_collections() {
        assert_eq!(TMX_REPORT_DESCRIPTOR.first(), Some(&0x05));
        let tail = TMX_REPORT_DESCRIPTOR.get(TMX_REPORT_DESCRIPTOR.len() - 2..);
        assert_eq!(tail, Some(&[0xc0, 0xc0][..]));
    }
}
