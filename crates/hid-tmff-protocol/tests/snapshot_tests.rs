//! Wire-format snapshots for the fixed byte sequences the firmware expects.

use insta::assert_snapshot;
use racing_wheel_hid_tmff_protocol as tmff;

fn hex_lines(seq: &tmff::SetupSequence) -> String {
    seq.packets()
        .iter()
        .map(|p| format!("{:02X?}", p.as_bytes()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_snapshot_legacy_setup() {
    assert_snapshot!(hex_lines(&tmff::SetupSequence::legacy()), @r"
    [42, 01, 00, 00, 00, 00, 00, 00, 00]
    [0A, 04, 90, 03, 00, 00, 00, 00]
    [0A, 04, 00, 0C, 00, 00, 00, 00]
    [0A, 04, 12, 10, 00, 00, 00, 00]
    [0A, 04, 00, 06, 00, 00, 00, 00]
    ");
}

#[test]
fn test_snapshot_tmx_setup_headers() {
    let headers = tmff::SetupSequence::tmx()
        .packets()
        .iter()
        .map(|p| format!("{:02X?} +{}", p.as_bytes().get(..5).unwrap_or_default(), p.len() - 5))
        .collect::<Vec<_>>()
        .join("\n");
    assert_snapshot!(headers, @r"
    [42, 01, 00, 00, 00] +59
    [0A, 04, 90, 03, 00] +59
    [0A, 04, 00, 0C, 00] +59
    [0A, 04, 12, 10, 00] +59
    [0A, 04, 00, 06, 00] +59
    [0A, 04, 00, 0E, 00] +59
    [0A, 04, 00, 0E, 01] +59
    ");
}

#[test]
fn test_snapshot_handshake() {
    let hs = tmff::ControlHandshake::default();
    assert_snapshot!(
        format!("request={:02X?} response={:02X?} data_len={}", hs.request, hs.response, hs.data_len),
        @"request=[41, 53, 05, 00, 00, 00, 00, 00] response=[C1, 49, 00, 00, 00, 00, 10, 00] data_len=0"
    );
}

#[test]
fn test_snapshot_vendor_commands() {
    let [enable, level] = tmff::build_autocenter_commands(0x4000);
    assert_snapshot!(
        format!(
            "range900={:02X?}\ngain={:02X?}\nautocenter={:02X?} {:02X?}",
            tmff::build_range_command(900),
            tmff::build_gain_command(0xC000),
            enable,
            level
        ),
        @r"
    range900=[08, 11, F0, D2]
    gain=[02, C0]
    autocenter=[08, 04, 01, 00] [08, 03, 00, 40]
    "
    );
}

#[test]
fn test_snapshot_tmx_mode_switch() {
    let ms = tmff::TMX_MODE_SWITCH;
    assert_snapshot!(
        format!("enter={:02X?}\nexit={:02X?}", ms.enter.steps(), ms.exit.steps()),
        @r"
    enter=[[01, 04], [01, 05]]
    exit=[[01, 05], [01, 00]]
    "
    );
}

#[test]
fn test_snapshot_tmx_report_descriptor() {
    let rows = tmff::TMX_REPORT_DESCRIPTOR
        .chunks(16)
        .map(|row| row.iter().map(|b| format!("{b:02X}")).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n");
    assert_snapshot!(rows, @r"
    05 01 09 04 A1 01 09 01 A1 00 85 07 09 30 15 00
    27 FF FF 00 00 35 00 47 FF FF 00 00 75 10 95 01
    81 02 09 35 26 FF 03 46 FF 03 81 02 09 32 81 02
    09 31 81 02 81 03 05 09 19 01 29 0D 25 01 45 01
    75 01 95 0D 81 02 75 0B 95 01 81 03 05 01 09 39
    25 07 46 3B 01 55 00 65 14 75 04 81 42 65 00 81
    03 85 60 06 00 FF 09 60 75 08 95 3F 26 FF 7F 15
    00 46 FF 7F 36 00 80 91 02 85 02 09 02 81 02 09
    14 85 14 81 02 C0 C0
    ");
}
