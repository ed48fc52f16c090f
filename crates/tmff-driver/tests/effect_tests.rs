//! Effect plays routed through the bound FF field.

mod common;

use common::{TestResult, gamepad_reports, rig, wheel_reports};
use racing_wheel_tmff_driver::protocol::{
    ConstantEffect, EffectDescriptor, OutputReport, PeriodicEffect, PlayOutcome, ReportField,
    RumbleEffect, Waveform, product_ids, scale_signed8, scale_unsigned16,
};
use racing_wheel_tmff_driver::{DriverConfig, DriverError, LifecycleState};

#[test]
fn rumble_swap_quirk_end_to_end() -> TestResult {
    let rumble: EffectDescriptor = RumbleEffect::new(0x4000, 0x8000).into();
    let weak = scale_unsigned16(0x4000, 0, 255);
    let strong = scale_unsigned16(0x8000, 0, 255);

    let mut swapped = rig(product_ids::DUAL_TRIGGER_2_IN_1, DriverConfig::default())?;
    swapped.device.init(&gamepad_reports())?;
    assert_eq!(swapped.device.play(&rumble)?, PlayOutcome::Sent);
    assert_eq!(swapped.writer.reports(), vec![(0x02, vec![strong, weak])]);

    let mut plain = rig(product_ids::DUAL_MOTOR_PAD, DriverConfig::default())?;
    plain.device.init(&gamepad_reports())?;
    plain.device.play(&rumble)?;
    assert_eq!(plain.writer.reports(), vec![(0x02, vec![weak, strong])]);
    Ok(())
}

#[test]
fn constant_force_writes_start_and_end() -> TestResult {
    let mut rig = rig(product_ids::NASCAR_PRO_FF2, DriverConfig::default())?;
    rig.device.init(&wheel_reports())?;

    rig.device.play(&ConstantEffect::new(-0x80, 0x7f).into())?;
    rig.device.play(&ConstantEffect::level(0).into())?;

    assert_eq!(
        rig.writer.reports(),
        vec![
            (0x60, vec![-127, 127]),
            (0x60, vec![scale_signed8(0, -127, 127), scale_signed8(0, -127, 127)]),
        ]
    );
    Ok(())
}

#[test]
fn one_report_per_play() -> TestResult {
    let mut rig = rig(product_ids::FIRESTORM_DUAL_POWER, DriverConfig::default())?;
    rig.device.init(&gamepad_reports())?;
    for magnitude in [0u16, 0x1000, 0xFFFF] {
        rig.device.play(&RumbleEffect::new(magnitude, magnitude).into())?;
    }
    assert_eq!(rig.writer.reports().len(), 3);
    Ok(())
}

#[test]
fn unhandled_kind_is_ignored() -> TestResult {
    let mut rig = rig(product_ids::TMX, DriverConfig::default())?;
    rig.device.init(&wheel_reports())?;

    let sine = EffectDescriptor::Periodic(PeriodicEffect {
        waveform: Waveform::Sine,
        period_ms: 100,
        magnitude: 0x4000,
        offset: 0,
    });
    assert_eq!(rig.device.play(&sine)?, PlayOutcome::Ignored);
    assert!(rig.writer.reports().is_empty());
    Ok(())
}

#[test]
fn write_failure_surfaces_without_state_change() -> TestResult {
    let mut rig = rig(product_ids::FIRESTORM_DUAL_POWER, DriverConfig::default())?;
    rig.device.init(&gamepad_reports())?;
    rig.device.open(true)?;
    rig.writer.fail_writes();

    let err = rig.device.play(&RumbleEffect::new(1, 1).into()).err();

    assert!(matches!(err, Some(DriverError::ReportWrite(_))));
    assert_eq!(rig.device.state(), LifecycleState::Open);
    Ok(())
}

#[test]
fn tmx_command_report_is_not_written_with_levels() -> TestResult {
    let mut rig = rig(product_ids::TMX, DriverConfig::default())?;
    // Layout declared by the replacement TMX descriptor.
    let reports = vec![OutputReport::new(0x60, vec![ReportField::new(0xFF00_0060, 0, 32767, 63)])];
    rig.device.init(&reports)?;
    assert_eq!(rig.device.binding().map(|b| b.value_count()), Some(63));

    assert_eq!(rig.device.play(&ConstantEffect::level(0x7f).into())?, PlayOutcome::Ignored);
    assert_eq!(rig.device.play(&RumbleEffect::new(1, 2).into())?, PlayOutcome::Ignored);
    assert!(rig.writer.reports().is_empty());
    let leading = rig.device.binding().and_then(|b| b.values().get(..2));
    assert_eq!(leading, Some(&[0, 0][..]));
    Ok(())
}
