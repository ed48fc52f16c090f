//! Shared fixtures for the driver integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use racing_wheel_tmff_driver::protocol::{
    self as tmff, ModelProfile, OutputReport, ReportField, ReportWriteError, ReportWriter,
};
use racing_wheel_tmff_driver::transport::mock::FakeTransport;
use racing_wheel_tmff_driver::{DeviceHandle, DriverConfig, DriverError, InputHooks};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Report writer that records every transmitted report.
#[derive(Clone, Default)]
pub struct RecordingWriter {
    reports: Arc<Mutex<Vec<(u8, Vec<i32>)>>>,
    fail: Arc<Mutex<bool>>,
}

impl RecordingWriter {
    pub fn reports(&self) -> Vec<(u8, Vec<i32>)> {
        self.reports.lock().clone()
    }

    pub fn fail_writes(&self) {
        *self.fail.lock() = true;
    }
}

impl ReportWriter for RecordingWriter {
    fn write_report(&mut self, report_id: u8, values: &[i32]) -> Result<(), ReportWriteError> {
        if *self.fail.lock() {
            return Err(ReportWriteError::new(report_id, "device gone"));
        }
        self.reports.lock().push((report_id, values.to_vec()));
        Ok(())
    }
}

/// Input hooks that log the order of open/close calls.
#[derive(Clone, Default)]
pub struct RecordingHooks {
    events: Arc<Mutex<Vec<&'static str>>>,
    refuse_open: Arc<Mutex<bool>>,
}

impl RecordingHooks {
    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().clone()
    }

    pub fn refuse_open(&self) {
        *self.refuse_open.lock() = true;
    }
}

impl InputHooks for RecordingHooks {
    fn open(&mut self) -> Result<(), DriverError> {
        if *self.refuse_open.lock() {
            return Err(DriverError::InputOpen("busy".into()));
        }
        self.events.lock().push("open");
        Ok(())
    }

    fn close(&mut self) {
        self.events.lock().push("close");
    }
}

pub struct Rig {
    pub fake: Arc<FakeTransport>,
    pub writer: RecordingWriter,
    pub hooks: RecordingHooks,
    pub device: DeviceHandle,
}

pub fn rig(product_id: u16, config: DriverConfig) -> Result<Rig, Box<dyn std::error::Error>> {
    let profile = ModelProfile::for_product(product_id).ok_or("unknown product id")?;
    let fake = Arc::new(FakeTransport::new());
    let writer = RecordingWriter::default();
    let hooks = RecordingHooks::default();
    let device = DeviceHandle::attach(
        profile,
        config,
        fake.clone(),
        Box::new(writer.clone()),
        Box::new(hooks.clone()),
    );
    Ok(Rig {
        fake,
        writer,
        hooks,
        device,
    })
}

/// Gamepad output reports: an LED report then the rumble report.
pub fn gamepad_reports() -> Vec<OutputReport> {
    vec![
        OutputReport::new(0x01, vec![ReportField::new(0x0008_004B, 0, 1, 4)]),
        OutputReport::new(0x02, vec![ReportField::new(tmff::USAGE_GENDESK_FF, 0, 255, 2)]),
    ]
}

/// Wheel output report with a signed vendor FF field.
pub fn wheel_reports() -> Vec<OutputReport> {
    vec![OutputReport::new(
        0x60,
        vec![ReportField::new(tmff::USAGE_VENDOR_FF, -127, 127, 2)],
    )]
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
