//! Timeout and cancellation behaviour of the blocking adapter.

use std::sync::Arc;
use std::time::{Duration, Instant};

use openracing_usb_transport::mock::{FAKE_INTERRUPT_OUT, FakeTransport};
use openracing_usb_transport::{
    CompletionStatus, Direction, TransferRequest, TransportAdapter, TransportError,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn delayed_completion_times_out_and_never_arrives_late() {
    init_tracing();
    let fake = Arc::new(FakeTransport::new());
    fake.delay(Duration::from_millis(200));
    let adapter = TransportAdapter::new(fake.clone());

    let started = Instant::now();
    let result = adapter.interrupt_write(
        FAKE_INTERRUPT_OUT,
        &[0x42, 0x01],
        Some(Duration::from_millis(20)),
    );

    assert_eq!(
        result,
        Err(TransportError::Timeout {
            endpoint: FAKE_INTERRUPT_OUT,
            direction: Direction::Out,
            timeout_ms: 20,
        })
    );
    assert!(started.elapsed() < Duration::from_millis(200));
    assert_eq!(fake.cancel_count(), 1);
    assert_eq!(fake.buffers_returned(), 1);
    assert_eq!(fake.pending_count(), 0);

    fake.join_workers();
    assert_eq!(fake.buffers_returned(), 1, "buffer must be returned exactly once");
    assert_eq!(fake.stale_completions(), 1);
}

#[test]
fn delayed_completion_within_timeout_succeeds() -> Result<(), TransportError> {
    init_tracing();
    let fake = Arc::new(FakeTransport::new());
    fake.delay(Duration::from_millis(5));
    let adapter = TransportAdapter::new(fake.clone());

    let outcome = adapter.transfer(TransferRequest::interrupt_out(
        FAKE_INTERRUPT_OUT,
        vec![0xAA; 8],
        Some(Duration::from_secs(2)),
    ))?;

    assert_eq!(outcome.actual_length, 8);
    assert_eq!(outcome.buffer, vec![0xAA; 8]);
    fake.join_workers();
    assert_eq!(fake.cancel_count(), 0);
    assert_eq!(fake.stale_completions(), 0);
    Ok(())
}

#[test]
fn no_timeout_waits_for_completion() -> Result<(), TransportError> {
    let fake = Arc::new(FakeTransport::new());
    fake.delay(Duration::from_millis(30));
    let adapter = TransportAdapter::new(fake.clone());

    let sent = adapter.interrupt_write(FAKE_INTERRUPT_OUT, &[1, 2, 3], None)?;
    assert_eq!(sent, 3);
    fake.join_workers();
    Ok(())
}

#[test]
fn rejection_after_delay_is_not_a_timeout() {
    let fake = Arc::new(FakeTransport::new());
    fake.delay(Duration::from_millis(5));
    fake.reject_at(0, CompletionStatus::Shutdown);
    let adapter = TransportAdapter::new(fake.clone());

    let err = adapter
        .interrupt_write(FAKE_INTERRUPT_OUT, &[1], Some(Duration::from_secs(2)))
        .err();
    fake.join_workers();

    assert!(err.as_ref().is_some_and(TransportError::is_rejected));
    assert!(!err.as_ref().is_some_and(TransportError::is_timeout));
}

#[test]
fn transfers_are_independent() -> Result<(), TransportError> {
    let fake = Arc::new(FakeTransport::new());
    let adapter = TransportAdapter::new(fake.clone());

    fake.hang();
    let first = adapter.interrupt_write(FAKE_INTERRUPT_OUT, &[1], Some(Duration::from_millis(5)));
    assert!(first.is_err());

    fake.complete_immediately();
    let second = adapter.interrupt_write(FAKE_INTERRUPT_OUT, &[2], Some(Duration::from_millis(5)))?;
    assert_eq!(second, 1);
    assert_eq!(fake.sent_payloads(), vec![vec![1], vec![2]]);
    Ok(())
}
