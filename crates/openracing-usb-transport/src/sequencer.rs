//! Ordered replay of opaque setup packets over one interrupt OUT endpoint.

use std::time::Duration;

use tracing::{debug, error};

use crate::adapter::TransportAdapter;
use crate::error::SetupError;
use crate::transfer::{Endpoint, TransferRequest};

/// Sends setup packets one at a time, stopping at the first failure.
#[derive(Debug)]
pub struct SetupSequencer<'a> {
    adapter: &'a TransportAdapter,
    endpoint: Endpoint,
    timeout: Option<Duration>,
}

impl<'a> SetupSequencer<'a> {
    pub fn new(
        adapter: &'a TransportAdapter,
        endpoint: Endpoint,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            adapter,
            endpoint,
            timeout,
        }
    }

    /// Send every packet in order and return how many were sent.
    ///
    /// One buffer sized to the longest packet is allocated up front and
    /// reused for every step. Packet `i + 1` is never submitted before
    /// packet `i` has completed successfully.
    ///
    /// # Errors
    ///
    /// [`SetupError`] carrying the index of the packet that failed. An
    /// allocation failure is reported against index 0.
    pub fn run<P: AsRef<[u8]>>(&self, packets: &[P]) -> Result<usize, SetupError> {
        let Some(max_len) = packets.iter().map(|p| p.as_ref().len()).max() else {
            return Ok(0);
        };
        let mut buffer = TransportAdapter::allocate(max_len)
            .map_err(|source| SetupError { index: 0, source })?;

        for (index, packet) in packets.iter().enumerate() {
            let bytes = packet.as_ref();
            buffer.clear();
            buffer.extend_from_slice(bytes);

            let request = TransferRequest::interrupt_out(self.endpoint, buffer, self.timeout);
            match self.adapter.transfer(request) {
                Ok(outcome) => {
                    debug!(index, len = bytes.len(), "setup packet sent");
                    buffer = outcome.buffer;
                }
                Err(source) => {
                    error!(index, %source, "setup data couldn't be sent");
                    return Err(SetupError { index, source });
                }
            }
        }
        Ok(packets.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::mock::{FAKE_INTERRUPT_OUT, FakeTransport};
    use crate::transfer::CompletionStatus;

    #[test]
    fn test_empty_sequence_sends_nothing() -> Result<(), SetupError> {
        let fake = Arc::new(FakeTransport::new());
        let adapter = TransportAdapter::new(fake.clone());
        let packets: [&[u8]; 0] = [];
        let sent = SetupSequencer::new(&adapter, FAKE_INTERRUPT_OUT, None).run(&packets)?;
        assert_eq!(sent, 0);
        assert_eq!(fake.submit_calls(), 0);
        Ok(())
    }

    #[test]
    fn test_packets_sent_in_order_with_exact_lengths() -> Result<(), SetupError> {
        let fake = Arc::new(FakeTransport::new());
        let adapter = TransportAdapter::new(fake.clone());
        let packets: [&[u8]; 3] = [&[1, 2, 3, 4, 5], &[6], &[7, 8]];
        let sent = SetupSequencer::new(&adapter, FAKE_INTERRUPT_OUT, None).run(&packets)?;
        assert_eq!(sent, 3);
        assert_eq!(
            fake.sent_payloads(),
            vec![vec![1, 2, 3, 4, 5], vec![6], vec![7, 8]]
        );
        Ok(())
    }

    #[test]
    fn test_submit_failure_reports_index() {
        let fake = Arc::new(FakeTransport::new());
        fake.fail_submit_at(2);
        let adapter = TransportAdapter::new(fake.clone());
        let packets: [&[u8]; 4] = [&[1], &[2], &[3], &[4]];
        let err = SetupSequencer::new(&adapter, FAKE_INTERRUPT_OUT, None)
            .run(&packets)
            .err();
        assert_eq!(err.map(|e| e.index), Some(2));
        assert_eq!(fake.submit_calls(), 3);
    }

    #[test]
    fn test_rejected_packet_stops_sequence() {
        let fake = Arc::new(FakeTransport::new());
        fake.reject_at(0, CompletionStatus::Error(-32));
        let adapter = TransportAdapter::new(fake.clone());
        let packets: [&[u8]; 2] = [&[1], &[2]];
        let err = SetupSequencer::new(&adapter, FAKE_INTERRUPT_OUT, None)
            .run(&packets)
            .err();
        assert!(err.as_ref().is_some_and(|e| e.index == 0 && e.source.is_rejected()));
        assert_eq!(fake.sent_payloads(), vec![vec![1]]);
    }
}
