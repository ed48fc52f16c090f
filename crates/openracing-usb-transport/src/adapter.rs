//! Blocking send-with-timeout over an asynchronous transport.
//!
//! Each transfer gets its own one-shot completion channel. If the wait
//! times out the adapter cancels the transfer and then waits, without a
//! deadline, for the transport to hand the request back. The transport
//! guarantees a cancelled transfer completes promptly, so this second wait
//! is bounded, and it means a completion can never arrive after
//! [`TransportAdapter::transfer`] has returned.

use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{RecvTimeoutError, bounded};
use tracing::{debug, trace, warn};

use crate::error::{TransportError, TransportResult};
use crate::transfer::{
    Completion, CompletionSignal, CompletionStatus, Endpoint, TransferKind, TransferRequest,
    UsbTransport,
};

/// Result of a successful transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub actual_length: usize,
    /// The request buffer, handed back for reuse.
    pub buffer: Vec<u8>,
}

/// Synchronous front end for a [`UsbTransport`].
#[derive(Clone)]
pub struct TransportAdapter {
    transport: Arc<dyn UsbTransport>,
}

impl std::fmt::Debug for TransportAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportAdapter")
            .field("interrupt_out", &self.transport.interrupt_out_endpoint())
            .finish()
    }
}

impl TransportAdapter {
    pub fn new(transport: Arc<dyn UsbTransport>) -> Self {
        Self { transport }
    }

    /// Interrupt OUT endpoint of the underlying transport.
    ///
    /// # Errors
    ///
    /// [`TransportError::NoInterruptEndpoint`] when the device has none.
    pub fn interrupt_out_endpoint(&self) -> TransportResult<Endpoint> {
        self.transport
            .interrupt_out_endpoint()
            .ok_or(TransportError::NoInterruptEndpoint)
    }

    /// Allocate a zeroed transfer buffer of `len` bytes.
    ///
    /// # Errors
    ///
    /// [`TransportError::ResourceExhaustion`] if the allocation fails.
    pub fn allocate(len: usize) -> TransportResult<Vec<u8>> {
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(len).map_err(|e| {
            TransportError::ResourceExhaustion(format!("transfer buffer of {len} bytes: {e}"))
        })?;
        buffer.resize(len, 0);
        Ok(buffer)
    }

    /// Submit `request` and block until it completes or its timeout elapses.
    ///
    /// # Errors
    ///
    /// - [`TransportError::ResourceExhaustion`] if submission failed; nothing was sent.
    /// - [`TransportError::Timeout`] if the device didn't complete in time.
    /// - [`TransportError::Rejected`] if it completed with an error status.
    /// - [`TransportError::Disconnected`] if the transport dropped the transfer.
    pub fn transfer(&self, request: TransferRequest) -> TransportResult<TransferOutcome> {
        let endpoint = request.endpoint;
        let direction = request.direction;
        let kind = request.kind;
        let length = request.length;
        let timeout = request.timeout;

        let (tx, rx) = bounded::<Completion>(1);
        let pending = self.transport.submit(request, CompletionSignal::new(tx))?;
        trace!(%endpoint, %direction, length, id = pending.id(), "transfer submitted");

        let completion = match timeout {
            None => rx.recv().map_err(|_| TransportError::Disconnected)?,
            Some(limit) => match rx.recv_timeout(limit) {
                Ok(completion) => completion,
                Err(RecvTimeoutError::Disconnected) => return Err(TransportError::Disconnected),
                Err(RecvTimeoutError::Timeout) => {
                    self.transport.cancel(&pending);
                    let completion = rx.recv().map_err(|_| TransportError::Disconnected)?;
                    if completion.status == CompletionStatus::Cancelled {
                        debug!(%endpoint, %direction, length, "transfer timed out");
                        return Err(TransportError::Timeout {
                            endpoint,
                            direction,
                            timeout_ms: millis(limit),
                        });
                    }
                    // Completed on its own between the deadline and the cancel.
                    completion
                }
            },
        };

        if !completion.status.is_success() {
            if matches!(kind, TransferKind::Control { .. }) {
                warn!(%endpoint, status = %completion.status, "control transfer failed");
            } else {
                debug!(%endpoint, %direction, status = %completion.status, "transfer rejected");
            }
            return Err(TransportError::Rejected {
                endpoint,
                direction,
                status: completion.status,
            });
        }

        Ok(TransferOutcome {
            actual_length: completion.actual_length,
            buffer: completion.buffer,
        })
    }

    /// Copy `data` into a fresh buffer and send it on interrupt OUT `endpoint`.
    ///
    /// # Errors
    ///
    /// As [`TransportAdapter::transfer`].
    pub fn interrupt_write(
        &self,
        endpoint: Endpoint,
        data: &[u8],
        timeout: Option<Duration>,
    ) -> TransportResult<usize> {
        let mut buffer = Self::allocate(data.len())?;
        buffer.copy_from_slice(data);
        let outcome = self.transfer(TransferRequest::interrupt_out(endpoint, buffer, timeout))?;
        Ok(outcome.actual_length)
    }

    /// Control OUT transfer on the default pipe with `data` as the data stage.
    ///
    /// # Errors
    ///
    /// As [`TransportAdapter::transfer`].
    pub fn control_write(
        &self,
        setup: [u8; 8],
        data: &[u8],
        timeout: Option<Duration>,
    ) -> TransportResult<usize> {
        let mut buffer = Self::allocate(data.len())?;
        buffer.copy_from_slice(data);
        let outcome = self.transfer(TransferRequest::control_out(
            setup,
            buffer,
            data.len(),
            timeout,
        ))?;
        Ok(outcome.actual_length)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
