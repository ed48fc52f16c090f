//! Transfer requests, completions and the asynchronous transport interface.

use std::fmt;
use std::time::Duration;

use crossbeam::channel::Sender;
use tracing::trace;

use crate::error::TransportResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
        }
    }
}

/// USB endpoint address (bEndpointAddress).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint(u8);

impl Endpoint {
    /// Default control pipe.
    pub const CONTROL: Endpoint = Endpoint(0);

    pub const fn new(address: u8) -> Self {
        Self(address)
    }

    pub fn address(self) -> u8 {
        self.0
    }

    /// Endpoint number without the direction bit.
    pub fn number(self) -> u8 {
        self.0 & 0x0F
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ep{}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Interrupt,
    /// Control transfer with its 8-byte setup packet.
    Control { setup: [u8; 8] },
}

/// One transfer, owned by the transport between submission and completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub kind: TransferKind,
    pub endpoint: Endpoint,
    pub direction: Direction,
    pub buffer: Vec<u8>,
    /// Bytes to move; may be shorter than `buffer`.
    pub length: usize,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl TransferRequest {
    /// Interrupt OUT transfer of the whole `buffer`.
    pub fn interrupt_out(endpoint: Endpoint, buffer: Vec<u8>, timeout: Option<Duration>) -> Self {
        let length = buffer.len();
        Self {
            kind: TransferKind::Interrupt,
            endpoint,
            direction: Direction::Out,
            buffer,
            length,
            timeout,
        }
    }

    /// Control OUT transfer on the default pipe with a data stage of `length` bytes.
    pub fn control_out(
        setup: [u8; 8],
        buffer: Vec<u8>,
        length: usize,
        timeout: Option<Duration>,
    ) -> Self {
        let length = length.min(buffer.len());
        Self {
            kind: TransferKind::Control { setup },
            endpoint: Endpoint::CONTROL,
            direction: Direction::Out,
            buffer,
            length,
            timeout,
        }
    }

    /// Bytes the transport should move, bounded by the buffer.
    pub fn payload(&self) -> &[u8] {
        self.buffer.get(..self.length).unwrap_or(&self.buffer)
    }
}

/// Status reported by the transport when a transfer completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Success,
    /// The request is no longer pending because it was cancelled.
    Cancelled,
    /// Endpoint halted.
    Stall,
    /// Device or host controller went away mid-transfer.
    Shutdown,
    /// Any other transport-specific error code.
    Error(i32),
}

impl CompletionStatus {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Stall => write!(f, "stall"),
            Self::Shutdown => write!(f, "shutdown"),
            Self::Error(code) => write!(f, "error {code}"),
        }
    }
}

/// What the transport hands back when a transfer finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub status: CompletionStatus,
    pub actual_length: usize,
    /// The request buffer, returned to the submitter.
    pub buffer: Vec<u8>,
}

/// One-shot completion channel for a submitted transfer.
///
/// Consumed on use, so a transport can complete a transfer at most once.
/// Dropping it without completing tells the waiter the device is gone.
#[derive(Debug)]
pub struct CompletionSignal {
    tx: Sender<Completion>,
}

impl CompletionSignal {
    pub(crate) fn new(tx: Sender<Completion>) -> Self {
        Self { tx }
    }

    pub fn complete(self, completion: Completion) {
        if self.tx.send(completion).is_err() {
            trace!("completion delivered after the waiter went away");
        }
    }
}

/// Handle to an in-flight transfer, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingTransfer {
    id: u64,
}

impl PendingTransfer {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Asynchronous USB transport supplied by the host.
///
/// `submit` queues a transfer and returns immediately; the transport
/// later calls [`CompletionSignal::complete`] exactly once, from any thread.
/// `cancel` must make a pending transfer complete promptly with
/// [`CompletionStatus::Cancelled`] unless it already completed.
pub trait UsbTransport: Send + Sync {
    /// Interrupt OUT endpoint used for setup and vendor commands.
    fn interrupt_out_endpoint(&self) -> Option<Endpoint>;

    /// Queue `request`.
    ///
    /// # Errors
    ///
    /// Fails without queuing anything (and without completing `signal`) when
    /// the transfer cannot be allocated or submitted.
    fn submit(
        &self,
        request: TransferRequest,
        signal: CompletionSignal,
    ) -> TransportResult<PendingTransfer>;

    fn cancel(&self, pending: &PendingTransfer);
}
