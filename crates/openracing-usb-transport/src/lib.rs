//! Synchronous USB transfer plumbing for force feedback drivers.
//!
//! The host supplies an asynchronous [`UsbTransport`]: it queues transfers
//! and reports their completion later, on any thread. On top of it this
//! crate provides:
//!
//! - [`TransportAdapter`]: a blocking send with a timeout. Timed-out
//!   transfers are cancelled and their buffers reclaimed before the call
//!   returns, so no completion can arrive late.
//! - [`SetupSequencer`]: strictly ordered replay of opaque setup packets,
//!   stopping at the first failure and reporting its index.
//! - [`mock::FakeTransport`]: a scriptable in-memory transport for tests.

#![deny(static_mut_refs)]

pub mod adapter;
pub mod error;
pub mod mock;
pub mod sequencer;
pub mod transfer;

pub use adapter::{TransferOutcome, TransportAdapter};
pub use error::{SetupError, TransportError, TransportResult};
pub use sequencer::SetupSequencer;
pub use transfer::{
    Completion, CompletionSignal, CompletionStatus, Direction, Endpoint, PendingTransfer,
    TransferKind, TransferRequest, UsbTransport,
};
