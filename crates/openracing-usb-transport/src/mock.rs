//! In-memory [`UsbTransport`] for tests.
//!
//! Records every accepted submission and completes it according to the
//! configured behaviour. Counters expose how often buffers came back, how
//! often cancel was called, and how many delayed completions found their
//! transfer already gone.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::{TransportError, TransportResult};
use crate::transfer::{
    Completion, CompletionSignal, CompletionStatus, Endpoint, PendingTransfer, TransferKind,
    TransferRequest, UsbTransport,
};

/// Default interrupt OUT endpoint of the fake device.
pub const FAKE_INTERRUPT_OUT: Endpoint = Endpoint::new(0x02);

/// One transfer the fake accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTransfer {
    pub kind: TransferKind,
    pub endpoint: Endpoint,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behaviour {
    Immediate,
    Delay(Duration),
    Hang,
    DropSignal,
}

struct PendingEntry {
    buffer: Vec<u8>,
    signal: CompletionSignal,
}

struct State {
    interrupt_out: Option<Endpoint>,
    behaviour: Behaviour,
    fail_submits: HashSet<usize>,
    rejects: HashMap<usize, CompletionStatus>,
    submit_calls: usize,
    next_id: u64,
    submissions: Vec<SubmittedTransfer>,
    pending: HashMap<u64, PendingEntry>,
    buffers_returned: usize,
    cancel_count: usize,
    stale_completions: usize,
    workers: Vec<JoinHandle<()>>,
}

/// Scriptable fake transport.
#[derive(Clone)]
pub struct FakeTransport {
    state: Arc<Mutex<State>>,
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::with_endpoint(Some(FAKE_INTERRUPT_OUT))
    }

    pub fn without_interrupt_endpoint() -> Self {
        Self::with_endpoint(None)
    }

    fn with_endpoint(interrupt_out: Option<Endpoint>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                interrupt_out,
                behaviour: Behaviour::Immediate,
                fail_submits: HashSet::new(),
                rejects: HashMap::new(),
                submit_calls: 0,
                next_id: 0,
                submissions: Vec::new(),
                pending: HashMap::new(),
                buffers_returned: 0,
                cancel_count: 0,
                stale_completions: 0,
                workers: Vec::new(),
            })),
        }
    }

    /// Fail the `n`th submit call (0-based) before anything is queued.
    pub fn fail_submit_at(&self, n: usize) {
        self.state.lock().fail_submits.insert(n);
    }

    /// Complete the `n`th submit call (0-based) with `status`.
    pub fn reject_at(&self, n: usize, status: CompletionStatus) {
        self.state.lock().rejects.insert(n, status);
    }

    /// Complete from a worker thread after `delay`, if still pending.
    pub fn delay(&self, delay: Duration) {
        self.state.lock().behaviour = Behaviour::Delay(delay);
    }

    /// Never complete unless cancelled.
    pub fn hang(&self) {
        self.state.lock().behaviour = Behaviour::Hang;
    }

    /// Drop completion signals without completing.
    pub fn drop_signals(&self) {
        self.state.lock().behaviour = Behaviour::DropSignal;
    }

    /// Back to completing every transfer inside `submit`.
    pub fn complete_immediately(&self) {
        self.state.lock().behaviour = Behaviour::Immediate;
    }

    pub fn submissions(&self) -> Vec<SubmittedTransfer> {
        self.state.lock().submissions.clone()
    }

    /// Payloads of accepted interrupt transfers, in order.
    pub fn sent_payloads(&self) -> Vec<Vec<u8>> {
        self.state
            .lock()
            .submissions
            .iter()
            .filter(|s| s.kind == TransferKind::Interrupt)
            .map(|s| s.data.clone())
            .collect()
    }

    pub fn submit_calls(&self) -> usize {
        self.state.lock().submit_calls
    }

    /// Transfers handed back to their submitter, by completion or cancel.
    pub fn buffers_returned(&self) -> usize {
        self.state.lock().buffers_returned
    }

    pub fn cancel_count(&self) -> usize {
        self.state.lock().cancel_count
    }

    /// Delayed completions that found their transfer already cancelled.
    pub fn stale_completions(&self) -> usize {
        self.state.lock().stale_completions
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Wait for every delayed-completion worker to finish.
    pub fn join_workers(&self) {
        let workers = std::mem::take(&mut self.state.lock().workers);
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("fake transport worker panicked");
            }
        }
    }

    fn finish(&self, id: u64, status: CompletionStatus) {
        let entry = {
            let mut state = self.state.lock();
            let entry = state.pending.remove(&id);
            match entry {
                Some(_) => state.buffers_returned += 1,
                None => state.stale_completions += 1,
            }
            entry
        };
        if let Some(PendingEntry { buffer, signal }) = entry {
            let actual_length = if status.is_success() { buffer.len() } else { 0 };
            signal.complete(Completion {
                status,
                actual_length,
                buffer,
            });
        }
    }
}

impl UsbTransport for FakeTransport {
    fn interrupt_out_endpoint(&self) -> Option<Endpoint> {
        self.state.lock().interrupt_out
    }

    fn submit(
        &self,
        request: TransferRequest,
        signal: CompletionSignal,
    ) -> TransportResult<PendingTransfer> {
        let (id, status, behaviour) = {
            let mut state = self.state.lock();
            let call = state.submit_calls;
            state.submit_calls += 1;
            if state.fail_submits.contains(&call) {
                return Err(TransportError::ResourceExhaustion(format!(
                    "fake submit {call} refused"
                )));
            }

            let id = state.next_id;
            state.next_id += 1;
            state.submissions.push(SubmittedTransfer {
                kind: request.kind,
                endpoint: request.endpoint,
                data: request.payload().to_vec(),
            });

            let status = state
                .rejects
                .get(&call)
                .copied()
                .unwrap_or(CompletionStatus::Success);
            let behaviour = state.behaviour;
            if behaviour == Behaviour::DropSignal {
                return Ok(PendingTransfer::new(id));
            }

            let mut buffer = request.buffer;
            buffer.truncate(request.length);
            state.pending.insert(id, PendingEntry { buffer, signal });
            (id, status, behaviour)
        };

        match behaviour {
            Behaviour::Immediate => self.finish(id, status),
            Behaviour::Delay(delay) => {
                let fake = self.clone();
                let worker = thread::spawn(move || {
                    thread::sleep(delay);
                    fake.finish(id, status);
                });
                self.state.lock().workers.push(worker);
            }
            Behaviour::Hang | Behaviour::DropSignal => {}
        }
        Ok(PendingTransfer::new(id))
    }

    fn cancel(&self, pending: &PendingTransfer) {
        let entry = {
            let mut state = self.state.lock();
            state.cancel_count += 1;
            let entry = state.pending.remove(&pending.id());
            if entry.is_some() {
                state.buffers_returned += 1;
            }
            entry
        };
        if let Some(PendingEntry { buffer, signal }) = entry {
            signal.complete(Completion {
                status: CompletionStatus::Cancelled,
                actual_length: 0,
                buffer,
            });
        }
    }
}
