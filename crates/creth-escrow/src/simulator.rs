//! Phase state machine for simulated escrow transactions.
//!
//! A flow advances `IDLE → SIGNING → CONFIRMING → SUCCESS` (stake) or
//! `IDLE → SIGNING → RELEASING → PAID` (release). The first transition
//! happens synchronously in [`TransactionSimulator::start`]; each later one
//! fires from a Tokio task after the previous phase's delay.
//!
//! Transitions and cancellation serialize on one lock per flow, so once
//! [`TransactionHandle::cancel`] returns no further transition is applied or
//! observed. Dropping a handle cancels its flow.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use creth_types::transaction::{TransactionState, TxKind, TxPhase};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{EscrowError, Result};

/// Identifier of one simulated transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxId(pub u64);

/// How long each non-terminal phase lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseDelays {
    /// Time spent in `SIGNING`.
    pub signing: Duration,
    /// Time spent in `CONFIRMING` or `RELEASING`.
    pub settling: Duration,
}

impl PhaseDelays {
    pub const STAKE: PhaseDelays = PhaseDelays {
        signing: Duration::from_millis(2000),
        settling: Duration::from_millis(3000),
    };

    pub const RELEASE: PhaseDelays = PhaseDelays {
        signing: Duration::from_millis(1500),
        settling: Duration::from_millis(3500),
    };
}

/// Failure injection for exercising error paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Every flow succeeds.
    #[default]
    Never,
    /// Flows end in `FAILED` instead of entering the given phase.
    ///
    /// Only flows that visit the phase are affected: `AtPhase(Releasing)`
    /// fails releases and leaves stakes alone. `Idle` and `Failed` are never
    /// entered by a transition and are rejected by [`FailurePolicy::validate`].
    AtPhase(TxPhase),
}

impl FailurePolicy {
    /// Reject policies that could never fire.
    pub fn validate(&self) -> Result<()> {
        match self {
            FailurePolicy::AtPhase(phase @ (TxPhase::Idle | TxPhase::Failed)) => Err(
                EscrowError::InvalidPolicy(format!("{phase:?} is never entered by a transition")),
            ),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulatorConfig {
    pub stake: PhaseDelays,
    pub release: PhaseDelays,
    pub failure: FailurePolicy,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            stake: PhaseDelays::STAKE,
            release: PhaseDelays::RELEASE,
            failure: FailurePolicy::Never,
        }
    }
}

impl SimulatorConfig {
    pub fn delays(&self, kind: TxKind) -> PhaseDelays {
        match kind {
            TxKind::Stake => self.stake,
            TxKind::Release => self.release,
        }
    }
}

/// Receives every phase transition.
///
/// Called with the flow's lock held: implementations must not call back
/// into the [`TransactionHandle`] they observe.
pub trait PhaseObserver: Send + Sync {
    fn on_transition(&self, id: TxId, state: &TransactionState);
}

impl<F> PhaseObserver for F
where
    F: Fn(TxId, &TransactionState) + Send + Sync,
{
    fn on_transition(&self, id: TxId, state: &TransactionState) {
        self(id, state)
    }
}

/// Starts simulated transactions.
#[derive(Clone)]
pub struct TransactionSimulator {
    config: SimulatorConfig,
    observer: Option<Arc<dyn PhaseObserver>>,
    next_id: Arc<AtomicU64>,
}

impl TransactionSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            observer: None,
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Attach an observer notified of every transition of every flow.
    pub fn with_observer(mut self, observer: Arc<dyn PhaseObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Start a new flow.
    ///
    /// # Errors
    ///
    /// [`EscrowError::NoRuntime`] when called outside a Tokio runtime. No
    /// transition is applied in that case.
    pub fn start(&self, kind: TxKind) -> Result<TransactionHandle> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| EscrowError::NoRuntime)?;
        let id = TxId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let (state_tx, state_rx) = watch::channel(TransactionState::idle(kind));
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let flow = Arc::new(Flow {
            id,
            observer: self.observer.clone(),
            inner: Mutex::new(FlowInner {
                cancelled: false,
                state: TransactionState::idle(kind),
            }),
            state_tx,
            cancel_tx,
        });

        info!(tx = id.0, kind = kind.as_str(), "transaction started");

        let mut steps = plan(kind, self.config.delays(kind), self.config.failure).into_iter();
        // IDLE → first phase happens before start returns.
        let continues = match steps.next() {
            Some(first) => flow.enter(first) && !first.fails,
            None => false,
        };
        let task = continues.then(|| {
            let remaining: Vec<Step> = steps.collect();
            let driver = flow.clone();
            runtime.spawn(async move {
                for step in remaining {
                    tokio::time::sleep(step.delay).await;
                    if !driver.enter(step) || step.fails {
                        return;
                    }
                }
            })
        });

        Ok(TransactionHandle {
            id,
            kind,
            flow,
            task,
            state_rx,
            cancel_rx,
        })
    }
}

/// One scheduled transition.
#[derive(Clone, Copy, Debug)]
struct Step {
    delay: Duration,
    phase: TxPhase,
    /// Enter `FAILED` instead of `phase`.
    fails: bool,
}

/// Build the transition schedule for a flow, truncated at an injected failure.
fn plan(kind: TxKind, delays: PhaseDelays, failure: FailurePolicy) -> Vec<Step> {
    let waits = [Duration::ZERO, delays.signing, delays.settling];
    let mut steps = Vec::with_capacity(waits.len());
    for (&phase, &delay) in kind.phases().iter().zip(waits.iter()) {
        let fails = failure == FailurePolicy::AtPhase(phase);
        steps.push(Step { delay, phase, fails });
        if fails {
            break;
        }
    }
    steps
}

struct Flow {
    id: TxId,
    observer: Option<Arc<dyn PhaseObserver>>,
    inner: Mutex<FlowInner>,
    state_tx: watch::Sender<TransactionState>,
    cancel_tx: watch::Sender<bool>,
}

struct FlowInner {
    cancelled: bool,
    state: TransactionState,
}

impl Flow {
    /// Apply one transition unless the flow was cancelled.
    fn enter(&self, step: Step) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.cancelled {
            debug!(tx = self.id.0, phase = ?step.phase, "transition skipped after cancel");
            return false;
        }

        let mut state = inner.state.clone();
        if step.fails {
            state.phase = TxPhase::Failed;
            state.failure = Some(format!("injected failure entering {:?}", step.phase));
            warn!(tx = self.id.0, kind = state.kind.as_str(), phase = ?step.phase, "transaction failed");
        } else {
            state.phase = step.phase;
            state.result_hash = match step.phase {
                TxPhase::Success => Some(random_tx_hash()),
                TxPhase::Paid => Some(random_payout_ref()),
                _ => None,
            };
            info!(tx = self.id.0, kind = state.kind.as_str(), phase = ?state.phase, "transaction phase");
        }

        inner.state = state.clone();
        if let Some(observer) = &self.observer {
            observer.on_transition(self.id, &state);
        }
        self.state_tx.send_replace(state);
        true
    }
}

/// Handle to a running or finished flow.
pub struct TransactionHandle {
    id: TxId,
    kind: TxKind,
    flow: Arc<Flow>,
    task: Option<JoinHandle<()>>,
    state_rx: watch::Receiver<TransactionState>,
    cancel_rx: watch::Receiver<bool>,
}

impl TransactionHandle {
    pub fn id(&self) -> TxId {
        self.id
    }

    pub fn kind(&self) -> TxKind {
        self.kind
    }

    /// Current snapshot.
    pub fn state(&self) -> TransactionState {
        self.state_rx.borrow().clone()
    }

    pub fn phase(&self) -> TxPhase {
        self.state_rx.borrow().phase
    }

    /// Receive every subsequent transition.
    pub fn subscribe(&self) -> watch::Receiver<TransactionState> {
        self.state_rx.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel_rx.borrow()
    }

    /// Cancel all pending transitions.
    ///
    /// Returns false if the flow had already finished or been cancelled.
    pub fn cancel(&self) -> bool {
        {
            let mut inner = self.flow.inner.lock().unwrap_or_else(PoisonError::into_inner);
            if inner.cancelled || inner.state.is_finished() {
                return false;
            }
            inner.cancelled = true;
        }
        if let Some(task) = &self.task {
            task.abort();
        }
        self.flow.cancel_tx.send_replace(true);
        info!(tx = self.id.0, kind = self.kind.as_str(), "transaction cancelled");
        true
    }

    /// Wait for the terminal phase.
    ///
    /// # Errors
    ///
    /// - [`EscrowError::Cancelled`] if the flow is cancelled first
    /// - [`EscrowError::Failed`] if the flow ends in `FAILED`
    pub async fn wait(&self) -> Result<TransactionState> {
        let mut state_rx = self.state_rx.clone();
        let mut cancel_rx = self.cancel_rx.clone();
        loop {
            if *cancel_rx.borrow_and_update() {
                return Err(EscrowError::Cancelled);
            }
            let state = state_rx.borrow_and_update().clone();
            if state.phase == TxPhase::Failed {
                return Err(EscrowError::Failed(state.failure.unwrap_or_default()));
            }
            if state.is_finished() {
                return Ok(state);
            }

            tokio::select! {
                changed = state_rx.changed() => changed.map_err(|_| EscrowError::Closed)?,
                changed = cancel_rx.changed() => changed.map_err(|_| EscrowError::Closed)?,
            }
        }
    }
}

impl Drop for TransactionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Pseudo-random 32-byte transaction id, hex encoded.
fn random_tx_hash() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn random_payout_ref() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("payout-{}", hex::encode(bytes))
}
