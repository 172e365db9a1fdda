//! # creth-escrow
//!
//! Simulated staking and reward-release flows.
//!
//! No funds move: each flow is a strictly ordered sequence of timed phases
//! driven by a Tokio task, ending in a pseudo-random transaction id (stake)
//! or payout reference (release).
//!
//! ## Modules
//!
//! - [`simulator`]: phase state machine with cancellable transitions
//! - [`contract`]: escrow contract interface and its simulated implementation

pub mod contract;
pub mod simulator;

pub use contract::{EscrowContract, SimulatedEscrow};
pub use simulator::{
    FailurePolicy, PhaseDelays, PhaseObserver, SimulatorConfig, TransactionHandle,
    TransactionSimulator, TxId,
};

/// Error types for escrow operations.
#[derive(Debug, thiserror::Error)]
pub enum EscrowError {
    /// The flow was cancelled before reaching its terminal phase.
    #[error("transaction cancelled")]
    Cancelled,

    /// The flow ended in the failed state (failure injection).
    #[error("transaction failed: {0}")]
    Failed(String),

    /// The driving task went away without finishing.
    #[error("transaction task closed unexpectedly")]
    Closed,

    /// Flows are driven by Tokio tasks and need a runtime to start.
    #[error("no Tokio runtime to drive the transaction")]
    NoRuntime,

    /// A failure policy naming a phase no flow can enter.
    #[error("invalid failure policy: {0}")]
    InvalidPolicy(String),
}

/// Convenience result type for escrow operations.
pub type Result<T> = std::result::Result<T, EscrowError>;
