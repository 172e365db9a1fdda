//! Escrow contract interface.
//!
//! A production client would talk to an on-chain staking contract here.
//! [`SimulatedEscrow`] backs the same interface with the phase simulator.

use std::future::Future;

use creth_types::transaction::TxKind;
use tracing::info;

use crate::simulator::TransactionSimulator;
use crate::{EscrowError, Result};

/// Staking pool operations available to a sponsor.
pub trait EscrowContract {
    /// Lock `amount` reward units in the pool. Resolves to the transaction hash.
    fn lock(&self, amount: u64) -> impl Future<Output = Result<String>> + Send;

    /// Release pooled funds to `submission_id`. Resolves to a payout reference.
    fn release(&self, submission_id: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Escrow contract backed by [`TransactionSimulator`].
#[derive(Clone)]
pub struct SimulatedEscrow {
    simulator: TransactionSimulator,
}

impl SimulatedEscrow {
    pub fn new(simulator: TransactionSimulator) -> Self {
        Self { simulator }
    }

    async fn run(&self, kind: TxKind) -> Result<String> {
        let handle = self.simulator.start(kind)?;
        let state = handle.wait().await?;
        state.result_hash.ok_or(EscrowError::Closed)
    }
}

impl EscrowContract for SimulatedEscrow {
    fn lock(&self, amount: u64) -> impl Future<Output = Result<String>> + Send {
        async move {
            info!(amount, "locking funds in staking pool");
            self.run(TxKind::Stake).await
        }
    }

    fn release(&self, submission_id: &str) -> impl Future<Output = Result<String>> + Send {
        let submission_id = submission_id.to_string();
        async move {
            info!(submission = %submission_id, "releasing pooled funds");
            self.run(TxKind::Release).await
        }
    }
}
