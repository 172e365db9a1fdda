//! Simulated escrow transaction state.

use serde::{Deserialize, Serialize};

/// Which escrow flow a transaction runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxKind {
    /// Sponsor locks reward funds in the staking pool.
    Stake,
    /// Sponsor releases pooled funds to a winning submission.
    Release,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxPhase {
    Idle,
    Signing,
    Confirming,
    Releasing,
    Success,
    Paid,
    Failed,
}

impl TxKind {
    /// Phases visited after `Idle`, in order, ending with the terminal phase.
    pub fn phases(self) -> &'static [TxPhase] {
        match self {
            TxKind::Stake => &[TxPhase::Signing, TxPhase::Confirming, TxPhase::Success],
            TxKind::Release => &[TxPhase::Signing, TxPhase::Releasing, TxPhase::Paid],
        }
    }

    /// The phase a successful run ends in.
    pub fn terminal(self) -> TxPhase {
        match self {
            TxKind::Stake => TxPhase::Success,
            TxKind::Release => TxPhase::Paid,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TxKind::Stake => "stake",
            TxKind::Release => "release",
        }
    }
}

impl TxPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, TxPhase::Success | TxPhase::Paid | TxPhase::Failed)
    }
}

/// Snapshot of one transaction.
///
/// `result_hash` is set only once the terminal phase is reached: a
/// 64-hex-character transaction id for stakes, a payout reference for
/// releases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransactionState {
    pub kind: TxKind,
    pub phase: TxPhase,
    pub result_hash: Option<String>,
    pub failure: Option<String>,
}

impl TransactionState {
    pub fn idle(kind: TxKind) -> Self {
        Self {
            kind,
            phase: TxPhase::Idle,
            result_hash: None,
            failure: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }
}
