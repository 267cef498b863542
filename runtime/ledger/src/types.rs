use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while recording a claim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("claim {0} has already been consumed")]
    AlreadyConsumed(B256),

    #[error("claimant {claimant} reached the claim limit of {limit}")]
    ClaimLimitExceeded { claimant: Address, limit: u32 },

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Outcome of a successfully recorded claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    /// Validator instance the claim was recorded against.
    pub scope: Address,
    /// Consumption key of the claim.
    pub key: B256,
    pub claimant: Address,
    /// The claimant's count against `scope` after this claim.
    pub claim_count: u32,
}

/// The authoritative store of consumed claims and claim counters.
///
/// State is partitioned by `scope`, the address of the validator instance
/// that owns it. `record_claim` must be indivisible: the consumed check, the
/// limit check, the counter increment and the consumption insert either all
/// happen or none do, even with concurrent callers.
pub trait ClaimLedger: Send + Sync {
    /// Whether `key` has been consumed under `scope`.
    fn is_consumed(&self, scope: &Address, key: &B256) -> bool;

    /// Successful claims recorded for `claimant` under `scope`.
    fn claim_count(&self, scope: &Address, claimant: &Address) -> u32;

    /// Consume `key` for `claimant`, enforcing `limit` when present.
    fn record_claim(
        &self,
        scope: Address,
        key: B256,
        claimant: Address,
        limit: Option<u32>,
    ) -> LedgerResult<ClaimReceipt>;
}
