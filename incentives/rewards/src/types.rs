use alloy_primitives::{Address, U256};
use boost_scalar::ScalarError;
use serde::{Deserialize, Serialize};

/// Budget and pricing of one incentive instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardParameters {
    /// WAD-scaled multiplier applied to the scalar. Zero pays the scalar as-is.
    pub reward_rate: U256,
    /// Cumulative spend cap, denominated in `asset`.
    pub limit: U256,
    /// Per-claim cap. Zero means uncapped.
    pub max_reward: U256,
    pub total_claimed: U256,
    /// Asset accounted against `limit`.
    pub asset: Address,
    /// When set, payouts are made in this asset instead of `asset`.
    pub peg: Option<Address>,
}

impl RewardParameters {
    pub fn new(asset: Address, reward_rate: U256, limit: U256, max_reward: U256) -> Self {
        Self {
            reward_rate,
            limit,
            max_reward,
            total_claimed: U256::ZERO,
            asset,
            peg: None,
        }
    }

    pub fn with_peg(mut self, peg: Address) -> Self {
        self.peg = Some(peg);
        self
    }

    /// The asset payouts are made in.
    pub fn payout_asset(&self) -> Address {
        self.peg.unwrap_or(self.asset)
    }
}

/// A transfer the ledger should perform for a successful claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub claimant: Address,
    pub asset: Address,
    pub amount: U256,
}

/// Errors that can occur during reward computation and claiming.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RewardsError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("claim of {amount} exceeds remaining potential {remaining}")]
    ClaimExceedsLimit { amount: U256, remaining: U256 },

    #[error("computed reward is zero")]
    ZeroReward,

    #[error("clawback of {amount} exceeds unclaimed budget {remaining}")]
    ClawbackExceedsRemaining { amount: U256, remaining: U256 },

    #[error("{0} is not the owner")]
    NotOwner(Address),

    #[error("invalid incentive data: {0}")]
    InvalidIncentiveData(String),

    #[error("scalar extraction failed: {0}")]
    Scalar(#[from] ScalarError),
}

pub type RewardsResult<T> = Result<T, RewardsError>;
