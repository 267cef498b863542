use alloy_primitives::{Address, U256};
use alloy_sol_types::SolValue;
use boost_scalar::{Criteria, Evidence, IncentiveCriteria, SignatureRegistry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::*;
use crate::wad::{can_be_claimed, compute_reward, remaining_claim_potential};

/// An incentive whose payout scales with a value read from transaction
/// evidence (or attested by a signer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableCriteriaIncentive {
    owner: Address,
    criteria: IncentiveCriteria,
    params: RewardParameters,
}

impl VariableCriteriaIncentive {
    /// Create an incentive. The criteria record is checked up front and
    /// never changes afterwards.
    pub fn new(
        owner: Address,
        criteria: IncentiveCriteria,
        params: RewardParameters,
    ) -> RewardsResult<Self> {
        Criteria::try_from(&criteria)?;
        Ok(Self {
            owner,
            criteria,
            params,
        })
    }

    /// The only address allowed to claw back.
    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn criteria(&self) -> &IncentiveCriteria {
        &self.criteria
    }

    /// Per-claim cap, zero when uncapped.
    pub fn max_reward(&self) -> U256 {
        self.params.max_reward
    }

    /// Total budget across all claims.
    pub fn limit(&self) -> U256 {
        self.params.limit
    }

    /// The WAD reward rate.
    pub fn reward(&self) -> U256 {
        self.params.reward_rate
    }

    /// Amount paid out so far.
    pub fn total_claimed(&self) -> U256 {
        self.params.total_claimed
    }

    /// The funded asset.
    pub fn asset(&self) -> Address {
        self.params.asset
    }

    /// Asset the reward is denominated in, if pegged.
    pub fn peg(&self) -> Option<Address> {
        self.params.peg
    }

    pub fn parameters(&self) -> &RewardParameters {
        &self.params
    }

    /// Budget left before the limit is reached.
    pub fn remaining_claim_potential(&self) -> U256 {
        remaining_claim_potential(self.params.limit, self.params.total_claimed)
    }

    pub fn can_be_claimed(&self) -> bool {
        can_be_claimed(self.params.limit, self.params.total_claimed)
    }

    /// What `scalar` would pay, without touching the budget.
    pub fn preview(&self, scalar: U256) -> RewardsResult<U256> {
        compute_reward(self.params.reward_rate, scalar, self.params.max_reward)
    }

    /// Pay out for `scalar`, charging the amount against the budget.
    pub fn claim(&mut self, claimant: Address, scalar: U256) -> RewardsResult<Payout> {
        let amount = self.preview(scalar)?;
        if amount.is_zero() {
            return Err(RewardsError::ZeroReward);
        }

        let remaining = self.remaining_claim_potential();
        if amount > remaining {
            return Err(RewardsError::ClaimExceedsLimit { amount, remaining });
        }

        self.params.total_claimed += amount;
        debug!(
            %claimant,
            %scalar,
            %amount,
            total_claimed = %self.params.total_claimed,
            "incentive claimed"
        );

        Ok(Payout {
            claimant,
            asset: self.params.payout_asset(),
            amount,
        })
    }

    /// Extract the scalar from `evidence` with this incentive's criteria and claim it.
    pub fn claim_with_evidence<R>(
        &mut self,
        claimant: Address,
        evidence: &Evidence,
        registry: &R,
    ) -> RewardsResult<Payout>
    where
        R: SignatureRegistry + ?Sized,
    {
        let scalar = Criteria::try_from(&self.criteria)?.scalar(evidence, registry)?;
        self.claim(claimant, scalar)
    }

    /// Reduce the budget by `amount`. Claimed funds cannot be clawed back.
    pub fn clawback(&mut self, caller: Address, amount: U256) -> RewardsResult<U256> {
        if caller != self.owner {
            return Err(RewardsError::NotOwner(caller));
        }
        let remaining = self.remaining_claim_potential();
        if amount > remaining {
            return Err(RewardsError::ClawbackExceedsRemaining { amount, remaining });
        }

        self.params.limit -= amount;
        info!(%amount, limit = %self.params.limit, "incentive clawed back");
        Ok(self.params.limit)
    }
}

/// The amount a signer attested to in `incentiveData`, ABI-encoded as a `uint256`.
pub fn signed_amount(incentive_data: &[u8]) -> RewardsResult<U256> {
    U256::abi_decode(incentive_data, true).map_err(|e| RewardsError::InvalidIncentiveData(e.to_string()))
}

/// Encode an attested amount for `incentiveData`.
pub fn encode_signed_amount(amount: U256) -> Vec<u8> {
    amount.abi_encode()
}
