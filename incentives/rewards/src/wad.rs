//! Fixed-point reward math. Rates are WAD-scaled (1e18 = 1.0).

use alloy_primitives::U256;

use crate::types::*;

/// 1e18.
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Payable amount for `scalar` at `reward_rate`, capped at `max_reward`.
///
/// A zero rate pays the scalar unchanged. A zero `max_reward` is uncapped.
pub fn compute_reward(reward_rate: U256, scalar: U256, max_reward: U256) -> RewardsResult<U256> {
    let payable = if reward_rate.is_zero() {
        scalar
    } else {
        reward_rate
            .checked_mul(scalar)
            .ok_or(RewardsError::Overflow)?
            / WAD
    };

    if !max_reward.is_zero() && payable > max_reward {
        return Ok(max_reward);
    }
    Ok(payable)
}

/// Budget left under `limit`.
pub fn remaining_claim_potential(limit: U256, total_claimed: U256) -> U256 {
    limit.saturating_sub(total_claimed)
}

pub fn can_be_claimed(limit: U256, total_claimed: U256) -> bool {
    !remaining_claim_potential(limit, total_claimed).is_zero()
}
