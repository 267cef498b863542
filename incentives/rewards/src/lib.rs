pub mod incentive;
pub mod types;
pub mod wad;

pub use incentive::{encode_signed_amount, signed_amount, VariableCriteriaIncentive};
pub use types::*;
pub use wad::{can_be_claimed, compute_reward, remaining_claim_potential, WAD};
