use std::sync::Arc;

use alloy_primitives::{Address, U256};
use parking_lot::RwLock;
use tracing::info;

use crate::types::*;

/// The canonical claim-fee configuration. The only place the fee can be written.
#[derive(Debug)]
pub struct BaseConfig {
    owner: Address,
    fee: RwLock<U256>,
}

impl BaseConfig {
    /// Create a shareable base configuration.
    pub fn new(owner: Address, claim_fee: U256) -> Arc<Self> {
        Arc::new(Self {
            owner,
            fee: RwLock::new(claim_fee),
        })
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn claim_fee(&self) -> U256 {
        *self.fee.read()
    }

    /// Update the fee. Visible immediately to every clone of this base.
    pub fn set_claim_fee(&self, caller: Address, new_fee: U256) -> ValidatorResult<()> {
        if caller != self.owner {
            return Err(ValidatorError::NotOwner(caller));
        }
        let mut fee = self.fee.write();
        info!(old = %*fee, new = %new_fee, "claim fee updated");
        *fee = new_fee;
        Ok(())
    }
}

/// A lightweight instance that defers its fee to a base. Read-only.
#[derive(Debug, Clone)]
pub struct CloneInstance {
    base: Arc<BaseConfig>,
}

impl CloneInstance {
    pub fn new(base: &Arc<BaseConfig>) -> Self {
        Self {
            base: Arc::clone(base),
        }
    }

    /// The base's current fee.
    pub fn claim_fee(&self) -> U256 {
        self.base.claim_fee()
    }

    pub fn base(&self) -> &Arc<BaseConfig> {
        &self.base
    }
}

/// Where a fee-gated validator reads its fee from.
#[derive(Debug, Clone)]
pub enum FeeSource {
    Base(Arc<BaseConfig>),
    Clone(CloneInstance),
}

impl FeeSource {
    pub fn claim_fee(&self) -> U256 {
        match self {
            FeeSource::Base(base) => base.claim_fee(),
            FeeSource::Clone(clone) => clone.claim_fee(),
        }
    }

    /// Check that `paid` is exactly the current fee.
    pub fn check_payment(&self, paid: U256) -> ValidatorResult<()> {
        let expected = self.claim_fee();
        if paid != expected {
            return Err(ValidatorError::FeeMismatch {
                expected,
                got: paid,
            });
        }
        Ok(())
    }
}

impl From<CloneInstance> for FeeSource {
    fn from(clone: CloneInstance) -> Self {
        FeeSource::Clone(clone)
    }
}

impl From<Arc<BaseConfig>> for FeeSource {
    fn from(base: Arc<BaseConfig>) -> Self {
        FeeSource::Base(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        Address::repeat_byte(0xee)
    }

    #[test]
    fn test_clone_reads_base_fee() {
        let base = BaseConfig::new(owner(), U256::from(100));
        let clone = CloneInstance::new(&base);
        assert_eq!(clone.claim_fee(), U256::from(100));

        base.set_claim_fee(owner(), U256::from(250)).unwrap();
        assert_eq!(clone.claim_fee(), U256::from(250));
    }

    #[test]
    fn test_every_clone_sees_update() {
        let base = BaseConfig::new(owner(), U256::from(1));
        let clones: Vec<_> = (0..4).map(|_| CloneInstance::new(&base)).collect();
        base.set_claim_fee(owner(), U256::from(9)).unwrap();
        assert!(clones.iter().all(|c| c.claim_fee() == U256::from(9)));
    }

    #[test]
    fn test_only_owner_sets_fee() {
        let base = BaseConfig::new(owner(), U256::from(1));
        let intruder = Address::repeat_byte(1);
        assert_eq!(
            base.set_claim_fee(intruder, U256::ZERO),
            Err(ValidatorError::NotOwner(intruder))
        );
        assert_eq!(base.claim_fee(), U256::from(1));
    }

    #[test]
    fn test_check_payment_exact() {
        let base = BaseConfig::new(owner(), U256::from(100));
        let source = FeeSource::from(CloneInstance::new(&base));
        assert!(source.check_payment(U256::from(100)).is_ok());
        assert_eq!(
            source.check_payment(U256::from(99)),
            Err(ValidatorError::FeeMismatch {
                expected: U256::from(100),
                got: U256::from(99)
            })
        );
        assert!(matches!(
            source.check_payment(U256::from(101)),
            Err(ValidatorError::FeeMismatch { .. })
        ));
    }
}
