use std::collections::HashSet;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::*;

/// Addresses allowed to co-sign claims, plus the single address allowed to
/// call `validate`. Only the owner may change either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerSet {
    owner: Address,
    validator_caller: Address,
    authorized: HashSet<Address>,
}

impl SignerSet {
    /// Create a signer set with an initial list of signers.
    /// Create a set with `signers` authorized from the start.
    pub fn new(owner: Address, signers: &[Address], validator_caller: Address) -> Self {
        Self {
            owner,
            validator_caller,
            authorized: signers.iter().copied().collect(),
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// The only address allowed to invoke `validate`.
    pub fn validator_caller(&self) -> Address {
        self.validator_caller
    }

    /// Whether `signer` may currently sign claims.
    pub fn is_authorized(&self, signer: &Address) -> bool {
        self.authorized.contains(signer)
    }

    /// Number of currently authorized signers.
    pub fn len(&self) -> usize {
        self.authorized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authorized.is_empty()
    }

    fn ensure_owner(&self, caller: Address) -> ValidatorResult<()> {
        if caller != self.owner {
            return Err(ValidatorError::NotOwner(caller));
        }
        Ok(())
    }

    /// Grant or revoke signers pairwise: `allowed[i]` applies to `signers[i]`.
    pub fn set_authorized(
        &mut self,
        caller: Address,
        signers: &[Address],
        allowed: &[bool],
    ) -> ValidatorResult<()> {
        self.ensure_owner(caller)?;
        if signers.len() != allowed.len() {
            return Err(ValidatorError::LengthMismatch {
                addresses: signers.len(),
                flags: allowed.len(),
            });
        }

        for (signer, allow) in signers.iter().zip(allowed) {
            if *allow {
                self.authorized.insert(*signer);
            } else {
                self.authorized.remove(signer);
            }
            info!(%signer, allowed = *allow, "signer authorization updated");
        }
        Ok(())
    }

    /// Replace the address permitted to invoke validation.
    pub fn set_validator_caller(&mut self, caller: Address, new_caller: Address) -> ValidatorResult<()> {
        self.ensure_owner(caller)?;
        info!(old = %self.validator_caller, new = %new_caller, "validator caller updated");
        self.validator_caller = new_caller;
        Ok(())
    }

    /// Hand the administrator role to another address.
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> ValidatorResult<()> {
        self.ensure_owner(caller)?;
        self.owner = new_owner;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        Address::repeat_byte(0xee)
    }

    fn signer(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    fn set() -> SignerSet {
        SignerSet::new(owner(), &[signer(1)], Address::repeat_byte(0xcc))
    }

    #[test]
    fn test_initial_signers() {
        let set = set();
        assert!(set.is_authorized(&signer(1)));
        assert!(!set.is_authorized(&signer(2)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.validator_caller(), Address::repeat_byte(0xcc));
    }

    #[test]
    fn test_set_authorized_grants_and_revokes() {
        let mut set = set();
        set.set_authorized(owner(), &[signer(1), signer(2)], &[false, true])
            .unwrap();
        assert!(!set.is_authorized(&signer(1)));
        assert!(set.is_authorized(&signer(2)));
    }

    #[test]
    fn test_set_authorized_length_mismatch() {
        let mut set = set();
        let err = set
            .set_authorized(owner(), &[signer(2), signer(3)], &[true])
            .unwrap_err();
        assert_eq!(
            err,
            ValidatorError::LengthMismatch {
                addresses: 2,
                flags: 1
            }
        );
        assert!(!set.is_authorized(&signer(2)));
    }

    #[test]
    fn test_admin_calls_require_owner() {
        let mut set = set();
        let intruder = signer(9);
        assert_eq!(
            set.set_authorized(intruder, &[intruder], &[true]),
            Err(ValidatorError::NotOwner(intruder))
        );
        assert_eq!(
            set.set_validator_caller(intruder, intruder),
            Err(ValidatorError::NotOwner(intruder))
        );
        assert_eq!(
            set.transfer_ownership(intruder, intruder),
            Err(ValidatorError::NotOwner(intruder))
        );
    }

    #[test]
    fn test_set_validator_caller() {
        let mut set = set();
        set.set_validator_caller(owner(), signer(4)).unwrap();
        assert_eq!(set.validator_caller(), signer(4));
    }

    #[test]
    fn test_transfer_ownership() {
        let mut set = set();
        set.transfer_ownership(owner(), signer(5)).unwrap();
        assert_eq!(set.owner(), signer(5));
        assert!(set.set_validator_caller(owner(), signer(6)).is_err());
        set.set_validator_caller(signer(5), signer(6)).unwrap();
    }
}
