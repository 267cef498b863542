use alloy_primitives::{Address, U256};
use boost_ledger::ClaimLedger;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::eip712::ClaimDomain;
use crate::fee::FeeSource;
use crate::signer::parse_signature;
use crate::signers::SignerSet;
use crate::types::*;

/// Optional behaviours layered on the plain signer validator.
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    pub version: ValidatorVersion,
    /// Successful claims allowed per claimant. `None` means unlimited.
    pub max_claim_count: Option<u32>,
    /// Exact payment required on every `validate` call.
    pub fee: Option<FeeSource>,
}

impl ValidatorConfig {
    pub fn limited(max_claim_count: u32) -> Self {
        Self {
            max_claim_count: Some(max_claim_count),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: ValidatorVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_fee(mut self, fee: impl Into<FeeSource>) -> Self {
        self.fee = Some(fee.into());
        self
    }
}

/// Snapshot of a validator's static configuration, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorInfo {
    pub address: Address,
    pub domain: ClaimDomain,
    pub max_claim_count: Option<u32>,
    pub claim_fee: U256,
    pub signer_count: usize,
}

/// An EIP-712 signer validator instance.
///
/// The instance's own address is the EIP-712 verifying contract and the scope
/// under which its consumption records and claim counters are kept.
#[derive(Debug, Clone)]
pub struct SignerValidator {
    domain: ClaimDomain,
    signers: SignerSet,
    max_claim_count: Option<u32>,
    fee: Option<FeeSource>,
}

impl SignerValidator {
    pub fn new(
        address: Address,
        chain_id: u64,
        signers: SignerSet,
        config: ValidatorConfig,
    ) -> ValidatorResult<Self> {
        if config.max_claim_count == Some(0) {
            return Err(ValidatorError::ZeroClaimLimit);
        }

        Ok(Self {
            domain: ClaimDomain::new(config.version, chain_id, address),
            signers,
            max_claim_count: config.max_claim_count,
            fee: config.fee,
        })
    }

    /// The instance address, also its EIP-712 verifying contract.
    pub fn address(&self) -> Address {
        self.domain.verifying_contract
    }

    pub fn domain(&self) -> &ClaimDomain {
        &self.domain
    }

    pub fn signers(&self) -> &SignerSet {
        &self.signers
    }

    pub fn max_claim_count(&self) -> Option<u32> {
        self.max_claim_count
    }

    /// Current fee, zero when the validator is not fee-gated.
    pub fn claim_fee(&self) -> U256 {
        self.fee
            .as_ref()
            .map(FeeSource::claim_fee)
            .unwrap_or(U256::ZERO)
    }

    pub fn info(&self) -> ValidatorInfo {
        ValidatorInfo {
            address: self.address(),
            domain: self.domain,
            max_claim_count: self.max_claim_count,
            claim_fee: self.claim_fee(),
            signer_count: self.signers.len(),
        }
    }

    /// Grant or revoke signers. Owner only.
    pub fn set_authorized(
        &mut self,
        caller: Address,
        signers: &[Address],
        allowed: &[bool],
    ) -> ValidatorResult<()> {
        self.signers.set_authorized(caller, signers, allowed)
    }

    /// Hand the right to call `validate` to `new_caller`. Owner only.
    pub fn set_validator_caller(&mut self, caller: Address, new_caller: Address) -> ValidatorResult<()> {
        self.signers.set_validator_caller(caller, new_caller)
    }

    /// Decode `claim_data` the way this validator's version lays it out.
    pub fn decode_claim(&self, claim: &ClaimIdentity) -> ValidatorResult<ClaimAuthorization> {
        self.domain.decode_claim_data(claim.claimant, &claim.claim_data)
    }

    /// Validate a claim and consume it in `ledger`.
    ///
    /// Returns `Ok(true)` on success; every failure is an error, never `false`.
    pub fn validate<L: ClaimLedger + ?Sized>(
        &self,
        ledger: &L,
        ctx: &CallContext,
        claim: &ClaimIdentity,
    ) -> ValidatorResult<bool> {
        if ctx.caller != self.signers.validator_caller() {
            return Err(ValidatorError::UnauthorizedCaller(ctx.caller));
        }

        match &self.fee {
            Some(fee) => fee.check_payment(ctx.value)?,
            None if !ctx.value.is_zero() => {
                return Err(ValidatorError::FeeMismatch {
                    expected: U256::ZERO,
                    got: ctx.value,
                })
            }
            None => {}
        }

        let auth = self.decode_claim(claim)?;
        if claim.incentive_id >= U256::from(auth.incentive_quantity) {
            return Err(ValidatorError::IncentiveOutOfBounds {
                incentive_id: claim.incentive_id,
                quantity: auth.incentive_quantity,
            });
        }

        let digest = self.domain.authorization_digest(claim.boost_id, &auth);
        let signature = parse_signature(&auth.signature)?;
        let recovered = signature
            .recover_address_from_prehash(&digest)
            .map_err(|_| ValidatorError::InvalidSignature)?;

        if recovered != auth.signer || !self.signers.is_authorized(&recovered) {
            return Err(ValidatorError::UnauthorizedSigner(recovered));
        }

        let receipt = ledger.record_claim(
            self.address(),
            claim.consumption_key(),
            claim.claimant,
            self.max_claim_count,
        )?;

        debug!(
            validator = %self.address(),
            boost_id = %claim.boost_id,
            incentive_id = %claim.incentive_id,
            claimant = %claim.claimant,
            signer = %recovered,
            claim_count = receipt.claim_count,
            "claim validated"
        );
        Ok(true)
    }
}
