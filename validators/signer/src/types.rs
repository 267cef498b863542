use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use boost_ledger::LedgerError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which claim-data layout and EIP-712 domain a validator speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ValidatorVersion {
    /// `(validatorData, incentiveData)`.
    #[default]
    V1,
    /// `(validatorData, incentiveData, referrer)`.
    V2,
}

impl ValidatorVersion {
    /// EIP-712 domain name.
    pub fn domain_name(self) -> &'static str {
        match self {
            ValidatorVersion::V1 => "SignerValidator",
            ValidatorVersion::V2 => "SignerValidatorV2",
        }
    }
}

/// The unit of replay protection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimIdentity {
    pub boost_id: U256,
    pub incentive_id: U256,
    pub claimant: Address,
    pub claim_data: Bytes,
}

impl ClaimIdentity {
    pub fn new(boost_id: U256, incentive_id: U256, claimant: Address, claim_data: Bytes) -> Self {
        Self {
            boost_id,
            incentive_id,
            claimant,
            claim_data,
        }
    }

    /// `keccak256(abi.encode(boostId, incentiveId, claimant, claimData))`.
    pub fn consumption_key(&self) -> B256 {
        let encoded = (
            self.boost_id,
            self.incentive_id,
            self.claimant,
            self.claim_data.clone(),
        )
            .abi_encode_params();
        keccak256(encoded)
    }
}

/// Decoded content of a presented claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimAuthorization {
    pub signer: Address,
    pub signature: Bytes,
    pub incentive_quantity: u8,
    pub claimant: Address,
    pub incentive_data: Bytes,
    /// Present for V2 claims only; a zero referrer resolves to the claimant.
    pub referrer: Option<Address>,
}

/// Per-call context supplied by whoever invokes `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    /// Payment attached to the call.
    pub value: U256,
}

impl CallContext {
    pub fn new(caller: Address) -> Self {
        Self {
            caller,
            value: U256::ZERO,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// Errors produced by the signer validator family.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidatorError {
    #[error("caller {0} is not the validator caller")]
    UnauthorizedCaller(Address),

    #[error("claim fee mismatch: expected {expected}, got {got}")]
    FeeMismatch { expected: U256, got: U256 },

    #[error("malformed claim data: {0}")]
    MalformedClaimData(String),

    #[error("incentive {incentive_id} out of bounds for quantity {quantity}")]
    IncentiveOutOfBounds { incentive_id: U256, quantity: u8 },

    #[error("invalid signature")]
    InvalidSignature,

    #[error("signer {0} is not authorized")]
    UnauthorizedSigner(Address),

    #[error("claim {0} has already been consumed")]
    AlreadyConsumed(B256),

    #[error("claimant {claimant} reached the claim limit of {limit}")]
    ClaimLimitExceeded { claimant: Address, limit: u32 },

    #[error("{0} is not the owner")]
    NotOwner(Address),

    #[error("length mismatch: {addresses} addresses, {flags} flags")]
    LengthMismatch { addresses: usize, flags: usize },

    #[error("max claim count must be greater than zero")]
    ZeroClaimLimit,

    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("ledger error: {0}")]
    Ledger(String),
}

impl From<LedgerError> for ValidatorError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AlreadyConsumed(key) => ValidatorError::AlreadyConsumed(key),
            LedgerError::ClaimLimitExceeded { claimant, limit } => {
                ValidatorError::ClaimLimitExceeded { claimant, limit }
            }
            LedgerError::Unavailable(reason) => ValidatorError::Ledger(reason),
        }
    }
}

pub type ValidatorResult<T> = Result<T, ValidatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(data: &[u8]) -> ClaimIdentity {
        ClaimIdentity::new(
            U256::from(1),
            U256::from(0),
            Address::repeat_byte(7),
            Bytes::copy_from_slice(data),
        )
    }

    #[test]
    fn consumption_key_is_deterministic() {
        assert_eq!(claim(b"abc").consumption_key(), claim(b"abc").consumption_key());
    }

    #[test]
    fn consumption_key_covers_every_field() {
        let base = claim(b"abc");
        let mut other = base.clone();
        other.incentive_id = U256::from(1);
        assert_ne!(base.consumption_key(), other.consumption_key());

        let mut other = base.clone();
        other.claimant = Address::repeat_byte(8);
        assert_ne!(base.consumption_key(), other.consumption_key());

        assert_ne!(base.consumption_key(), claim(b"abd").consumption_key());
    }

    #[test]
    fn ledger_errors_map_to_validator_errors() {
        let key = B256::repeat_byte(3);
        assert_eq!(
            ValidatorError::from(LedgerError::AlreadyConsumed(key)),
            ValidatorError::AlreadyConsumed(key)
        );
        assert_eq!(
            ValidatorError::from(LedgerError::ClaimLimitExceeded {
                claimant: Address::ZERO,
                limit: 1
            }),
            ValidatorError::ClaimLimitExceeded {
                claimant: Address::ZERO,
                limit: 1
            }
        );
    }

    #[test]
    fn domain_names_per_version() {
        assert_eq!(ValidatorVersion::V1.domain_name(), "SignerValidator");
        assert_eq!(ValidatorVersion::V2.domain_name(), "SignerValidatorV2");
    }
}
