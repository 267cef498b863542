use alloy_primitives::{uint, Address, Bytes, PrimitiveSignature, B256, U256};
use k256::ecdsa::SigningKey;
use serde::{Deserialize, Serialize};

use crate::eip712::{encode_validator_data, ClaimDomain};
use crate::types::*;

/// Half the secp256k1 group order. Canonical signatures have `s` at or below it.
const SECP256K1_HALF_ORDER: U256 =
    uint!(0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256);

/// Parse a 65-byte `r || s || v` signature in canonical form.
///
/// Only `v` in {27, 28} and low `s` are accepted, so each authorization has
/// exactly one byte encoding.
pub fn parse_signature(bytes: &[u8]) -> ValidatorResult<PrimitiveSignature> {
    if bytes.len() != 65 {
        return Err(ValidatorError::InvalidSignature);
    }
    let y_parity = match bytes[64] {
        27 => false,
        28 => true,
        _ => return Err(ValidatorError::InvalidSignature),
    };
    let r = U256::from_be_slice(&bytes[..32]);
    let s = U256::from_be_slice(&bytes[32..64]);
    if s > SECP256K1_HALF_ORDER {
        return Err(ValidatorError::InvalidSignature);
    }
    Ok(PrimitiveSignature::new(r, s, y_parity))
}

/// What a signer is asked to authorize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub boost_id: U256,
    pub incentive_quantity: u8,
    pub claimant: Address,
    pub incentive_data: Bytes,
    /// V2 only. Defaults to the claimant.
    #[serde(default)]
    pub referrer: Option<Address>,
}

/// A signed authorization, ready to present to a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedClaim {
    pub digest: B256,
    pub signature: Bytes,
    pub validator_data: Bytes,
    pub claim_data: Bytes,
}

/// Signs claim authorizations with a secp256k1 key.
#[derive(Clone)]
pub struct ClaimSigner {
    key: SigningKey,
    address: Address,
}

impl std::fmt::Debug for ClaimSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl ClaimSigner {
    /// Wrap a signing key, deriving its address.
    pub fn new(key: SigningKey) -> Self {
        let address = Address::from_private_key(&key);
        Self { key, address }
    }

    /// Parse a 32-byte private key, with or without a `0x` prefix.
    pub fn from_hex(private_key: &str) -> ValidatorResult<Self> {
        let raw = private_key.trim().trim_start_matches("0x");
        let bytes = hex::decode(raw).map_err(|e| ValidatorError::InvalidKey(e.to_string()))?;
        let key =
            SigningKey::from_slice(&bytes).map_err(|e| ValidatorError::InvalidKey(e.to_string()))?;
        Ok(Self::new(key))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a 32-byte digest, returning `r || s || v` with `v` in {27, 28}.
    pub fn sign_hash(&self, digest: &B256) -> ValidatorResult<Bytes> {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(digest.as_slice())
            .map_err(|e| ValidatorError::Signing(e.to_string()))?;

        let mut bytes = Vec::with_capacity(65);
        bytes.extend_from_slice(&signature.to_bytes());
        bytes.push(27 + recovery_id.to_byte());
        Ok(bytes.into())
    }

    /// Sign `request` under `domain` and encode the resulting claim data.
    pub fn sign_claim(&self, domain: &ClaimDomain, request: &ClaimRequest) -> ValidatorResult<SignedClaim> {
        let referrer = match domain.version {
            ValidatorVersion::V1 => None,
            ValidatorVersion::V2 => Some(request.referrer.unwrap_or(request.claimant)),
        };

        let digest = domain.claim_digest(
            request.boost_id,
            request.incentive_quantity,
            request.claimant,
            &request.incentive_data,
            referrer.unwrap_or(request.claimant),
        );
        let signature = self.sign_hash(&digest)?;

        let validator_data =
            encode_validator_data(self.address, signature.clone(), request.incentive_quantity);
        let claim_data = domain.encode_claim_data(
            self.address,
            signature.clone(),
            request.incentive_quantity,
            request.incentive_data.clone(),
            referrer,
        );

        Ok(SignedClaim {
            digest,
            signature,
            validator_data,
            claim_data,
        })
    }
}
