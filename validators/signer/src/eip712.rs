//! EIP-712 typed data and the ABI layouts of signer-validated claims.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{sol, Eip712Domain, SolStruct, SolType};
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Domain version string shared by every validator version.
pub const DOMAIN_VERSION: &str = "1";

sol! {
    /// Typed data a V1 signer attests to.
    #[derive(Debug, PartialEq, Eq)]
    struct SignerValidatorData {
        uint256 boostId;
        uint8 incentiveQuantity;
        address claimant;
        bytes incentiveData;
    }

    /// Claim data presented to a V1 validator.
    #[derive(Debug, PartialEq, Eq)]
    struct BoostClaimData {
        bytes validatorData;
        bytes incentiveData;
    }

    /// Claim data presented to a V2 validator.
    #[derive(Debug, PartialEq, Eq)]
    struct BoostClaimDataWithReferrer {
        bytes validatorData;
        bytes incentiveData;
        address referrer;
    }

    /// Contents of `validatorData`.
    #[derive(Debug, PartialEq, Eq)]
    struct SignerValidatorInputParams {
        address signer;
        bytes signature;
        uint8 incentiveQuantity;
    }
}

pub mod v2 {
    use alloy_sol_types::sol;

    sol! {
        /// Typed data a V2 signer attests to.
        #[derive(Debug, PartialEq, Eq)]
        struct SignerValidatorData {
            uint256 boostId;
            uint8 incentiveQuantity;
            address claimant;
            bytes incentiveData;
            address referrer;
        }
    }
}

/// Everything that separates signatures of one validator instance from
/// any other: chain, contract address and version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimDomain {
    pub version: ValidatorVersion,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl ClaimDomain {
    pub fn new(version: ValidatorVersion, chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            version,
            chain_id,
            verifying_contract,
        }
    }

    /// The EIP-712 domain separator fields for this validator.
    pub fn eip712(&self) -> Eip712Domain {
        Eip712Domain::new(
            Some(self.version.domain_name().into()),
            Some(DOMAIN_VERSION.into()),
            Some(U256::from(self.chain_id)),
            Some(self.verifying_contract),
            None,
        )
    }

    /// The digest a signer signs for a claim.
    ///
    /// V2 digests always include a referrer; pass the resolved one.
    pub fn claim_digest(
        &self,
        boost_id: U256,
        incentive_quantity: u8,
        claimant: Address,
        incentive_data: &Bytes,
        referrer: Address,
    ) -> B256 {
        let domain = self.eip712();
        match self.version {
            ValidatorVersion::V1 => SignerValidatorData {
                boostId: boost_id,
                incentiveQuantity: incentive_quantity,
                claimant,
                incentiveData: incentive_data.clone(),
            }
            .eip712_signing_hash(&domain),
            ValidatorVersion::V2 => v2::SignerValidatorData {
                boostId: boost_id,
                incentiveQuantity: incentive_quantity,
                claimant,
                incentiveData: incentive_data.clone(),
                referrer,
            }
            .eip712_signing_hash(&domain),
        }
    }

    /// Digest for an already decoded claim.
    pub fn authorization_digest(&self, boost_id: U256, auth: &ClaimAuthorization) -> B256 {
        self.claim_digest(
            boost_id,
            auth.incentive_quantity,
            auth.claimant,
            &auth.incentive_data,
            auth.referrer.unwrap_or(auth.claimant),
        )
    }

    /// Encode `validatorData` and wrap it with `incentiveData` in this version's layout.
    pub fn encode_claim_data(
        &self,
        signer: Address,
        signature: Bytes,
        incentive_quantity: u8,
        incentive_data: Bytes,
        referrer: Option<Address>,
    ) -> Bytes {
        let validator_data = encode_validator_data(signer, signature, incentive_quantity);
        let encoded = match self.version {
            ValidatorVersion::V1 => BoostClaimData::abi_encode(&BoostClaimData {
                validatorData: validator_data,
                incentiveData: incentive_data,
            }),
            ValidatorVersion::V2 => {
                BoostClaimDataWithReferrer::abi_encode(&BoostClaimDataWithReferrer {
                    validatorData: validator_data,
                    incentiveData: incentive_data,
                    referrer: referrer.unwrap_or(Address::ZERO),
                })
            }
        };
        encoded.into()
    }

    /// Decode presented claim data for `claimant`.
    pub fn decode_claim_data(
        &self,
        claimant: Address,
        claim_data: &[u8],
    ) -> ValidatorResult<ClaimAuthorization> {
        let (validator_data, incentive_data, referrer) = match self.version {
            ValidatorVersion::V1 => {
                let data = BoostClaimData::abi_decode(claim_data, true)
                    .map_err(|e| ValidatorError::MalformedClaimData(e.to_string()))?;
                (data.validatorData, data.incentiveData, None)
            }
            ValidatorVersion::V2 => {
                let data = BoostClaimDataWithReferrer::abi_decode(claim_data, true)
                    .map_err(|e| ValidatorError::MalformedClaimData(e.to_string()))?;
                let referrer = if data.referrer == Address::ZERO {
                    claimant
                } else {
                    data.referrer
                };
                (data.validatorData, data.incentiveData, Some(referrer))
            }
        };

        let params = SignerValidatorInputParams::abi_decode(&validator_data, true)
            .map_err(|e| ValidatorError::MalformedClaimData(format!("validator data: {e}")))?;

        Ok(ClaimAuthorization {
            signer: params.signer,
            signature: params.signature,
            incentive_quantity: params.incentiveQuantity,
            claimant,
            incentive_data,
            referrer,
        })
    }
}

/// ABI-encode the `validatorData` field.
pub fn encode_validator_data(signer: Address, signature: Bytes, incentive_quantity: u8) -> Bytes {
    SignerValidatorInputParams::abi_encode(&SignerValidatorInputParams {
        signer,
        signature,
        incentiveQuantity: incentive_quantity,
    })
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;

    fn domain(version: ValidatorVersion) -> ClaimDomain {
        ClaimDomain::new(version, 8453, Address::repeat_byte(0x11))
    }

    #[test]
    fn type_hash_matches_solidity_declaration() {
        let data = SignerValidatorData {
            boostId: U256::ZERO,
            incentiveQuantity: 0,
            claimant: Address::ZERO,
            incentiveData: Bytes::new(),
        };
        assert_eq!(
            data.eip712_type_hash(),
            keccak256(
                "SignerValidatorData(uint256 boostId,uint8 incentiveQuantity,address claimant,bytes incentiveData)"
            )
        );
    }

    #[test]
    fn digest_depends_on_domain() {
        let data = Bytes::from_static(b"data");
        let claimant = Address::repeat_byte(2);
        let base = domain(ValidatorVersion::V1).claim_digest(U256::from(1), 1, claimant, &data, claimant);

        let other_chain = ClaimDomain::new(ValidatorVersion::V1, 1, Address::repeat_byte(0x11));
        assert_ne!(base, other_chain.claim_digest(U256::from(1), 1, claimant, &data, claimant));

        let other_contract = ClaimDomain::new(ValidatorVersion::V1, 8453, Address::repeat_byte(0x12));
        assert_ne!(base, other_contract.claim_digest(U256::from(1), 1, claimant, &data, claimant));

        let other_version = domain(ValidatorVersion::V2);
        assert_ne!(base, other_version.claim_digest(U256::from(1), 1, claimant, &data, claimant));
    }

    #[test]
    fn v1_digest_ignores_referrer() {
        let d = domain(ValidatorVersion::V1);
        let data = Bytes::new();
        let claimant = Address::repeat_byte(2);
        assert_eq!(
            d.claim_digest(U256::from(1), 1, claimant, &data, claimant),
            d.claim_digest(U256::from(1), 1, claimant, &data, Address::repeat_byte(9))
        );
    }

    #[test]
    fn v1_claim_data_decodes() {
        let d = domain(ValidatorVersion::V1);
        let signer = Address::repeat_byte(5);
        let encoded = d.encode_claim_data(
            signer,
            Bytes::from(vec![1u8; 65]),
            3,
            Bytes::from_static(b"incentive"),
            None,
        );
        let auth = d.decode_claim_data(Address::repeat_byte(2), &encoded).unwrap();
        assert_eq!(auth.signer, signer);
        assert_eq!(auth.incentive_quantity, 3);
        assert_eq!(auth.incentive_data, Bytes::from_static(b"incentive"));
        assert_eq!(auth.referrer, None);
    }

    #[test]
    fn v2_zero_referrer_defaults_to_claimant() {
        let d = domain(ValidatorVersion::V2);
        let claimant = Address::repeat_byte(2);
        let encoded = d.encode_claim_data(Address::ZERO, Bytes::new(), 1, Bytes::new(), None);
        let auth = d.decode_claim_data(claimant, &encoded).unwrap();
        assert_eq!(auth.referrer, Some(claimant));

        let referrer = Address::repeat_byte(8);
        let encoded = d.encode_claim_data(Address::ZERO, Bytes::new(), 1, Bytes::new(), Some(referrer));
        let auth = d.decode_claim_data(claimant, &encoded).unwrap();
        assert_eq!(auth.referrer, Some(referrer));
    }

    #[test]
    fn garbage_claim_data_is_malformed() {
        let d = domain(ValidatorVersion::V1);
        let err = d.decode_claim_data(Address::ZERO, &[0xde, 0xad]).unwrap_err();
        assert!(matches!(err, ValidatorError::MalformedClaimData(_)));
    }
}
