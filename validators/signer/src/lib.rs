pub mod eip712;
pub mod fee;
pub mod signer;
pub mod signers;
pub mod types;
pub mod validator;

pub use eip712::ClaimDomain;
pub use fee::{BaseConfig, CloneInstance, FeeSource};
pub use signer::{parse_signature, ClaimRequest, ClaimSigner, SignedClaim};
pub use signers::SignerSet;
pub use types::*;
pub use validator::{SignerValidator, ValidatorConfig, ValidatorInfo};
