use std::path::Path;
use std::time::Duration;

use boost_scalar::{Criteria, IncentiveCriteria, KnownSignatures, SignatureDefinition};
use serde::{Deserialize, Serialize};

/// Errors that can occur while loading or checking a claim config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("rpc_url must be an http(s) URL, got `{0}`")]
    InvalidRpcUrl(String),

    #[error("timeout_ms must be > 0")]
    ZeroTimeout,

    #[error("chain_id must be > 0")]
    ZeroChainId,

    #[error("signature at index {index} is invalid: {reason}")]
    InvalidSignature { index: usize, reason: String },

    #[error("invalid criteria: {0}")]
    InvalidCriteria(String),

    #[error("no [criteria] table in config")]
    MissingCriteria,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// One human-readable entry of the known-signature registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEntry {
    /// e.g. `event Transfer(address indexed from, address indexed to, uint256 value)`.
    pub definition: String,
}

/// Operator configuration for resolving scalars against a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub timeout_ms: u64,
    #[serde(default)]
    pub signatures: Vec<SignatureEntry>,
    #[serde(default)]
    pub criteria: Option<IncentiveCriteria>,
}

impl ClaimConfig {
    /// Load a claim config from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Write the config to a TOML file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check the config for obvious mistakes before touching the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(ConfigError::InvalidRpcUrl(self.rpc_url.clone()));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.chain_id == 0 {
            return Err(ConfigError::ZeroChainId);
        }

        self.registry()?;

        if let Some(criteria) = &self.criteria {
            Criteria::try_from(criteria).map_err(|e| ConfigError::InvalidCriteria(e.to_string()))?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Build the registry from `[[signatures]]`.
    pub fn registry(&self) -> Result<KnownSignatures, ConfigError> {
        let mut registry = KnownSignatures::new();
        for (index, entry) in self.signatures.iter().enumerate() {
            let definition =
                SignatureDefinition::parse(&entry.definition).map_err(|e| ConfigError::InvalidSignature {
                    index,
                    reason: e.to_string(),
                })?;
            registry.insert(definition);
        }
        Ok(registry)
    }

    /// The configured criteria, required by `scalar`.
    pub fn criteria(&self) -> Result<&IncentiveCriteria, ConfigError> {
        self.criteria.as_ref().ok_or(ConfigError::MissingCriteria)
    }

    /// A local-node config with common ERC-20 signatures and gas-rebate criteria.
    pub fn default_local() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            chain_id: 31337,
            timeout_ms: 10_000,
            signatures: [
                "function transfer(address to, uint256 amount)",
                "function transferFrom(address from, address to, uint256 amount)",
                "event Transfer(address indexed from, address indexed to, uint256 value)",
            ]
            .iter()
            .map(|d| SignatureEntry {
                definition: d.to_string(),
            })
            .collect(),
            criteria: Some(boost_scalar::gas_rebate_criteria()),
        }
    }
}
