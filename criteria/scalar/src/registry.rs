use std::collections::HashMap;

use alloy_json_abi::{Event, Function};
use alloy_primitives::B256;

use crate::types::{ScalarError, ScalarResult};

/// A structured function or event definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureDefinition {
    Function(Function),
    Event(Event),
}

impl SignatureDefinition {
    /// Parse a human-readable definition, e.g.
    /// `function transferFrom(address,address,uint256)` or
    /// `event Transfer(address indexed from, address indexed to, uint256 value)`.
    ///
    /// Definitions without a leading keyword are treated as functions.
    pub fn parse(signature: &str) -> ScalarResult<Self> {
        let trimmed = signature.trim();
        let invalid = |reason: String| ScalarError::InvalidDefinition {
            signature: trimmed.to_string(),
            reason,
        };

        if trimmed.starts_with("event ") {
            Event::parse(trimmed)
                .map(SignatureDefinition::Event)
                .map_err(|e| invalid(e.to_string()))
        } else {
            Function::parse(trimmed)
                .map(SignatureDefinition::Function)
                .map_err(|e| invalid(e.to_string()))
        }
    }

    /// The 32-byte key criteria records use for this definition.
    pub fn key(&self) -> B256 {
        match self {
            SignatureDefinition::Function(function) => function_key(function),
            SignatureDefinition::Event(event) => event.selector(),
        }
    }
}

/// Registry key for a function: its 4-byte selector left-padded to 32 bytes.
pub fn function_key(function: &Function) -> B256 {
    B256::left_padding_from(function.selector().as_slice())
}

/// Read-only lookup from selector/topic to definition.
pub trait SignatureRegistry {
    fn lookup(&self, key: &B256) -> Option<&SignatureDefinition>;

    fn function(&self, key: &B256) -> ScalarResult<&Function> {
        match self.lookup(key) {
            Some(SignatureDefinition::Function(function)) => Ok(function),
            _ => Err(ScalarError::UnknownSignature(*key)),
        }
    }

    fn event(&self, key: &B256) -> ScalarResult<&Event> {
        match self.lookup(key) {
            Some(SignatureDefinition::Event(event)) => Ok(event),
            _ => Err(ScalarError::UnknownSignature(*key)),
        }
    }
}

/// In-memory registry of known signatures.
#[derive(Debug, Clone, Default)]
pub struct KnownSignatures {
    definitions: HashMap<B256, SignatureDefinition>,
}

impl KnownSignatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from human-readable definitions.
    pub fn from_signatures<I, S>(signatures: I) -> ScalarResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for signature in signatures {
            registry.insert(SignatureDefinition::parse(signature.as_ref())?);
        }
        Ok(registry)
    }

    /// Insert a definition under its own key, returning the key.
    pub fn insert(&mut self, definition: SignatureDefinition) -> B256 {
        let key = definition.key();
        self.definitions.insert(key, definition);
        key
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl SignatureRegistry for KnownSignatures {
    fn lookup(&self, key: &B256) -> Option<&SignatureDefinition> {
        self.definitions.get(key)
    }
}

impl SignatureRegistry for HashMap<B256, SignatureDefinition> {
    fn lookup(&self, key: &B256) -> Option<&SignatureDefinition> {
        self.get(key)
    }
}
