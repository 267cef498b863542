use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// Field index reserved to mean "ignore decoding, use the transaction's gas cost".
pub const GAS_REBATE_SENTINEL: u8 = 255;

/// On-chain tag for the kind of evidence a criteria record decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CriteriaType {
    /// Decode the arguments of the transaction's top-level call.
    FunctionCall = 0,
    /// Decode the fields of the first receipt log matching a topic.
    EventLog = 1,
}

impl TryFrom<u8> for CriteriaType {
    type Error = ScalarError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(CriteriaType::FunctionCall),
            1 => Ok(CriteriaType::EventLog),
            other => Err(ScalarError::InvalidCriteriaType(other)),
        }
    }
}

/// How the extracted quantity is denominated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum ValueType {
    /// Raw integer units as emitted by the contract.
    #[default]
    Raw = 0,
    /// 18-decimal fixed point.
    Wad = 1,
}

impl TryFrom<u8> for ValueType {
    type Error = ScalarError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(ValueType::Raw),
            1 => Ok(ValueType::Wad),
            other => Err(ScalarError::InvalidValueType(other)),
        }
    }
}

/// Location of the scalar inside the decoded arguments.
///
/// A flat index selects a top-level argument. A path selects a tuple or
/// array argument with its first element and walks into it with the rest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldIndex {
    Flat(u8),
    Path(Vec<u8>),
}

impl FieldIndex {
    /// The indices to walk, outermost first.
    pub fn segments(&self) -> &[u8] {
        match self {
            FieldIndex::Flat(index) => std::slice::from_ref(index),
            FieldIndex::Path(path) => path,
        }
    }

    /// Whether this is the gas-rebate sentinel.
    pub fn is_gas_rebate(&self) -> bool {
        matches!(self, FieldIndex::Flat(GAS_REBATE_SENTINEL))
    }
}

impl From<u8> for FieldIndex {
    fn from(index: u8) -> Self {
        FieldIndex::Flat(index)
    }
}

impl From<Vec<u8>> for FieldIndex {
    fn from(path: Vec<u8>) -> Self {
        match path.as_slice() {
            [single] => FieldIndex::Flat(*single),
            _ => FieldIndex::Path(path),
        }
    }
}

/// The criteria record as stored on an incentive instance.
///
/// Tags are kept as raw bytes so corrupted records can be represented and
/// rejected when converted into a [`Criteria`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncentiveCriteria {
    pub criteria_type: u8,
    /// 32-byte event topic, or a 4-byte function selector left-padded to 32 bytes.
    pub signature: B256,
    pub field_index: FieldIndex,
    pub target_contract: Address,
    #[serde(default)]
    pub value_type: u8,
}

impl IncentiveCriteria {
    /// Criteria decoding an argument of a call made to `target_contract`.
    pub fn function_call(
        signature: B256,
        field_index: impl Into<FieldIndex>,
        target_contract: Address,
    ) -> Self {
        Self {
            criteria_type: CriteriaType::FunctionCall as u8,
            signature,
            field_index: field_index.into(),
            target_contract,
            value_type: ValueType::Raw as u8,
        }
    }

    /// Criteria decoding a field of an event emitted by `target_contract`.
    pub fn event_log(
        signature: B256,
        field_index: impl Into<FieldIndex>,
        target_contract: Address,
    ) -> Self {
        Self {
            criteria_type: CriteriaType::EventLog as u8,
            signature,
            field_index: field_index.into(),
            target_contract,
            value_type: ValueType::Raw as u8,
        }
    }

    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type as u8;
        self
    }
}

/// The canonical gas-rebate criteria record.
pub fn gas_rebate_criteria() -> IncentiveCriteria {
    IncentiveCriteria {
        criteria_type: CriteriaType::EventLog as u8,
        signature: B256::ZERO,
        field_index: FieldIndex::Flat(GAS_REBATE_SENTINEL),
        target_contract: Address::ZERO,
        value_type: ValueType::Raw as u8,
    }
}

/// Decode the argument of a function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCriteria {
    pub signature: B256,
    pub field_index: FieldIndex,
    pub target_contract: Address,
    pub value_type: ValueType,
}

/// Decode a field of an event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCriteria {
    pub signature: B256,
    pub field_index: FieldIndex,
    pub target_contract: Address,
    pub value_type: ValueType,
}

/// A validated criteria rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criteria {
    FunctionCall(FunctionCriteria),
    EventLog(EventCriteria),
    /// Pay back the gas (and blob gas) the transaction consumed.
    GasRebate,
}

impl Criteria {
    /// Whether extraction reads the transaction receipt (as opposed to the call input).
    pub fn needs_receipt(&self) -> bool {
        !matches!(self, Criteria::FunctionCall(_))
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Criteria::FunctionCall(c) => c.value_type,
            Criteria::EventLog(c) => c.value_type,
            Criteria::GasRebate => ValueType::Raw,
        }
    }
}

impl TryFrom<&IncentiveCriteria> for Criteria {
    type Error = ScalarError;

    fn try_from(raw: &IncentiveCriteria) -> Result<Self, Self::Error> {
        let criteria_type = CriteriaType::try_from(raw.criteria_type)?;
        let value_type = ValueType::try_from(raw.value_type)?;

        Ok(match criteria_type {
            CriteriaType::EventLog if raw.field_index.is_gas_rebate() => Criteria::GasRebate,
            CriteriaType::EventLog => Criteria::EventLog(EventCriteria {
                signature: raw.signature,
                field_index: raw.field_index.clone(),
                target_contract: raw.target_contract,
                value_type,
            }),
            CriteriaType::FunctionCall => Criteria::FunctionCall(FunctionCriteria {
                signature: raw.signature,
                field_index: raw.field_index.clone(),
                target_contract: raw.target_contract,
                value_type,
            }),
        })
    }
}

impl TryFrom<IncentiveCriteria> for Criteria {
    type Error = ScalarError;

    fn try_from(raw: IncentiveCriteria) -> Result<Self, Self::Error> {
        Criteria::try_from(&raw)
    }
}

impl From<&Criteria> for IncentiveCriteria {
    fn from(criteria: &Criteria) -> Self {
        match criteria {
            Criteria::FunctionCall(c) => IncentiveCriteria {
                criteria_type: CriteriaType::FunctionCall as u8,
                signature: c.signature,
                field_index: c.field_index.clone(),
                target_contract: c.target_contract,
                value_type: c.value_type as u8,
            },
            Criteria::EventLog(c) => IncentiveCriteria {
                criteria_type: CriteriaType::EventLog as u8,
                signature: c.signature,
                field_index: c.field_index.clone(),
                target_contract: c.target_contract,
                value_type: c.value_type as u8,
            },
            Criteria::GasRebate => gas_rebate_criteria(),
        }
    }
}

/// Errors produced while extracting a scalar.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ScalarError {
    #[error("no known definition for signature {0}")]
    UnknownSignature(B256),

    #[error("no logs matching event signature {0}")]
    NoMatchingLogs(B256),

    #[error("decoded args error: {0}")]
    DecodedArgsError(String),

    #[error("invalid criteria type: {0}")]
    InvalidCriteriaType(u8),

    #[error("invalid value type: {0}")]
    InvalidValueType(u8),

    #[error("evidence is missing the transaction {0}")]
    MissingEvidence(&'static str),

    #[error("invalid signature definition `{signature}`: {reason}")]
    InvalidDefinition { signature: String, reason: String },
}

pub type ScalarResult<T> = Result<T, ScalarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_rebate_criteria_is_canonical() {
        let criteria = gas_rebate_criteria();
        assert_eq!(criteria.criteria_type, CriteriaType::EventLog as u8);
        assert_eq!(criteria.signature, B256::ZERO);
        assert_eq!(criteria.field_index, FieldIndex::Flat(255));
        assert_eq!(criteria.target_contract, Address::ZERO);
        assert_eq!(Criteria::try_from(&criteria).unwrap(), Criteria::GasRebate);
    }

    #[test]
    fn invalid_criteria_tag_rejected() {
        let mut criteria = IncentiveCriteria::event_log(B256::ZERO, 0, Address::ZERO);
        criteria.criteria_type = 7;
        assert_eq!(
            Criteria::try_from(&criteria),
            Err(ScalarError::InvalidCriteriaType(7))
        );
    }

    #[test]
    fn invalid_value_type_rejected() {
        let mut criteria = IncentiveCriteria::function_call(B256::ZERO, 0, Address::ZERO);
        criteria.value_type = 9;
        assert_eq!(
            Criteria::try_from(&criteria),
            Err(ScalarError::InvalidValueType(9))
        );
    }

    #[test]
    fn sentinel_on_function_call_is_not_gas_rebate() {
        let criteria = IncentiveCriteria::function_call(B256::ZERO, 255, Address::ZERO);
        assert!(matches!(
            Criteria::try_from(&criteria),
            Ok(Criteria::FunctionCall(_))
        ));
    }

    #[test]
    fn single_element_path_collapses_to_flat() {
        assert_eq!(FieldIndex::from(vec![3]), FieldIndex::Flat(3));
        assert_eq!(FieldIndex::from(vec![1, 2]), FieldIndex::Path(vec![1, 2]));
        assert_eq!(FieldIndex::Path(vec![1, 2]).segments(), &[1, 2]);
        assert_eq!(FieldIndex::Flat(4).segments(), &[4]);
    }

    #[test]
    fn criteria_roundtrips_through_raw_record() {
        let raw = IncentiveCriteria::event_log(B256::repeat_byte(0xab), vec![1, 0], Address::repeat_byte(1))
            .with_value_type(ValueType::Wad);
        let criteria = Criteria::try_from(&raw).unwrap();
        assert_eq!(criteria.value_type(), ValueType::Wad);
        assert_eq!(IncentiveCriteria::from(&criteria), raw);
    }

    #[test]
    fn field_index_deserializes_from_number_or_list() {
        let flat: FieldIndex = serde_json::from_str("2").unwrap();
        assert_eq!(flat, FieldIndex::Flat(2));
        let path: FieldIndex = serde_json::from_str("[0, 3]").unwrap();
        assert_eq!(path, FieldIndex::Path(vec![0, 3]));
    }
}
