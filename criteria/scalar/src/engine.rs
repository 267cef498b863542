use alloy_primitives::U256;
use tracing::debug;

use crate::decode::{coerce_scalar, decode_call_args, decode_event_args, extract_field};
use crate::evidence::{CallTransaction, Evidence, TransactionReceipt};
use crate::registry::SignatureRegistry;
use crate::types::*;

impl FunctionCriteria {
    /// Decode the call input and return the argument at the configured index.
    pub fn extract<R>(&self, tx: &CallTransaction, registry: &R) -> ScalarResult<U256>
    where
        R: SignatureRegistry + ?Sized,
    {
        let function = registry.function(&self.signature)?;

        if tx.to != Some(self.target_contract) {
            debug!(
                tx_hash = %tx.hash,
                target = %self.target_contract,
                to = ?tx.to,
                "call target differs from criteria target"
            );
        }

        let args = decode_call_args(function, &tx.input)?;
        coerce_scalar(extract_field(&args, &self.field_index)?)
    }
}

impl EventCriteria {
    /// Decode the first log matching the signature and return the field at
    /// the configured index.
    pub fn extract<R>(&self, receipt: &TransactionReceipt, registry: &R) -> ScalarResult<U256>
    where
        R: SignatureRegistry + ?Sized,
    {
        if receipt.logs.is_empty() {
            return Err(ScalarError::NoMatchingLogs(self.signature));
        }

        let event = registry.event(&self.signature)?;

        let log = receipt
            .logs
            .iter()
            .find(|log| log.signature() == Some(&self.signature))
            .ok_or(ScalarError::NoMatchingLogs(self.signature))?;

        if log.address != self.target_contract {
            debug!(
                tx_hash = %receipt.transaction_hash,
                target = %self.target_contract,
                emitter = %log.address,
                "log emitter differs from criteria target"
            );
        }

        let args = decode_event_args(event, log)?;
        coerce_scalar(extract_field(&args, &self.field_index)?)
    }
}

impl Criteria {
    /// Derive the scalar for this rule from the evidence.
    pub fn scalar<R>(&self, evidence: &Evidence, registry: &R) -> ScalarResult<U256>
    where
        R: SignatureRegistry + ?Sized,
    {
        let scalar = match self {
            Criteria::GasRebate => receipt(evidence)?.total_gas_cost(),
            Criteria::EventLog(criteria) => criteria.extract(receipt(evidence)?, registry)?,
            Criteria::FunctionCall(criteria) => {
                let tx = evidence
                    .transaction
                    .as_ref()
                    .ok_or(ScalarError::MissingEvidence("call input"))?;
                criteria.extract(tx, registry)?
            }
        };

        debug!(
            chain_id = evidence.chain_id,
            tx_hash = %evidence.transaction_hash,
            %scalar,
            "scalar extracted"
        );
        Ok(scalar)
    }
}

fn receipt(evidence: &Evidence) -> ScalarResult<&TransactionReceipt> {
    evidence
        .receipt
        .as_ref()
        .ok_or(ScalarError::MissingEvidence("receipt"))
}

/// Compute the incentive scalar for a raw criteria record.
///
/// Pure in its arguments: the registry is the only lookup consulted.
pub fn get_incentive_scalar<R>(
    criteria: &IncentiveCriteria,
    evidence: &Evidence,
    registry: &R,
) -> ScalarResult<U256>
where
    R: SignatureRegistry + ?Sized,
{
    Criteria::try_from(criteria)?.scalar(evidence, registry)
}
