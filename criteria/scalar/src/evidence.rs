use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// A log entry from a transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

impl LogEntry {
    /// The event signature topic, if the log is not anonymous.
    pub fn signature(&self) -> Option<&B256> {
        self.topics.first()
    }
}

/// The parts of a receipt the engine reads.
///
/// Field names follow the Ethereum JSON-RPC receipt object so RPC
/// responses deserialize directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub gas_used: U256,
    #[serde(default)]
    pub effective_gas_price: U256,
    #[serde(default)]
    pub blob_gas_used: Option<U256>,
    #[serde(default)]
    pub blob_gas_price: Option<U256>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

impl TransactionReceipt {
    /// Total fee paid: execution gas plus blob gas, missing blob fields count as zero.
    pub fn total_gas_cost(&self) -> U256 {
        let execution = self.gas_used.saturating_mul(self.effective_gas_price);
        let blob = self
            .blob_gas_used
            .unwrap_or_default()
            .saturating_mul(self.blob_gas_price.unwrap_or_default());
        execution.saturating_add(blob)
    }
}

/// The parts of a transaction the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallTransaction {
    pub hash: B256,
    /// `None` for contract creations.
    #[serde(default)]
    pub to: Option<Address>,
    pub input: Bytes,
}

/// Everything fetched for one `(chain id, transaction hash)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub chain_id: u64,
    pub transaction_hash: B256,
    #[serde(default)]
    pub transaction: Option<CallTransaction>,
    #[serde(default)]
    pub receipt: Option<TransactionReceipt>,
}

impl Evidence {
    pub fn new(chain_id: u64, transaction_hash: B256) -> Self {
        Self {
            chain_id,
            transaction_hash,
            transaction: None,
            receipt: None,
        }
    }

    pub fn with_transaction(mut self, transaction: CallTransaction) -> Self {
        self.transaction = Some(transaction);
        self
    }

    pub fn with_receipt(mut self, receipt: TransactionReceipt) -> Self {
        self.receipt = Some(receipt);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(gas_used: u64, price: u64) -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: B256::ZERO,
            gas_used: U256::from(gas_used),
            effective_gas_price: U256::from(price),
            blob_gas_used: None,
            blob_gas_price: None,
            logs: vec![],
        }
    }

    #[test]
    fn gas_cost_without_blobs() {
        assert_eq!(receipt(21_000, 3).total_gas_cost(), U256::from(63_000));
    }

    #[test]
    fn gas_cost_with_blobs() {
        let mut r = receipt(50_000, 2);
        r.blob_gas_used = Some(U256::from(131_072));
        r.blob_gas_price = Some(U256::from(5));
        assert_eq!(r.total_gas_cost(), U256::from(100_000 + 655_360));
    }

    #[test]
    fn gas_cost_with_partial_blob_fields() {
        let mut r = receipt(10, 10);
        r.blob_gas_used = Some(U256::from(1_000));
        assert_eq!(r.total_gas_cost(), U256::from(100));
    }

    #[test]
    fn receipt_deserializes_from_rpc_json() {
        let json = r#"{
            "transactionHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "gasUsed": "0x5208",
            "effectiveGasPrice": "0x3b9aca00",
            "status": "0x1",
            "logs": [{
                "address": "0x2222222222222222222222222222222222222222",
                "topics": ["0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"],
                "data": "0x",
                "logIndex": "0x0"
            }]
        }"#;
        let r: TransactionReceipt = serde_json::from_str(json).unwrap();
        assert_eq!(r.gas_used, U256::from(21_000));
        assert_eq!(r.effective_gas_price, U256::from(1_000_000_000u64));
        assert_eq!(r.blob_gas_used, None);
        assert_eq!(r.logs.len(), 1);
        assert!(r.logs[0].signature().is_some());
    }
}
