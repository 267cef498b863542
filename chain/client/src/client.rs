use std::collections::HashMap;
use std::future::Future;

use alloy_primitives::{B256, U64};
use boost_scalar::{CallTransaction, TransactionReceipt};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::ClientError;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::*;

/// Read access to a chain's transactions and receipts.
pub trait ChainClient: Send + Sync {
    fn chain_id(&self) -> impl Future<Output = FetchResult<u64>> + Send;

    /// `None` when the node does not know the transaction.
    fn transaction(
        &self,
        hash: B256,
    ) -> impl Future<Output = FetchResult<Option<CallTransaction>>> + Send;

    /// `None` when the transaction is unknown or still pending.
    fn receipt(
        &self,
        hash: B256,
    ) -> impl Future<Output = FetchResult<Option<TransactionReceipt>>> + Send;
}

/// A [`ChainClient`] speaking Ethereum JSON-RPC over HTTP.
#[derive(Debug, Clone)]
pub struct RpcChainClient {
    url: String,
    inner: HttpClient,
}

impl RpcChainClient {
    pub fn new(url: &str) -> FetchResult<Self> {
        let inner = HttpClientBuilder::default()
            .build(url)
            .map_err(map_client_error)?;
        Ok(Self {
            url: url.to_string(),
            inner,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: jsonrpsee::core::params::ArrayParams,
    ) -> FetchResult<T> {
        debug!(url = %self.url, method, "rpc request");
        self.inner
            .request(method, params)
            .await
            .map_err(map_client_error)
    }
}

impl ChainClient for RpcChainClient {
    async fn chain_id(&self) -> FetchResult<u64> {
        let id: U64 = self.call("eth_chainId", rpc_params![]).await?;
        Ok(id.to::<u64>())
    }

    async fn transaction(&self, hash: B256) -> FetchResult<Option<CallTransaction>> {
        self.call("eth_getTransactionByHash", rpc_params![hash]).await
    }

    async fn receipt(&self, hash: B256) -> FetchResult<Option<TransactionReceipt>> {
        self.call("eth_getTransactionReceipt", rpc_params![hash]).await
    }
}

fn map_client_error(err: ClientError) -> FetchError {
    match err {
        ClientError::Transport(e) => FetchError::Transport(e.to_string()),
        ClientError::RestartNeeded(e) => FetchError::Transport(e.to_string()),
        ClientError::RequestTimeout => FetchError::Transport("request timed out".to_string()),
        other => FetchError::Rpc(other.to_string()),
    }
}

/// An in-memory [`ChainClient`] serving fixed evidence.
#[derive(Debug, Default)]
pub struct MemoryChainClient {
    chain_id: u64,
    transactions: RwLock<HashMap<B256, CallTransaction>>,
    receipts: RwLock<HashMap<B256, TransactionReceipt>>,
}

impl MemoryChainClient {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            ..Self::default()
        }
    }

    pub fn insert_transaction(&self, transaction: CallTransaction) {
        self.transactions.write().insert(transaction.hash, transaction);
    }

    pub fn insert_receipt(&self, receipt: TransactionReceipt) {
        self.receipts
            .write()
            .insert(receipt.transaction_hash, receipt);
    }
}

impl ChainClient for MemoryChainClient {
    async fn chain_id(&self) -> FetchResult<u64> {
        Ok(self.chain_id)
    }

    async fn transaction(&self, hash: B256) -> FetchResult<Option<CallTransaction>> {
        Ok(self.transactions.read().get(&hash).cloned())
    }

    async fn receipt(&self, hash: B256) -> FetchResult<Option<TransactionReceipt>> {
        Ok(self.receipts.read().get(&hash).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, U256};

    #[tokio::test]
    async fn test_rpc_client_rejects_bad_url() {
        assert!(RpcChainClient::new("not a url").is_err());
    }

    #[tokio::test]
    async fn test_rpc_client_keeps_url() {
        let client = RpcChainClient::new("http://127.0.0.1:8545").unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:8545");
    }

    #[tokio::test]
    async fn test_memory_client_serves_fixtures() {
        let client = MemoryChainClient::new(10);
        let hash = B256::repeat_byte(1);
        client.insert_transaction(CallTransaction {
            hash,
            to: None,
            input: Bytes::new(),
        });
        client.insert_receipt(TransactionReceipt {
            transaction_hash: hash,
            gas_used: U256::from(1),
            effective_gas_price: U256::from(1),
            blob_gas_used: None,
            blob_gas_price: None,
            logs: vec![],
        });

        assert_eq!(client.chain_id().await, Ok(10));
        assert!(client.transaction(hash).await.unwrap().is_some());
        assert!(client.receipt(hash).await.unwrap().is_some());
        assert!(client.receipt(B256::ZERO).await.unwrap().is_none());
    }

    #[test]
    fn test_rpc_transaction_deserializes() {
        let json = r#"{
            "hash": "0x0101010101010101010101010101010101010101010101010101010101010101",
            "to": "0x2222222222222222222222222222222222222222",
            "input": "0x23b872dd",
            "nonce": "0x1",
            "gas": "0x5208"
        }"#;
        let tx: CallTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.input.to_vec(), vec![0x23, 0xb8, 0x72, 0xdd]);
    }
}
