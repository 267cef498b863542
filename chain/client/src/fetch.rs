use std::future::Future;
use std::time::Duration;

use alloy_primitives::{B256, U256};
use boost_scalar::{Criteria, Evidence, IncentiveCriteria, SignatureRegistry};
use tracing::{debug, warn};

use crate::client::ChainClient;
use crate::types::*;

async fn with_timeout<T, F>(method: &'static str, timeout: Duration, fut: F) -> FetchResult<T>
where
    F: Future<Output = FetchResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(method, timeout_ms = timeout.as_millis() as u64, "rpc call timed out");
            Err(FetchError::Timeout {
                method,
                after_ms: timeout.as_millis() as u64,
            })
        }
    }
}

/// Fail unless the node serves `expected`.
pub async fn verify_chain_id<C: ChainClient>(client: &C, expected: u64, timeout: Duration) -> FetchResult<()> {
    let got = with_timeout("eth_chainId", timeout, client.chain_id()).await?;
    if got != expected {
        return Err(FetchError::ChainMismatch { expected, got });
    }
    Ok(())
}

/// Fetch what `criteria` needs to evaluate `hash`: the receipt for event and
/// gas-rebate rules, the transaction for function-call rules.
///
/// Each RPC call gets its own `timeout`.
pub async fn fetch_evidence<C: ChainClient>(
    client: &C,
    chain_id: u64,
    hash: B256,
    criteria: &Criteria,
    timeout: Duration,
) -> FetchResult<Evidence> {
    let mut evidence = Evidence::new(chain_id, hash);

    if criteria.needs_receipt() {
        let receipt = with_timeout("eth_getTransactionReceipt", timeout, client.receipt(hash))
            .await?
            .ok_or(FetchError::NotFound(hash))?;
        evidence = evidence.with_receipt(receipt);
    } else {
        let tx = with_timeout("eth_getTransactionByHash", timeout, client.transaction(hash))
            .await?
            .ok_or(FetchError::NotFound(hash))?;
        evidence = evidence.with_transaction(tx);
    }

    debug!(chain_id, tx_hash = %hash, "evidence fetched");
    Ok(evidence)
}

/// Fetch evidence for `hash` and extract its scalar under `criteria`.
pub async fn resolve_scalar<C, R>(
    client: &C,
    chain_id: u64,
    hash: B256,
    criteria: &IncentiveCriteria,
    registry: &R,
    timeout: Duration,
) -> ChainResult<U256>
where
    C: ChainClient,
    R: SignatureRegistry + ?Sized,
{
    let criteria = Criteria::try_from(criteria)?;
    let evidence = fetch_evidence(client, chain_id, hash, &criteria, timeout).await?;
    Ok(criteria.scalar(&evidence, registry)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryChainClient;
    use alloy_primitives::{keccak256, Address, Bytes};
    use boost_scalar::{
        gas_rebate_criteria, CallTransaction, KnownSignatures, ScalarError, TransactionReceipt,
    };

    const TIMEOUT: Duration = Duration::from_secs(1);

    fn hash() -> B256 {
        B256::repeat_byte(0xab)
    }

    fn receipt() -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: hash(),
            gas_used: U256::from(21_000),
            effective_gas_price: U256::from(2),
            blob_gas_used: Some(U256::from(10)),
            blob_gas_price: Some(U256::from(3)),
            logs: vec![],
        }
    }

    /// Never answers within any reasonable timeout.
    struct SlowClient;

    impl ChainClient for SlowClient {
        async fn chain_id(&self) -> FetchResult<u64> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(1)
        }

        async fn transaction(&self, _hash: B256) -> FetchResult<Option<CallTransaction>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }

        async fn receipt(&self, _hash: B256) -> FetchResult<Option<TransactionReceipt>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_resolve_gas_rebate() {
        let client = MemoryChainClient::new(1);
        client.insert_receipt(receipt());

        let scalar = resolve_scalar(
            &client,
            1,
            hash(),
            &gas_rebate_criteria(),
            &KnownSignatures::new(),
            TIMEOUT,
        )
        .await
        .unwrap();
        assert_eq!(scalar, U256::from(42_030));
    }

    #[tokio::test]
    async fn test_resolve_function_call() {
        let registry = KnownSignatures::from_signatures(["function transfer(address,uint256)"]).unwrap();
        let signature_hash = keccak256("transfer(address,uint256)");
        let selector = &signature_hash[..4];
        let mut input = selector.to_vec();
        input.extend_from_slice(B256::left_padding_from(Address::repeat_byte(7).as_slice()).as_slice());
        input.extend_from_slice(&U256::from(99).to_be_bytes::<32>());

        let client = MemoryChainClient::new(1);
        client.insert_transaction(CallTransaction {
            hash: hash(),
            to: Some(Address::repeat_byte(1)),
            input: Bytes::from(input),
        });

        let criteria = IncentiveCriteria::function_call(
            B256::left_padding_from(selector),
            1u8,
            Address::repeat_byte(1),
        );
        let scalar = resolve_scalar(&client, 1, hash(), &criteria, &registry, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(scalar, U256::from(99));
    }

    #[tokio::test]
    async fn test_missing_transaction_not_found() {
        let client = MemoryChainClient::new(1);
        let err = fetch_evidence(&client, 1, hash(), &Criteria::GasRebate, TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::NotFound(hash()));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_timeout_is_retryable() {
        let err = fetch_evidence(
            &SlowClient,
            1,
            hash(),
            &Criteria::GasRebate,
            Duration::from_millis(20),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            FetchError::Timeout {
                method: "eth_getTransactionReceipt",
                after_ms: 20
            }
        ));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_scalar_failure_not_retryable() {
        let client = MemoryChainClient::new(1);
        client.insert_receipt(receipt());
        let criteria = IncentiveCriteria::event_log(
            keccak256("Transfer(address,address,uint256)"),
            2u8,
            Address::ZERO,
        );

        let err = resolve_scalar(&client, 1, hash(), &criteria, &KnownSignatures::new(), TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Scalar(ScalarError::NoMatchingLogs(_))));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_verify_chain_id() {
        let client = MemoryChainClient::new(8453);
        assert!(verify_chain_id(&client, 8453, TIMEOUT).await.is_ok());
        assert_eq!(
            verify_chain_id(&client, 1, TIMEOUT).await,
            Err(FetchError::ChainMismatch {
                expected: 1,
                got: 8453
            })
        );
        assert!(verify_chain_id(&SlowClient, 1, Duration::from_millis(20))
            .await
            .unwrap_err()
            .is_retryable());
    }
}
