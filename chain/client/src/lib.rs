//! Fetching transaction evidence over Ethereum JSON-RPC.

pub mod client;
pub mod fetch;
pub mod types;

pub use client::{ChainClient, MemoryChainClient, RpcChainClient};
pub use fetch::{fetch_evidence, resolve_scalar, verify_chain_id};
pub use types::*;
