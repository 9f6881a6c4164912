//! External chain-read and broadcast capabilities.
//!
//! The pipeline consumes these as injected collaborators; see the rpc-client
//! crate for the JSON-RPC implementations.

use crate::{
    authorization::SignedAuthorization,
    error::{BroadcastError, ChainQueryError},
    transaction::TransactionRequest,
};
use alloy_primitives::{Address, B256, Bytes, ChainId, U256};

/// A gas-estimation call payload. Carries the authorization list because
/// delegated calls are priced differently from plain calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub authorization_list: Vec<SignedAuthorization>,
}

/// Point-in-time fee observations backing fee derivation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeeSnapshot {
    /// Base fee of the latest block, in wei.
    pub base_fee_per_gas: u128,
    /// Recent priority-fee reward samples, in wei. May be empty.
    pub priority_fee_samples: Vec<u128>,
}

/// Chain-state reads the pipeline depends on.
#[allow(async_fn_in_trait)]
pub trait ChainReader {
    /// Chain id of the connected endpoint.
    async fn chain_id(&self) -> Result<ChainId, ChainQueryError>;

    /// Current transaction count of `address`.
    async fn transaction_count(&self, address: Address) -> Result<u64, ChainQueryError>;

    /// Gas estimate for the pending call, authorization list included.
    async fn estimate_gas(&self, call: &CallRequest) -> Result<u64, ChainQueryError>;

    /// Recent base fee and priority-fee reward samples.
    async fn fee_history(&self) -> Result<FeeSnapshot, ChainQueryError>;
}

/// Capability to hand a wire-ready transaction to the network.
#[allow(async_fn_in_trait)]
pub trait Broadcaster {
    /// Submits the transaction, returning its hash (or batch identifier).
    async fn send_transaction(&self, request: &TransactionRequest) -> Result<B256, BroadcastError>;
}
