//! Broadcast capabilities over the JSON-RPC client.

use crate::{client::RpcClient, convert, error::RpcClientError};
use alloy_consensus::{SignableTransaction, TxEip7702};
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::B256;
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use setcode_core::{BroadcastError, Broadcaster, ChainReader, TransactionRequest};
use tracing::debug;

/// Phrases wallet-backed nodes answer with when the user declines; mapped to
/// a recoverable cancellation instead of an error.
const CANCEL_MARKERS: [&str; 2] = ["user denied", "user rejected"];

fn classify(err: RpcClientError) -> BroadcastError {
    let message = err.to_string();
    if CANCEL_MARKERS
        .iter()
        .any(|marker| message.to_lowercase().contains(marker))
    {
        BroadcastError::Cancelled
    } else {
        BroadcastError::Failed(message)
    }
}

/// Sends via `eth_sendTransaction`, leaving signing to the node or wallet
/// holding the executing key.
#[derive(Debug)]
pub struct NodeBroadcaster {
    client: RpcClient,
}

impl NodeBroadcaster {
    pub fn new(client: RpcClient) -> Self {
        Self { client }
    }
}

impl Broadcaster for NodeBroadcaster {
    async fn send_transaction(&self, request: &TransactionRequest) -> Result<B256, BroadcastError> {
        let rpc_request = convert::to_rpc_request(request);
        self.client
            .send_transaction(&rpc_request)
            .await
            .map_err(classify)
    }
}

/// Signs a complete EIP-7702 envelope with a local key and submits it raw.
///
/// The broadcast key may differ from every authorization signer, which is
/// what allows a separate relayer/executor account to carry the
/// transaction. A missing transaction nonce is resolved from the executor's
/// pending transaction count; the authorization nonces are untouched.
#[derive(Debug)]
pub struct WalletBroadcaster {
    client: RpcClient,
    signer: PrivateKeySigner,
}

impl WalletBroadcaster {
    pub fn new(client: RpcClient, signer: PrivateKeySigner) -> Self {
        Self { client, signer }
    }

    async fn resolve_nonce(&self, request: &TransactionRequest) -> Result<u64, BroadcastError> {
        match request.nonce {
            Some(nonce) => Ok(nonce),
            None => self
                .client
                .transaction_count(self.signer.address())
                .await
                .map_err(|err| BroadcastError::Failed(err.to_string())),
        }
    }
}

impl Broadcaster for WalletBroadcaster {
    async fn send_transaction(&self, request: &TransactionRequest) -> Result<B256, BroadcastError> {
        let nonce = self.resolve_nonce(request).await?;

        let tx = TxEip7702 {
            chain_id: request.chain_id,
            nonce,
            gas_limit: request.gas_limit,
            max_fee_per_gas: request.max_fee_per_gas,
            max_priority_fee_per_gas: request.max_priority_fee_per_gas,
            to: request.to,
            value: request.value,
            access_list: Default::default(),
            authorization_list: convert::to_alloy_authorizations(&request.authorization_list),
            input: request.data.clone(),
        };

        let signature = self
            .signer
            .sign_hash_sync(&tx.signature_hash())
            .map_err(|err| BroadcastError::Failed(err.to_string()))?;
        let raw = tx.into_signed(signature).encoded_2718();

        debug!(nonce, bytes = raw.len(), "submitting raw eip-7702 transaction");
        self.client.send_raw_transaction(&raw).await.map_err(classify)
    }
}
