//! JSON-RPC 2.0 plumbing and the chain-reader implementation.

use crate::{convert, error::RpcClientError};
use alloy_primitives::{Address, B256, ChainId, U64, hex};
use alloy_rpc_types::{FeeHistory, TransactionRequest as RpcTransactionRequest};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use setcode_core::{CallRequest, ChainQueryError, ChainReader, FeeSnapshot};
use url::Url;

/// Reward percentile sampled for priority-fee derivation.
const REWARD_PERCENTILE: f64 = 50.0;

/// A JSON-RPC 2.0 client for a public Ethereum endpoint.
///
/// ``` no_run
/// use setcode_rpc_client::RpcClient;
/// use setcode_core::ChainReader;
///
/// #[tokio::main]
/// async fn main() {
///     let client = RpcClient::new("https://ethereum-sepolia-rpc.publicnode.com").unwrap();
///     let chain_id = client.chain_id().await.unwrap();
///     assert_eq!(chain_id, 11155111);
/// }
/// ```
#[derive(Debug)]
pub struct RpcClient {
    client: Client,
    endpoint: Url,
    request_id: std::sync::atomic::AtomicU64,
}

/// JSON-RPC request structure
#[derive(Debug, Serialize)]
struct JsonRpcRequest<T> {
    jsonrpc: String,
    method: String,
    params: T,
    id: u64,
}

/// JSON-RPC response structure
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    jsonrpc: String,
    result: Option<T>,
    error: Option<JsonRpcError>,
    id: u64,
}

/// JSON-RPC error structure
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

impl RpcClient {
    /// Create a new client for the given endpoint.
    pub fn new(endpoint: &str) -> Result<Self, RpcClientError> {
        let endpoint = Url::parse(endpoint)?;
        let client = Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            endpoint,
            request_id: std::sync::atomic::AtomicU64::new(1),
        })
    }

    /// Get next request ID
    fn next_request_id(&self) -> u64 {
        self.request_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }

    /// Make a JSON-RPC request
    async fn request<P, R>(&self, method: &str, params: P) -> Result<R, RpcClientError>
    where
        P: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        let request_id = self.next_request_id();
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: request_id,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RpcClientError::InvalidResponse(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let response_body: JsonRpcResponse<R> = response.json().await?;

        // Validate JSON-RPC 2.0 compliance
        if response_body.jsonrpc != "2.0" {
            return Err(RpcClientError::InvalidResponse(format!(
                "Invalid JSON-RPC version: expected '2.0', got '{}'",
                response_body.jsonrpc
            )));
        }

        if response_body.id != request_id {
            return Err(RpcClientError::InvalidResponse(format!(
                "Request/response ID mismatch: expected {}, got {}",
                request_id, response_body.id
            )));
        }

        if let Some(error) = response_body.error {
            return Err(RpcClientError::JsonRpcError {
                code: error.code,
                message: error.message,
            });
        }

        response_body.result.ok_or_else(|| {
            RpcClientError::InvalidResponse("Missing result in successful response".to_string())
        })
    }

    /// Submit a complete transaction object via `eth_sendTransaction`,
    /// leaving signing to whoever holds the executing key.
    pub async fn send_transaction(
        &self,
        request: &RpcTransactionRequest,
    ) -> Result<B256, RpcClientError> {
        self.request("eth_sendTransaction", json!([request])).await
    }

    /// Submit a signed, EIP-2718-encoded transaction via
    /// `eth_sendRawTransaction`.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, RpcClientError> {
        self.request("eth_sendRawTransaction", json!([hex::encode_prefixed(raw)]))
            .await
    }
}

impl ChainReader for RpcClient {
    async fn chain_id(&self) -> Result<ChainId, ChainQueryError> {
        let id: U64 = self
            .request("eth_chainId", json!([]))
            .await
            .map_err(into_query_error)?;
        Ok(id.to::<u64>())
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, ChainQueryError> {
        let count: U64 = self
            .request("eth_getTransactionCount", json!([address, "pending"]))
            .await
            .map_err(into_query_error)?;
        Ok(count.to::<u64>())
    }

    async fn estimate_gas(&self, call: &CallRequest) -> Result<u64, ChainQueryError> {
        let request = convert::call_to_rpc_request(call);
        let gas: U64 = self
            .request("eth_estimateGas", json!([request]))
            .await
            .map_err(into_query_error)?;
        Ok(gas.to::<u64>())
    }

    async fn fee_history(&self) -> Result<FeeSnapshot, ChainQueryError> {
        let history: FeeHistory = self
            .request(
                "eth_feeHistory",
                json!([U64::from(1), "latest", [REWARD_PERCENTILE]]),
            )
            .await
            .map_err(into_query_error)?;

        Ok(FeeSnapshot {
            // With one requested block the array is [latest, next]; fee
            // derivation prices against the latest block's base fee.
            base_fee_per_gas: history.base_fee_per_gas.first().copied().unwrap_or_default(),
            priority_fee_samples: history
                .reward
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .collect(),
        })
    }
}

fn into_query_error(err: RpcClientError) -> ChainQueryError {
    ChainQueryError(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, U256, address};
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use setcode_core::SignedAuthorization;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, method},
    };

    async fn mock_result(body: serde_json::Value) -> (MockServer, RpcClient) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": body,
            })))
            .mount(&server)
            .await;
        let client = RpcClient::new(&server.uri()).unwrap();
        (server, client)
    }

    #[tokio::test]
    async fn reads_the_chain_id() {
        let (_server, client) = mock_result(json!("0xaa36a7")).await;
        assert_eq!(client.chain_id().await.unwrap(), 11155111);
    }

    #[tokio::test]
    async fn reads_the_transaction_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "eth_getTransactionCount",
                "params": ["0x1111111111111111111111111111111111111111", "pending"],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": "0x5",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RpcClient::new(&server.uri()).unwrap();
        let count = client
            .transaction_count(address!("1111111111111111111111111111111111111111"))
            .await
            .unwrap();

        assert_eq!(count, 5);
        server.verify().await;
    }

    #[tokio::test]
    async fn estimate_gas_sends_the_authorization_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "eth_estimateGas",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": "0x186a0",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RpcClient::new(&server.uri()).unwrap();
        let call = CallRequest {
            from: address!("1111111111111111111111111111111111111111"),
            to: address!("2222222222222222222222222222222222222222"),
            value: U256::ZERO,
            data: Bytes::new(),
            authorization_list: vec![SignedAuthorization {
                address: address!("63c0c19a282a1b52b07dd5a65b58948a07dae32b"),
                chain_id: 11155111,
                nonce: 0,
                r: alloy_primitives::B256::repeat_byte(0x11),
                s: alloy_primitives::B256::repeat_byte(0x22),
                y_parity: 0,
            }],
        };

        assert_eq!(client.estimate_gas(&call).await.unwrap(), 100_000);
        server.verify().await;
    }

    #[tokio::test]
    async fn fee_history_maps_into_a_snapshot() {
        let (_server, client) = mock_result(json!({
            "oldestBlock": "0x1",
            "baseFeePerGas": ["0x2540be400", "0x2540be400"],
            "gasUsedRatio": [0.5],
            "reward": [["0x77359400"]],
        }))
        .await;

        let snapshot = client.fee_history().await.unwrap();

        assert_eq!(snapshot.base_fee_per_gas, 10_000_000_000);
        assert_eq!(snapshot.priority_fee_samples, vec![2_000_000_000]);
    }

    #[tokio::test]
    async fn json_rpc_errors_carry_code_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32000, "message": "insufficient funds" },
            })))
            .mount(&server)
            .await;

        let client = RpcClient::new(&server.uri()).unwrap();
        let err = client.chain_id().await.unwrap_err();

        assert!(err.to_string().contains("-32000"));
        assert!(err.to_string().contains("insufficient funds"));
    }

    #[tokio::test]
    async fn rejects_a_wrong_json_rpc_version() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "1.0",
                "id": 1,
                "result": "0x1",
            })))
            .mount(&server)
            .await;

        let client = RpcClient::new(&server.uri()).unwrap();
        let raw: Result<U64, _> = client.request("eth_chainId", json!([])).await;

        assert_matches!(
            raw,
            Err(RpcClientError::InvalidResponse(msg)) if msg.contains("Invalid JSON-RPC version")
        );
    }

    #[tokio::test]
    async fn rejects_a_mismatched_response_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 999,
                "result": "0x1",
            })))
            .mount(&server)
            .await;

        let client = RpcClient::new(&server.uri()).unwrap();
        let raw: Result<U64, _> = client.request("eth_chainId", json!([])).await;

        assert_matches!(
            raw,
            Err(RpcClientError::InvalidResponse(msg)) if msg.contains("ID mismatch")
        );
    }
}
