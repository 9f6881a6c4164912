//! Error types for the JSON-RPC client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcClientError {
    #[error("HTTP client error: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("JSON-RPC error code {code}: {message}")]
    JsonRpcError { code: i32, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
