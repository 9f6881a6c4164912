//! Error taxonomy for the assembly pipeline.
//!
//! Validation errors are raised before any external call and leave all state
//! untouched. External-call errors keep user cancellation distinguishable
//! from genuine failure so callers can treat the former as informational.
//! Every orchestration step either completes fully or rolls its entry back
//! to the pre-call value.

use alloy_primitives::ChainId;
use thiserror::Error;

/// A packed signature that cannot be decomposed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("packed signature must be 65 bytes, got {0}")]
    InvalidLength(usize),
    #[error("packed signature is not valid hex: {0}")]
    InvalidHex(#[from] alloy_primitives::hex::FromHexError),
    #[error("recovery byte {0:#04x} is neither a yParity bit nor a legacy v value")]
    InvalidRecoveryByte(u8),
    #[error("signature does not recover to a valid public key")]
    RecoveryFailed,
}

/// Failures reported by the external signer capability.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The user cancelled the request or the wallet refused to sign.
    #[error("signer rejected the request: {0}")]
    Rejected(String),
    /// Any other backend failure.
    #[error("signer backend error: {0}")]
    Backend(String),
}

/// Failures while signing an authorization entry.
#[derive(Debug, Error)]
pub enum SignError {
    #[error("authorization has no contract address")]
    MissingContractAddress,
    #[error("authorization has no valid nonce")]
    InvalidNonce,
    /// A second signature request was made while one is still pending for
    /// the same entry.
    #[error("a signature request for this authorization is already in flight")]
    SigningInFlight,
    #[error(transparent)]
    Signer(#[from] SignerError),
}

/// A failed chain-state read.
#[derive(Debug, Error)]
#[error("chain query failed: {0}")]
pub struct ChainQueryError(pub String);

/// Gas and fee derivation failures.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("fee estimation failed: {0}")]
    EstimationFailed(#[from] ChainQueryError),
}

/// Failures reported by the broadcast capability.
#[derive(Debug, Error)]
pub enum BroadcastError {
    /// The user declined the transaction in their wallet.
    #[error("transaction cancelled by user")]
    Cancelled,
    #[error("broadcast failed: {0}")]
    Failed(String),
}

/// Transaction assembly and submission failures.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("invalid calldata: {0}")]
    InvalidCalldata(String),
    #[error("authorization list is empty")]
    EmptyAuthorizationList,
    #[error("authorization #{index} is not signed")]
    UnsignedAuthorization { index: usize },
    #[error("authorization #{index} carries a malformed signature")]
    MalformedAuthorization { index: usize },
    /// An authorization signed for one chain attached to a transaction
    /// targeting another would be a cross-chain replay hazard.
    #[error(
        "authorization #{index} was signed for chain {authorization}, transaction targets chain {transaction}"
    )]
    ChainIdMismatch {
        index: usize,
        authorization: ChainId,
        transaction: ChainId,
    },
    #[error(transparent)]
    Estimation(#[from] EstimateError),
    #[error(transparent)]
    ChainQuery(#[from] ChainQueryError),
    #[error("broadcast failed: {0}")]
    BroadcastFailed(String),
}

/// Session-level failures.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no authorization at index {0}")]
    UnknownEntry(usize),
    #[error(transparent)]
    Sign(#[from] SignError),
}
