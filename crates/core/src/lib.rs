//! Core pipeline for assembling EIP-7702 (set-EOA-code) transactions.
//!
//! The pipeline covers authorization tuples through their signing lifecycle,
//! the canonical signing digest, packing and unpacking of signature
//! components, fee derivation, and assembly of a wire-ready transaction
//! request. Wallets, chain reads, and broadcast transports are injected
//! capabilities ([`signer::AuthoritySigner`], [`chain::ChainReader`],
//! [`chain::Broadcaster`]); the pipeline never holds key material or network
//! handles of its own.

pub mod assembler;
pub mod authorization;
pub mod chain;
pub mod digest;
pub mod error;
pub mod fees;
pub mod nonce;
pub mod session;
pub mod signature;
pub mod signer;
pub mod transaction;

pub use assembler::{SubmitOutcome, TransactionDraft, assemble, assemble_and_submit, submit};
pub use authorization::{AuthorizationEntry, AuthorizationState, SignedAuthorization, sign_entry};
pub use chain::{Broadcaster, CallRequest, ChainReader, FeeSnapshot};
pub use digest::{AUTHORIZATION_MAGIC, authorization_digest};
pub use error::{
    AssembleError, BroadcastError, ChainQueryError, EstimateError, SessionError, SignError,
    SignatureError, SignerError,
};
pub use fees::{FALLBACK_PRIORITY_FEE, FeeParams, FeeSettings, estimate_fees};
pub use nonce::resolve_nonce;
pub use session::DelegationSession;
pub use signature::{RecoveryEncoding, StructuredSignature};
pub use signer::AuthoritySigner;
pub use transaction::{TransactionRequest, parse_address, parse_calldata};
