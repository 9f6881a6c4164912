//! JSON-RPC implementations of the pipeline's chain capabilities.
//!
//! [`RpcClient`] is a thin JSON-RPC 2.0 client over HTTP implementing
//! [`setcode_core::ChainReader`]; [`NodeBroadcaster`] and
//! [`WalletBroadcaster`] implement [`setcode_core::Broadcaster`] for
//! node-held-key and local-key submission respectively.

pub mod broadcast;
pub mod client;
mod convert;
pub mod error;

pub use broadcast::{NodeBroadcaster, WalletBroadcaster};
pub use client::RpcClient;
pub use error::RpcClientError;
