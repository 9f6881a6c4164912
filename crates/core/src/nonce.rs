//! Nonce pre-fill for authorization entries.

use crate::chain::ChainReader;
use alloy_primitives::Address;
use tracing::warn;

/// Looks up the current transaction count of `address` to pre-fill an
/// authorization nonce.
///
/// Soft-fails to 0 on a query error: the nonce stays user-editable, so a
/// failed lookup must not block the flow. Not cached; call again whenever
/// the signing address changes.
pub async fn resolve_nonce<R: ChainReader>(reader: &R, address: Address) -> u64 {
    match reader.transaction_count(address).await {
        Ok(nonce) => nonce,
        Err(err) => {
            warn!(%address, error = %err, "nonce lookup failed, defaulting to 0");
            0
        }
    }
}
