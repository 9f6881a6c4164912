//! Gas and fee derivation.

use crate::{
    chain::{CallRequest, ChainReader},
    error::EstimateError,
};
use tracing::debug;

/// Caller-supplied fee overrides. Whatever is set passes through untouched;
/// only the missing pieces are derived from chain state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeParams {
    pub gas_limit: Option<u64>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
}

/// Fully-derived gas parameters for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSettings {
    pub gas_limit: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// Priority fee applied when the chain reports no reward samples: 1.5 gwei.
pub const FALLBACK_PRIORITY_FEE: u128 = 1_500_000_000;

/// Derives gas parameters for the pending call.
///
/// A missing gas limit is estimated against the node (authorization list
/// included) with a 20% margin to tolerate state drift between estimation
/// and inclusion. A missing priority fee comes from the most recent reward
/// sample, or [`FALLBACK_PRIORITY_FEE`] without one. A missing max fee is
/// `base_fee * 1.2 + priority`. The two chain reads are independent and run
/// concurrently; both complete before anything is returned.
pub async fn estimate_fees<R: ChainReader>(
    reader: &R,
    call: &CallRequest,
    params: &FeeParams,
) -> Result<FeeSettings, EstimateError> {
    let gas = async {
        match params.gas_limit {
            Some(explicit) => Ok(explicit),
            None => reader
                .estimate_gas(call)
                .await
                .map(|estimated| estimated.saturating_mul(12) / 10),
        }
    };
    let fee = async {
        match (params.max_fee_per_gas, params.max_priority_fee_per_gas) {
            (Some(max_fee), Some(priority)) => Ok((max_fee, priority)),
            (max_fee, priority) => {
                let snapshot = reader.fee_history().await?;
                let priority = priority.unwrap_or_else(|| {
                    snapshot
                        .priority_fee_samples
                        .first()
                        .copied()
                        .unwrap_or(FALLBACK_PRIORITY_FEE)
                });
                let max_fee = max_fee.unwrap_or_else(|| {
                    snapshot.base_fee_per_gas.saturating_mul(12) / 10 + priority
                });
                Ok((max_fee, priority))
            }
        }
    };

    let (gas_limit, (max_fee_per_gas, max_priority_fee_per_gas)) =
        tokio::try_join!(gas, fee).map_err(EstimateError::EstimationFailed)?;

    debug!(
        gas_limit,
        max_fee_per_gas, max_priority_fee_per_gas, "derived fee settings"
    );

    Ok(FeeSettings {
        gas_limit,
        max_fee_per_gas,
        max_priority_fee_per_gas,
    })
}
