//! Transaction assembly, validation, and submission.

use crate::{
    authorization::{AuthorizationEntry, AuthorizationState, SignedAuthorization},
    chain::{Broadcaster, CallRequest, ChainReader},
    error::{AssembleError, BroadcastError},
    fees::{self, FeeParams},
    transaction::{TRANSACTION_TYPE, TransactionRequest},
};
use alloy_primitives::{Address, B256, Bytes, U256};
use tracing::{debug, info};

/// Caller-supplied transaction fields before validation and fee fill.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    /// Executing account.
    pub from: Address,
    pub to: Address,
    /// Amount in wei.
    pub value: U256,
    pub data: Bytes,
    /// Transaction nonce override; resolved by the broadcaster when unset.
    pub nonce: Option<u64>,
}

/// Outcome of handing a request to the broadcaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted by the network; carries the transaction hash (or batch id).
    Sent(B256),
    /// The user declined in their wallet. Recoverable, not an error.
    Cancelled,
}

/// Validates the draft against its authorizations and produces a wire-ready
/// request with every fee field resolved. Nothing is broadcast here, and no
/// validation failure ever reaches the network.
pub async fn assemble<R: ChainReader>(
    reader: &R,
    draft: TransactionDraft,
    entries: &[AuthorizationEntry],
    fee_params: FeeParams,
) -> Result<TransactionRequest, AssembleError> {
    let authorization_list = collect_signed(entries)?;

    let chain_id = reader.chain_id().await?;
    for (index, authorization) in authorization_list.iter().enumerate() {
        if authorization.chain_id != chain_id {
            return Err(AssembleError::ChainIdMismatch {
                index,
                authorization: authorization.chain_id,
                transaction: chain_id,
            });
        }
    }

    let call = CallRequest {
        from: draft.from,
        to: draft.to,
        value: draft.value,
        data: draft.data.clone(),
        authorization_list: authorization_list.clone(),
    };
    let fees = fees::estimate_fees(reader, &call, &fee_params).await?;

    debug!(
        to = %draft.to,
        authorizations = authorization_list.len(),
        chain_id,
        gas = fees.gas_limit,
        "assembled transaction request"
    );

    Ok(TransactionRequest {
        from: draft.from,
        to: draft.to,
        value: draft.value,
        data: draft.data,
        nonce: draft.nonce,
        gas_limit: fees.gas_limit,
        max_fee_per_gas: fees.max_fee_per_gas,
        max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
        chain_id,
        authorization_list,
        transaction_type: TRANSACTION_TYPE,
    })
}

/// Hands a completed request to the broadcaster, classifying the outcome:
/// user cancellation is recoverable and reported as a non-error.
pub async fn submit<B: Broadcaster>(
    broadcaster: &B,
    request: &TransactionRequest,
) -> Result<SubmitOutcome, AssembleError> {
    match broadcaster.send_transaction(request).await {
        Ok(hash) => {
            info!(%hash, "transaction sent");
            Ok(SubmitOutcome::Sent(hash))
        }
        Err(BroadcastError::Cancelled) => {
            info!("transaction cancelled by user");
            Ok(SubmitOutcome::Cancelled)
        }
        Err(BroadcastError::Failed(reason)) => Err(AssembleError::BroadcastFailed(reason)),
    }
}

/// Assembles and immediately submits.
pub async fn assemble_and_submit<R, B>(
    reader: &R,
    broadcaster: &B,
    draft: TransactionDraft,
    entries: &[AuthorizationEntry],
    fee_params: FeeParams,
) -> Result<SubmitOutcome, AssembleError>
where
    R: ChainReader,
    B: Broadcaster,
{
    let request = assemble(reader, draft, entries, fee_params).await?;
    submit(broadcaster, &request).await
}

fn collect_signed(entries: &[AuthorizationEntry]) -> Result<Vec<SignedAuthorization>, AssembleError> {
    if entries.is_empty() {
        return Err(AssembleError::EmptyAuthorizationList);
    }
    let mut list = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if entry.state() != AuthorizationState::Signed {
            return Err(AssembleError::UnsignedAuthorization { index });
        }
        let authorization = entry
            .signed_authorization()
            .ok_or(AssembleError::UnsignedAuthorization { index })?;
        if authorization.r.is_zero() || authorization.s.is_zero() || authorization.y_parity > 1 {
            return Err(AssembleError::MalformedAuthorization { index });
        }
        list.push(authorization);
    }
    Ok(list)
}
