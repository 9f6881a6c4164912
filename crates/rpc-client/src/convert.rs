//! Mappings from the core's domain types to alloy's wire types.

use alloy_eips::eip7702::{Authorization, SignedAuthorization as AlloySignedAuthorization};
use alloy_primitives::{TxKind, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest as RpcTransactionRequest};
use setcode_core::{CallRequest, SignedAuthorization, TransactionRequest};

/// EIP-7702 transaction type byte.
const EIP7702_TX_TYPE: u8 = 0x04;

pub(crate) fn to_alloy_authorization(authorization: &SignedAuthorization) -> AlloySignedAuthorization {
    AlloySignedAuthorization::new_unchecked(
        Authorization {
            chain_id: U256::from(authorization.chain_id),
            address: authorization.address,
            nonce: authorization.nonce,
        },
        authorization.y_parity,
        U256::from_be_bytes(authorization.r.0),
        U256::from_be_bytes(authorization.s.0),
    )
}

pub(crate) fn to_alloy_authorizations(
    authorizations: &[SignedAuthorization],
) -> Vec<AlloySignedAuthorization> {
    authorizations.iter().map(to_alloy_authorization).collect()
}

/// Estimation payload for `eth_estimateGas`, authorization list included.
pub(crate) fn call_to_rpc_request(call: &CallRequest) -> RpcTransactionRequest {
    RpcTransactionRequest {
        from: Some(call.from),
        to: Some(TxKind::Call(call.to)),
        value: Some(call.value),
        input: TransactionInput::new(call.data.clone()),
        authorization_list: Some(to_alloy_authorizations(&call.authorization_list)),
        ..Default::default()
    }
}

/// Full request for `eth_sendTransaction`.
pub(crate) fn to_rpc_request(request: &TransactionRequest) -> RpcTransactionRequest {
    RpcTransactionRequest {
        from: Some(request.from),
        to: Some(TxKind::Call(request.to)),
        value: Some(request.value),
        input: TransactionInput::new(request.data.clone()),
        nonce: request.nonce,
        gas: Some(request.gas_limit),
        max_fee_per_gas: Some(request.max_fee_per_gas),
        max_priority_fee_per_gas: Some(request.max_priority_fee_per_gas),
        chain_id: Some(request.chain_id),
        authorization_list: Some(to_alloy_authorizations(&request.authorization_list)),
        transaction_type: Some(EIP7702_TX_TYPE),
        ..Default::default()
    }
}
