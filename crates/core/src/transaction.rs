//! Wire-ready transaction requests and input-edge parsing.

use crate::{authorization::SignedAuthorization, error::AssembleError};
use alloy_primitives::{Address, Bytes, ChainId, U256, hex};
use serde::Serialize;

/// Type tag of a set-code transaction on the wire.
pub const TRANSACTION_TYPE: &str = "eip7702";

/// A wire-ready EIP-7702 transaction request.
///
/// Assembled on demand immediately before estimation or broadcast; never
/// persisted. The JSON form mirrors what a node expects:
/// `gas`/`maxFeePerGas`/`maxPriorityFeePerGas` quantities plus the
/// decomposed `authorizationList` and `type: "eip7702"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Executing account.
    pub from: Address,
    pub to: Address,
    /// Amount in wei.
    pub value: U256,
    pub data: Bytes,
    /// Transaction nonce, independent from any authorization nonce. Left
    /// for the broadcaster to resolve when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    #[serde(rename = "gas")]
    pub gas_limit: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
    pub chain_id: ChainId,
    pub authorization_list: Vec<SignedAuthorization>,
    #[serde(rename = "type")]
    pub transaction_type: &'static str,
}

/// Parses a 20-byte hex address, 0x-prefixed or bare.
pub fn parse_address(input: &str) -> Result<Address, AssembleError> {
    input
        .trim()
        .parse()
        .map_err(|_| AssembleError::InvalidAddress(input.trim().to_string()))
}

/// Parses hex calldata; empty input (or a bare `0x`) means empty calldata.
pub fn parse_calldata(input: &str) -> Result<Bytes, AssembleError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "0x" {
        return Ok(Bytes::new());
    }
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if digits.len() % 2 != 0 {
        return Err(AssembleError::InvalidCalldata(format!(
            "odd-length hex ({} digits)",
            digits.len()
        )));
    }
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|err| AssembleError::InvalidCalldata(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, address, bytes};
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_addresses_with_and_without_prefix() {
        let expected = address!("63c0c19a282a1b52b07dd5a65b58948a07dae32b");
        assert_eq!(
            parse_address("0x63c0c19a282a1b52b07dd5a65b58948a07dae32b").unwrap(),
            expected
        );
        assert_eq!(
            parse_address("  63c0c19a282a1b52b07dd5a65b58948a07dae32b  ").unwrap(),
            expected
        );
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert_matches!(parse_address("0x1234"), Err(AssembleError::InvalidAddress(_)));
        assert_matches!(
            parse_address("not an address"),
            Err(AssembleError::InvalidAddress(_))
        );
    }

    #[test]
    fn parses_calldata_variants() {
        assert_eq!(parse_calldata("").unwrap(), Bytes::new());
        assert_eq!(parse_calldata("0x").unwrap(), Bytes::new());
        assert_eq!(parse_calldata("0xdeadbeef").unwrap(), bytes!("deadbeef"));
        assert_eq!(parse_calldata("deadbeef").unwrap(), bytes!("deadbeef"));
    }

    #[test]
    fn rejects_odd_length_and_non_hex_calldata() {
        assert_matches!(
            parse_calldata("0xabc"),
            Err(AssembleError::InvalidCalldata(_))
        );
        assert_matches!(
            parse_calldata("0xzz"),
            Err(AssembleError::InvalidCalldata(_))
        );
    }

    #[test]
    fn request_serializes_the_node_facing_shape() {
        let request = TransactionRequest {
            from: address!("1111111111111111111111111111111111111111"),
            to: address!("2222222222222222222222222222222222222222"),
            value: U256::ZERO,
            data: Bytes::new(),
            nonce: None,
            gas_limit: 300_000,
            max_fee_per_gas: 14_000_000_000,
            max_priority_fee_per_gas: 2_000_000_000,
            chain_id: 11155111,
            authorization_list: vec![SignedAuthorization {
                address: address!("63c0c19a282a1b52b07dd5a65b58948a07dae32b"),
                chain_id: 11155111,
                nonce: 0,
                r: B256::repeat_byte(0x11),
                s: B256::repeat_byte(0x22),
                y_parity: 0,
            }],
            transaction_type: TRANSACTION_TYPE,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "eip7702");
        assert_eq!(json["gas"], 300_000);
        assert_eq!(json["chainId"], 11155111);
        assert_eq!(json["maxFeePerGas"], 14_000_000_000u64);
        assert!(json.get("nonce").is_none());
        assert_eq!(json["authorizationList"].as_array().unwrap().len(), 1);
        assert_eq!(json["authorizationList"][0]["yParity"], 0);
    }
}
