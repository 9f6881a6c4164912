//! Canonical EIP-7702 authorization signing digest.

use alloy_primitives::{Address, B256, ChainId, keccak256};
use alloy_rlp::{BufMut, Encodable, Header};

/// Magic byte prefixing the authorization signing message.
pub const AUTHORIZATION_MAGIC: u8 = 0x05;

/// Computes the digest an authority signs to delegate its code execution to
/// `contract_address`: `keccak256(0x05 || rlp([chain_id, contract_address, nonce]))`.
///
/// Integers are RLP-encoded minimally (zero encodes as the empty string),
/// the address as its raw 20 bytes. Verifiers reconstruct this exact byte
/// sequence, so the field order, the list header, and the magic byte are all
/// load-bearing.
pub fn authorization_digest(chain_id: ChainId, contract_address: Address, nonce: u64) -> B256 {
    let payload_length = chain_id.length() + contract_address.length() + nonce.length();

    let mut message = Vec::with_capacity(1 + payload_length + 3);
    message.put_u8(AUTHORIZATION_MAGIC);
    Header {
        list: true,
        payload_length,
    }
    .encode(&mut message);
    chain_id.encode(&mut message);
    contract_address.encode(&mut message);
    nonce.encode(&mut message);

    keccak256(&message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_eips::eip7702::Authorization;
    use alloy_primitives::{U256, address};
    use pretty_assertions::assert_eq;

    const CONTRACT: Address = address!("63c0c19a282a1b52b07dd5a65b58948a07dae32b");
    const SEPOLIA: ChainId = 11155111;

    fn reference_digest(chain_id: ChainId, contract_address: Address, nonce: u64) -> B256 {
        Authorization {
            chain_id: U256::from(chain_id),
            address: contract_address,
            nonce,
        }
        .signature_hash()
    }

    #[test]
    fn digest_is_deterministic() {
        let first = authorization_digest(SEPOLIA, CONTRACT, 0);
        let second = authorization_digest(SEPOLIA, CONTRACT, 0);
        assert_eq!(first, second);
    }

    #[test]
    fn digest_matches_reference_implementation() {
        for (chain_id, nonce) in [(1, 0), (SEPOLIA, 0), (SEPOLIA, 7), (31337, u64::MAX)] {
            assert_eq!(
                authorization_digest(chain_id, CONTRACT, nonce),
                reference_digest(chain_id, CONTRACT, nonce),
                "chain_id={chain_id} nonce={nonce}"
            );
        }
    }

    #[test]
    fn zero_fields_use_minimal_encoding() {
        // chain_id = 0 and nonce = 0 must RLP-encode as empty strings, not 0x00.
        assert_eq!(
            authorization_digest(0, CONTRACT, 0),
            reference_digest(0, CONTRACT, 0)
        );
    }

    #[test]
    fn every_field_changes_the_digest() {
        let base = authorization_digest(SEPOLIA, CONTRACT, 0);

        assert_ne!(base, authorization_digest(1, CONTRACT, 0));
        assert_ne!(
            base,
            authorization_digest(
                SEPOLIA,
                address!("0000000000000000000000000000000000000001"),
                0
            )
        );
        assert_ne!(base, authorization_digest(SEPOLIA, CONTRACT, 1));
    }
}
