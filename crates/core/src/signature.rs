//! Packing and unpacking of ECDSA signature components.

use crate::error::SignatureError;
use alloy_primitives::{Address, B256, Signature, U256, hex};

/// Named encodings for the trailing recovery byte of a packed signature.
///
/// EIP-7702's wire format carries the yParity bit (0/1); legacy ECDSA
/// recovery carries v (27/28). The two differ only in that trailing byte and
/// mixing them corrupts a signature silently, so callers pick the convention
/// by name rather than by guessing from magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryEncoding {
    /// Trailing byte is the raw parity bit, 0 or 1.
    YParity,
    /// Trailing byte is 27 + parity.
    LegacyV,
}

/// Decomposed ECDSA signature, the form an EIP-7702 authorization list
/// entry carries on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredSignature {
    pub r: B256,
    pub s: B256,
    pub y_parity: bool,
}

impl StructuredSignature {
    /// Packs into a 0x-prefixed 65-byte hex string `r || s || recovery`,
    /// with the trailing byte rendered in the requested convention.
    pub fn pack(&self, encoding: RecoveryEncoding) -> String {
        let recovery = match encoding {
            RecoveryEncoding::YParity => self.y_parity as u8,
            RecoveryEncoding::LegacyV => 27 + self.y_parity as u8,
        };
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(self.r.as_slice());
        bytes[32..64].copy_from_slice(self.s.as_slice());
        bytes[64] = recovery;
        hex::encode_prefixed(bytes)
    }

    /// Parses a packed 65-byte hex signature in either convention: a
    /// trailing byte of 27 or 28 is normalized to its parity bit, anything
    /// other than 0, 1, 27, or 28 is rejected.
    pub fn unpack(packed: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(packed)?;
        if bytes.len() != 65 {
            return Err(SignatureError::InvalidLength(bytes.len()));
        }
        let y_parity = match bytes[64] {
            parity @ (0 | 1) => parity == 1,
            v @ (27 | 28) => v == 28,
            other => return Err(SignatureError::InvalidRecoveryByte(other)),
        };
        Ok(Self {
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..64]),
            y_parity,
        })
    }

    /// Recovers the address that produced this signature over `digest`.
    pub fn recover_authority(&self, digest: B256) -> Result<Address, SignatureError> {
        Signature::from(*self)
            .recover_address_from_prehash(&digest)
            .map_err(|_| SignatureError::RecoveryFailed)
    }
}

impl From<Signature> for StructuredSignature {
    fn from(signature: Signature) -> Self {
        Self {
            r: B256::from(signature.r().to_be_bytes::<32>()),
            s: B256::from(signature.s().to_be_bytes::<32>()),
            y_parity: signature.v(),
        }
    }
}

impl From<StructuredSignature> for Signature {
    fn from(signature: StructuredSignature) -> Self {
        Signature::new(
            U256::from_be_bytes(signature.r.0),
            U256::from_be_bytes(signature.s.0),
            signature.y_parity,
        )
    }
}
