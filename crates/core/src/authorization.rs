//! Authorization tuples and their signing lifecycle.

use crate::{
    digest::authorization_digest,
    error::{SignError, SignatureError},
    signature::{RecoveryEncoding, StructuredSignature},
    signer::AuthoritySigner,
};
use alloy_primitives::{Address, B256, ChainId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lifecycle of one authorization tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationState {
    /// No contract address yet.
    Draft,
    /// Contract address and nonce set, unsigned.
    Ready,
    /// A signature request is in flight.
    Signing,
    /// Signature material present.
    Signed,
}

/// Wire form of a signed authorization, the tuple an EIP-7702 transaction's
/// authorization list carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedAuthorization {
    /// Contract whose code the authority delegates to.
    pub address: Address,
    /// Chain the authorization is valid on.
    pub chain_id: ChainId,
    /// Account nonce of the authority at which the authorization applies.
    pub nonce: u64,
    pub r: B256,
    pub s: B256,
    /// 0 or 1.
    pub y_parity: u8,
}

impl SignedAuthorization {
    pub fn structured_signature(&self) -> StructuredSignature {
        StructuredSignature {
            r: self.r,
            s: self.s,
            y_parity: self.y_parity == 1,
        }
    }

    /// Recovers the authority (EOA) that signed this tuple.
    pub fn recover_authority(&self) -> Result<Address, SignatureError> {
        let digest = authorization_digest(self.chain_id, self.address, self.nonce);
        self.structured_signature().recover_authority(digest)
    }
}

/// One authorization under construction.
///
/// Fields move the entry through Draft -> Ready -> Signed. Editing the
/// contract address or nonce of a Signed entry drops the signature and
/// reverts to Ready: the signature only covers the exact
/// (chain id, contract address, nonce) triple it was produced over, so any
/// stale signature would be rejected on chain or, worse, authorize the wrong
/// delegation.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationEntry {
    contract_address: Option<Address>,
    nonce: Option<u64>,
    signer_address: Option<Address>,
    chain_id: Option<ChainId>,
    packed_signature: Option<String>,
    structured_signature: Option<StructuredSignature>,
    signing_in_flight: bool,
}

impl AuthorizationEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstitutes a Signed entry from a previously-produced wire tuple,
    /// e.g. one pasted back in from an earlier session. The signer address
    /// is recovered from the signature when it verifies.
    pub fn from_signed(authorization: SignedAuthorization) -> Result<Self, SignatureError> {
        if authorization.y_parity > 1 {
            return Err(SignatureError::InvalidRecoveryByte(authorization.y_parity));
        }
        let signature = authorization.structured_signature();
        Ok(Self {
            contract_address: Some(authorization.address),
            nonce: Some(authorization.nonce),
            signer_address: authorization.recover_authority().ok(),
            chain_id: Some(authorization.chain_id),
            packed_signature: Some(signature.pack(RecoveryEncoding::LegacyV)),
            structured_signature: Some(signature),
            signing_in_flight: false,
        })
    }

    pub fn state(&self) -> AuthorizationState {
        if self.signing_in_flight {
            AuthorizationState::Signing
        } else if self.structured_signature.is_some() {
            AuthorizationState::Signed
        } else if self.contract_address.is_some() && self.nonce.is_some() {
            AuthorizationState::Ready
        } else {
            AuthorizationState::Draft
        }
    }

    pub fn contract_address(&self) -> Option<Address> {
        self.contract_address
    }

    pub fn nonce(&self) -> Option<u64> {
        self.nonce
    }

    /// Address derived from the signing key, set once signed.
    pub fn signer_address(&self) -> Option<Address> {
        self.signer_address
    }

    /// Packed display form of the signature, legacy-v encoded.
    pub fn packed_signature(&self) -> Option<&str> {
        self.packed_signature.as_deref()
    }

    pub fn structured_signature(&self) -> Option<StructuredSignature> {
        self.structured_signature
    }

    pub fn set_contract_address(&mut self, address: Address) {
        if self.contract_address != Some(address) {
            self.invalidate();
        }
        self.contract_address = Some(address);
    }

    pub fn clear_contract_address(&mut self) {
        self.invalidate();
        self.contract_address = None;
    }

    pub fn set_nonce(&mut self, nonce: u64) {
        if self.nonce != Some(nonce) {
            self.invalidate();
        }
        self.nonce = Some(nonce);
    }

    /// The wire tuple, present only in the Signed state.
    pub fn signed_authorization(&self) -> Option<SignedAuthorization> {
        let signature = self.structured_signature?;
        Some(SignedAuthorization {
            address: self.contract_address?,
            chain_id: self.chain_id?,
            nonce: self.nonce?,
            r: signature.r,
            s: signature.s,
            y_parity: signature.y_parity as u8,
        })
    }

    /// Reverts a Signing entry whose in-flight request was abandoned, e.g.
    /// because the user navigated away; the eventual resolution of the
    /// abandoned request is ignored.
    pub fn abandon_signing(&mut self) {
        self.signing_in_flight = false;
    }

    /// Drops all signature material.
    fn invalidate(&mut self) {
        self.packed_signature = None;
        self.structured_signature = None;
        self.signer_address = None;
        self.chain_id = None;
        self.signing_in_flight = false;
    }
}

/// Signs `entry` for `chain_id` with the given signer capability.
///
/// The entry is mutated only on success; every failure leaves it exactly as
/// it was before the call. Re-signing an unchanged Signed entry is allowed
/// and produces an equivalent (not necessarily byte-identical) signature.
pub async fn sign_entry<S: AuthoritySigner>(
    entry: &mut AuthorizationEntry,
    chain_id: ChainId,
    signer: &S,
) -> Result<SignedAuthorization, SignError> {
    if entry.signing_in_flight {
        return Err(SignError::SigningInFlight);
    }
    let contract_address = entry
        .contract_address
        .ok_or(SignError::MissingContractAddress)?;
    let nonce = entry.nonce.ok_or(SignError::InvalidNonce)?;

    let digest = authorization_digest(chain_id, contract_address, nonce);
    debug!(
        %contract_address,
        nonce,
        chain_id,
        %digest,
        "requesting authorization signature"
    );

    entry.signing_in_flight = true;
    let outcome = signer.sign_digest(digest).await;
    entry.signing_in_flight = false;
    let signature = outcome?;

    let signed = SignedAuthorization {
        address: contract_address,
        chain_id,
        nonce,
        r: signature.r,
        s: signature.s,
        y_parity: signature.y_parity as u8,
    };

    entry.chain_id = Some(chain_id);
    entry.signer_address = Some(signer.address());
    entry.packed_signature = Some(signature.pack(RecoveryEncoding::LegacyV));
    entry.structured_signature = Some(signature);

    Ok(signed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignerError;
    use alloy_primitives::address;
    use alloy_signer_local::PrivateKeySigner;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    const CONTRACT: Address = address!("63c0c19a282a1b52b07dd5a65b58948a07dae32b");
    const SEPOLIA: ChainId = 11155111;

    /// Signer that always refuses, standing in for a user dismissing the
    /// wallet prompt.
    struct RejectingSigner;

    impl AuthoritySigner for RejectingSigner {
        fn address(&self) -> Address {
            Address::ZERO
        }

        async fn sign_digest(&self, _digest: B256) -> Result<StructuredSignature, SignerError> {
            Err(SignerError::Rejected("prompt dismissed".to_string()))
        }
    }

    fn ready_entry() -> AuthorizationEntry {
        let mut entry = AuthorizationEntry::new();
        entry.set_contract_address(CONTRACT);
        entry.set_nonce(0);
        entry
    }

    #[test]
    fn lifecycle_states_follow_the_fields() {
        let mut entry = AuthorizationEntry::new();
        assert_eq!(entry.state(), AuthorizationState::Draft);

        entry.set_contract_address(CONTRACT);
        assert_eq!(entry.state(), AuthorizationState::Draft);

        entry.set_nonce(3);
        assert_eq!(entry.state(), AuthorizationState::Ready);
    }

    #[tokio::test]
    async fn sign_populates_both_signature_forms() {
        let signer = PrivateKeySigner::random();
        let mut entry = ready_entry();

        let signed = sign_entry(&mut entry, SEPOLIA, &signer).await.unwrap();

        assert_eq!(entry.state(), AuthorizationState::Signed);
        assert_eq!(entry.signer_address(), Some(signer.address()));
        assert_eq!(entry.signed_authorization(), Some(signed));
        assert_eq!(signed.address, CONTRACT);
        assert_eq!(signed.chain_id, SEPOLIA);
        assert_eq!(signed.nonce, 0);
        assert!(signed.y_parity <= 1);

        // The packed display form carries legacy v, per the original wire
        // convention for human-facing signature strings.
        let packed = entry.packed_signature().unwrap();
        let unpacked = StructuredSignature::unpack(packed).unwrap();
        assert_eq!(unpacked, entry.structured_signature().unwrap());
    }

    #[tokio::test]
    async fn signed_tuple_recovers_to_the_signer() {
        let signer = PrivateKeySigner::random();
        let mut entry = ready_entry();

        let signed = sign_entry(&mut entry, SEPOLIA, &signer).await.unwrap();
        assert_eq!(signed.recover_authority().unwrap(), signer.address());
    }

    #[tokio::test]
    async fn resigning_an_unchanged_entry_stays_verifiable() {
        let signer = PrivateKeySigner::random();
        let mut entry = ready_entry();

        let first = sign_entry(&mut entry, SEPOLIA, &signer).await.unwrap();
        let second = sign_entry(&mut entry, SEPOLIA, &signer).await.unwrap();

        // ECDSA signatures need not be byte-identical across calls; both
        // must verify against the same authority.
        assert_eq!(first.recover_authority().unwrap(), signer.address());
        assert_eq!(second.recover_authority().unwrap(), signer.address());
    }

    #[tokio::test]
    async fn sign_requires_a_contract_address() {
        let signer = PrivateKeySigner::random();
        let mut entry = AuthorizationEntry::new();
        entry.set_nonce(0);

        let err = sign_entry(&mut entry, SEPOLIA, &signer).await.unwrap_err();
        assert_matches!(err, SignError::MissingContractAddress);
        assert_eq!(entry.state(), AuthorizationState::Draft);
    }

    #[tokio::test]
    async fn sign_requires_a_nonce() {
        let signer = PrivateKeySigner::random();
        let mut entry = AuthorizationEntry::new();
        entry.set_contract_address(CONTRACT);

        let err = sign_entry(&mut entry, SEPOLIA, &signer).await.unwrap_err();
        assert_matches!(err, SignError::InvalidNonce);
    }

    #[tokio::test]
    async fn rejection_leaves_the_entry_untouched() {
        let mut entry = ready_entry();
        let before = entry.clone();

        let err = sign_entry(&mut entry, SEPOLIA, &RejectingSigner)
            .await
            .unwrap_err();

        assert_matches!(err, SignError::Signer(SignerError::Rejected(_)));
        assert_eq!(entry.state(), before.state());
        assert_eq!(entry.contract_address(), before.contract_address());
        assert_eq!(entry.nonce(), before.nonce());
        assert!(entry.structured_signature().is_none());
    }

    #[tokio::test]
    async fn changing_the_contract_address_invalidates_the_signature() {
        let signer = PrivateKeySigner::random();
        let mut entry = ready_entry();
        sign_entry(&mut entry, SEPOLIA, &signer).await.unwrap();

        entry.set_contract_address(address!("0000000000000000000000000000000000000001"));

        assert_eq!(entry.state(), AuthorizationState::Ready);
        assert!(entry.packed_signature().is_none());
        assert!(entry.structured_signature().is_none());
        assert!(entry.signed_authorization().is_none());
    }

    #[tokio::test]
    async fn changing_the_nonce_invalidates_the_signature() {
        let signer = PrivateKeySigner::random();
        let mut entry = ready_entry();
        sign_entry(&mut entry, SEPOLIA, &signer).await.unwrap();

        entry.set_nonce(1);

        assert_eq!(entry.state(), AuthorizationState::Ready);
        assert!(entry.signed_authorization().is_none());
    }

    #[tokio::test]
    async fn rewriting_the_same_values_keeps_the_signature() {
        let signer = PrivateKeySigner::random();
        let mut entry = ready_entry();
        sign_entry(&mut entry, SEPOLIA, &signer).await.unwrap();

        entry.set_contract_address(CONTRACT);
        entry.set_nonce(0);

        assert_eq!(entry.state(), AuthorizationState::Signed);
    }

    #[tokio::test]
    async fn a_second_sign_while_in_flight_is_rejected() {
        let signer = PrivateKeySigner::random();
        let mut entry = ready_entry();

        // Simulate an abandoned in-flight request: the transient state acts
        // as the per-entry lock.
        entry.signing_in_flight = true;
        let err = sign_entry(&mut entry, SEPOLIA, &signer).await.unwrap_err();
        assert_matches!(err, SignError::SigningInFlight);

        entry.abandon_signing();
        sign_entry(&mut entry, SEPOLIA, &signer).await.unwrap();
        assert_eq!(entry.state(), AuthorizationState::Signed);
    }

    #[tokio::test]
    async fn from_signed_reconstitutes_a_signed_entry() {
        let signer = PrivateKeySigner::random();
        let mut entry = ready_entry();
        let signed = sign_entry(&mut entry, SEPOLIA, &signer).await.unwrap();

        let restored = AuthorizationEntry::from_signed(signed).unwrap();

        assert_eq!(restored.state(), AuthorizationState::Signed);
        assert_eq!(restored.signed_authorization(), Some(signed));
        assert_eq!(restored.signer_address(), Some(signer.address()));

        let garbage = SignedAuthorization { y_parity: 2, ..signed };
        assert_matches!(
            AuthorizationEntry::from_signed(garbage),
            Err(SignatureError::InvalidRecoveryByte(2))
        );
    }

    #[test]
    fn wire_tuple_serializes_camel_case() {
        let tuple = SignedAuthorization {
            address: CONTRACT,
            chain_id: SEPOLIA,
            nonce: 0,
            r: B256::repeat_byte(0x11),
            s: B256::repeat_byte(0x22),
            y_parity: 1,
        };

        let json = serde_json::to_value(&tuple).unwrap();
        assert!(
            json["address"]
                .as_str()
                .unwrap()
                .eq_ignore_ascii_case("0x63c0c19a282a1b52b07dd5a65b58948a07dae32b")
        );
        assert_eq!(json["chainId"], 11155111);
        assert_eq!(json["nonce"], 0);
        assert_eq!(json["yParity"], 1);
        assert!(json["r"].as_str().unwrap().starts_with("0x1111"));

        let back: SignedAuthorization = serde_json::from_value(json).unwrap();
        assert_eq!(back, tuple);
    }
}
