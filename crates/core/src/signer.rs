//! The external signing capability.

use crate::{error::SignerError, signature::StructuredSignature};
use alloy_primitives::{Address, B256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;

/// Capability to produce raw ECDSA signatures over 32-byte digests.
///
/// Concrete providers are a raw private-key signer (below) or a remote
/// wallet bridge; the pipeline is agnostic to which. Implementations map
/// user cancellation to [`SignerError::Rejected`] so callers can treat it as
/// informational rather than a failure.
#[allow(async_fn_in_trait)]
pub trait AuthoritySigner {
    /// Address of the authority this signer controls.
    fn address(&self) -> Address;

    /// Signs the 32-byte digest, returning normalized components
    /// (yParity strictly 0 or 1).
    async fn sign_digest(&self, digest: B256) -> Result<StructuredSignature, SignerError>;
}

impl AuthoritySigner for PrivateKeySigner {
    fn address(&self) -> Address {
        PrivateKeySigner::address(self)
    }

    async fn sign_digest(&self, digest: B256) -> Result<StructuredSignature, SignerError> {
        let signature = self
            .sign_hash(&digest)
            .await
            .map_err(|err| SignerError::Backend(err.to_string()))?;
        Ok(signature.into())
    }
}
