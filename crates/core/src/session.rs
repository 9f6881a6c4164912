//! Per-session authorization list management.
//!
//! One [`DelegationSession`] backs one active page or surface. It owns the
//! ordered entry list and is only ever mutated from that single context;
//! entry indexes are the stable keys callers use across updates. Order does
//! not affect on-chain semantics, each authorization applies independently
//! to its own signer.

use crate::{
    authorization::{AuthorizationEntry, SignedAuthorization, sign_entry},
    chain::ChainReader,
    error::SessionError,
    nonce::resolve_nonce,
    signer::AuthoritySigner,
};
use alloy_primitives::{Address, ChainId};
use tracing::debug;

/// Session state for building one EIP-7702 transaction.
#[derive(Debug, Clone)]
pub struct DelegationSession {
    chain_id: ChainId,
    entries: Vec<AuthorizationEntry>,
}

impl DelegationSession {
    /// Opens a session pinned to one chain, with a single empty entry.
    /// Switching chains means opening a fresh session, so signatures for a
    /// stale chain cannot leak across.
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            entries: vec![AuthorizationEntry::new()],
        }
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn entries(&self) -> &[AuthorizationEntry] {
        &self.entries
    }

    /// Appends a fresh entry and returns its index.
    pub fn add_entry(&mut self) -> usize {
        self.entries.push(AuthorizationEntry::new());
        debug!(entries = self.entries.len(), "added authorization entry");
        self.entries.len() - 1
    }

    /// Removes the entry at `index`; later entries shift down.
    pub fn remove_entry(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.entries.len() {
            return Err(SessionError::UnknownEntry(index));
        }
        self.entries.remove(index);
        Ok(())
    }

    pub fn entry(&self, index: usize) -> Result<&AuthorizationEntry, SessionError> {
        self.entries
            .get(index)
            .ok_or(SessionError::UnknownEntry(index))
    }

    pub fn set_contract_address(
        &mut self,
        index: usize,
        address: Address,
    ) -> Result<(), SessionError> {
        self.entry_mut(index)?.set_contract_address(address);
        Ok(())
    }

    pub fn set_nonce(&mut self, index: usize, nonce: u64) -> Result<(), SessionError> {
        self.entry_mut(index)?.set_nonce(nonce);
        Ok(())
    }

    /// Pre-fills an entry's nonce from the authority's current transaction
    /// count, soft-failing to 0 when the chain is unreachable.
    pub async fn prefill_nonce<R: ChainReader>(
        &mut self,
        index: usize,
        reader: &R,
        authority: Address,
    ) -> Result<u64, SessionError> {
        self.entry(index)?;
        let nonce = resolve_nonce(reader, authority).await;
        self.entry_mut(index)?.set_nonce(nonce);
        Ok(nonce)
    }

    /// Signs the entry at `index` for this session's chain.
    pub async fn sign<S: AuthoritySigner>(
        &mut self,
        index: usize,
        signer: &S,
    ) -> Result<SignedAuthorization, SessionError> {
        let chain_id = self.chain_id;
        let entry = self.entry_mut(index)?;
        Ok(sign_entry(entry, chain_id, signer).await?)
    }

    /// Wire tuples of every Signed entry, in list order.
    pub fn signed_authorizations(&self) -> Vec<SignedAuthorization> {
        self.entries
            .iter()
            .filter_map(AuthorizationEntry::signed_authorization)
            .collect()
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut AuthorizationEntry, SessionError> {
        self.entries
            .get_mut(index)
            .ok_or(SessionError::UnknownEntry(index))
    }
}
