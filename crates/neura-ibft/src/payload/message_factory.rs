// crates/neura-ibft/src/payload/message_factory.rs
use crate::error::IbftError;
use crate::messagewrappers::{Commit, NewRound, Prepare, Proposal, RoundChange};
use crate::payload::{
    CommitPayload, NewRoundPayload, PreparePayload, PreparedCertificate, ProposalPayload, RoundChangeCertificate,
    RoundChangePayload,
};
use crate::types::signed_data::{address_from_node_key, sign_hash};
use crate::types::{ConsensusRoundIdentifier, IbftBlock, NodeKey, RlpSignature, SignedData};

use alloy_primitives::{Address, B256 as Hash};
use std::sync::Arc;

/// Signs outbound messages with the local node key.
pub struct MessageFactory {
    node_key: Arc<NodeKey>,
    local_address: Address,
}

impl MessageFactory {
    pub fn new(node_key: Arc<NodeKey>) -> Self {
        let local_address = address_from_node_key(&node_key);
        Self { node_key, local_address }
    }

    pub fn local_address(&self) -> Address {
        self.local_address
    }

    // --- Proposal ---
    pub fn create_proposal(
        &self,
        round_identifier: ConsensusRoundIdentifier,
        block: IbftBlock,
    ) -> Result<Proposal, IbftError> {
        let signed_payload = self.create_signed_proposal_payload(round_identifier, block)?;
        Ok(Proposal::new(signed_payload))
    }

    pub fn create_signed_proposal_payload(
        &self,
        round_identifier: ConsensusRoundIdentifier,
        block: IbftBlock,
    ) -> Result<SignedData<ProposalPayload>, IbftError> {
        SignedData::sign(ProposalPayload::new(round_identifier, block), &self.node_key)
    }

    // --- Prepare ---
    pub fn create_prepare(&self, round_identifier: ConsensusRoundIdentifier, digest: Hash) -> Result<Prepare, IbftError> {
        let payload = PreparePayload::new(round_identifier, digest);
        Ok(Prepare::new(SignedData::sign(payload, &self.node_key)?))
    }

    // --- Commit ---
    pub fn create_commit(
        &self,
        round_identifier: ConsensusRoundIdentifier,
        digest: Hash,
        commit_seal: RlpSignature,
    ) -> Result<Commit, IbftError> {
        let payload = CommitPayload::new(round_identifier, digest, commit_seal);
        Ok(Commit::new(SignedData::sign(payload, &self.node_key)?))
    }

    /// Signs the block hash. The seal ends up in the sealed header's extra data.
    pub fn create_commit_seal(&self, block: &IbftBlock) -> Result<RlpSignature, IbftError> {
        sign_hash(block.hash(), &self.node_key)
    }

    // --- RoundChange ---
    pub fn create_round_change(
        &self,
        target_round_identifier: ConsensusRoundIdentifier,
        prepared_certificate: Option<PreparedCertificate>,
    ) -> Result<RoundChange, IbftError> {
        let payload = RoundChangePayload::new(target_round_identifier, prepared_certificate);
        Ok(RoundChange::new(SignedData::sign(payload, &self.node_key)?))
    }

    // --- NewRound ---
    pub fn create_new_round(
        &self,
        round_identifier: ConsensusRoundIdentifier,
        round_change_certificate: RoundChangeCertificate,
        proposal: SignedData<ProposalPayload>,
    ) -> Result<NewRound, IbftError> {
        let payload = NewRoundPayload::new(round_identifier, round_change_certificate, proposal);
        Ok(NewRound::new(SignedData::sign(payload, &self.node_key)?))
    }
}
