use crate::payload::{PreparePayload, ProposalPayload};
use crate::types::{IbftBlock, SignedData};
use alloy_primitives::B256 as Hash;
use alloy_rlp::{RlpDecodable, RlpEncodable};

/// Evidence that a round was prepared: the signed proposal plus the prepares
/// that were received for it.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct PreparedCertificate {
    pub proposal: SignedData<ProposalPayload>,
    pub prepares: Vec<SignedData<PreparePayload>>,
}

impl PreparedCertificate {
    pub fn new(proposal: SignedData<ProposalPayload>, prepares: Vec<SignedData<PreparePayload>>) -> Self {
        Self { proposal, prepares }
    }

    pub fn proposal_round(&self) -> u32 {
        self.proposal.payload().round_identifier.round_number
    }

    pub fn digest(&self) -> Hash {
        self.proposal.payload().digest
    }

    pub fn block(&self) -> &IbftBlock {
        &self.proposal.payload().block
    }
}
