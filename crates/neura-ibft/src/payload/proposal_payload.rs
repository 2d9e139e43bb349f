use crate::messagedata::ibft_v2;
use crate::payload::ibft_payload::IbftPayload;
use crate::types::{ConsensusRoundIdentifier, IbftBlock};
use alloy_primitives::B256 as Hash;
use alloy_rlp::{RlpDecodable, RlpEncodable};

/// Represents the payload of an IBFT Proposal message.
///
/// `digest` is expected to equal `block.hash()`; validators check this before
/// accepting the proposal rather than at decode time.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct ProposalPayload {
    pub round_identifier: ConsensusRoundIdentifier,
    pub digest: Hash,
    pub block: IbftBlock,
}

impl ProposalPayload {
    pub fn new(round_identifier: ConsensusRoundIdentifier, block: IbftBlock) -> Self {
        Self { round_identifier, digest: block.hash(), block }
    }
}

impl IbftPayload for ProposalPayload {
    fn round_identifier(&self) -> &ConsensusRoundIdentifier {
        &self.round_identifier
    }

    fn message_type(&self) -> u8 {
        ibft_v2::PROPOSAL
    }
}
