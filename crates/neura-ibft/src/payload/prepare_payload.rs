use crate::messagedata::ibft_v2;
use crate::payload::ibft_payload::IbftPayload;
use crate::types::ConsensusRoundIdentifier;
use alloy_primitives::B256 as Hash;
use alloy_rlp::{RlpDecodable, RlpEncodable};

/// Represents the payload of an IBFT Prepare message.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct PreparePayload {
    pub round_identifier: ConsensusRoundIdentifier,
    /// Hash of the proposed block.
    pub digest: Hash,
}

impl PreparePayload {
    pub fn new(round_identifier: ConsensusRoundIdentifier, digest: Hash) -> Self {
        Self { round_identifier, digest }
    }
}

impl IbftPayload for PreparePayload {
    fn round_identifier(&self) -> &ConsensusRoundIdentifier {
        &self.round_identifier
    }

    fn message_type(&self) -> u8 {
        ibft_v2::PREPARE
    }
}
