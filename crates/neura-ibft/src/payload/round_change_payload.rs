use crate::messagedata::ibft_v2;
use crate::payload::ibft_payload::IbftPayload;
use crate::payload::PreparedCertificate;
use crate::types::ConsensusRoundIdentifier;
use alloy_rlp::{RlpDecodable, RlpEncodable};

/// Represents the payload of an IBFT RoundChange message.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
#[rlp(trailing)]
pub struct RoundChangePayload {
    /// The round the author wants to move to.
    pub round_identifier: ConsensusRoundIdentifier,
    /// Present when the author prepared a block in an earlier round of this height.
    pub prepared_certificate: Option<PreparedCertificate>,
}

impl RoundChangePayload {
    pub fn new(round_identifier: ConsensusRoundIdentifier, prepared_certificate: Option<PreparedCertificate>) -> Self {
        Self { round_identifier, prepared_certificate }
    }
}

impl IbftPayload for RoundChangePayload {
    fn round_identifier(&self) -> &ConsensusRoundIdentifier {
        &self.round_identifier
    }

    fn message_type(&self) -> u8 {
        ibft_v2::ROUND_CHANGE
    }
}
