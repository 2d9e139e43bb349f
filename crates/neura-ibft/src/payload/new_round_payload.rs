use crate::messagedata::ibft_v2;
use crate::payload::ibft_payload::IbftPayload;
use crate::payload::{ProposalPayload, RoundChangeCertificate};
use crate::types::{ConsensusRoundIdentifier, SignedData};
use alloy_rlp::{RlpDecodable, RlpEncodable};

/// Represents the payload of an IBFT NewRound message, sent by the proposer of a
/// round entered through a round change.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct NewRoundPayload {
    pub round_identifier: ConsensusRoundIdentifier,
    pub round_change_certificate: RoundChangeCertificate,
    pub proposal: SignedData<ProposalPayload>,
}

impl NewRoundPayload {
    pub fn new(
        round_identifier: ConsensusRoundIdentifier,
        round_change_certificate: RoundChangeCertificate,
        proposal: SignedData<ProposalPayload>,
    ) -> Self {
        Self { round_identifier, round_change_certificate, proposal }
    }
}

impl IbftPayload for NewRoundPayload {
    fn round_identifier(&self) -> &ConsensusRoundIdentifier {
        &self.round_identifier
    }

    fn message_type(&self) -> u8 {
        ibft_v2::NEW_ROUND
    }
}
