use crate::messagedata::ibft_v2;
use crate::payload::ibft_payload::IbftPayload;
use crate::types::{ConsensusRoundIdentifier, RlpSignature};
use alloy_primitives::B256 as Hash;
use alloy_rlp::{RlpDecodable, RlpEncodable};

/// Represents the payload of an IBFT Commit message.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct CommitPayload {
    pub round_identifier: ConsensusRoundIdentifier,
    pub digest: Hash,
    /// The author's signature over the block hash, later written into the sealed header.
    pub commit_seal: RlpSignature,
}

impl CommitPayload {
    pub fn new(round_identifier: ConsensusRoundIdentifier, digest: Hash, commit_seal: RlpSignature) -> Self {
        Self { round_identifier, digest, commit_seal }
    }
}

impl IbftPayload for CommitPayload {
    fn round_identifier(&self) -> &ConsensusRoundIdentifier {
        &self.round_identifier
    }

    fn message_type(&self) -> u8 {
        ibft_v2::COMMIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Signature, B256, U256};
    use alloy_rlp::{encode, Decodable};

    #[test]
    fn test_commit_payload_rlp_roundtrip() {
        let payload = CommitPayload::new(
            ConsensusRoundIdentifier::new(9, 2),
            B256::from([0xCD; 32]),
            RlpSignature(Signature::new(U256::from(7u64), U256::from(11u64), true)),
        );

        let encoded = encode(&payload);
        let decoded = CommitPayload::decode(&mut encoded.as_slice()).expect("Failed to decode CommitPayload");
        assert_eq!(payload, decoded);
    }
}
