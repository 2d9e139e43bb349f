use crate::error::IbftError;
use crate::messagedata::ibft_v2;
use crate::messagewrappers::{Commit, NewRound, Prepare, Proposal, RoundChange};
use crate::types::ConsensusRoundIdentifier;
use alloy_primitives::{keccak256, Address, Bytes, B256 as Hash};
use alloy_rlp::Decodable;
use std::fmt;

/// A message as it travels between peers: a message code plus the RLP of its signed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIbftMessage {
    pub code: u8,
    pub data: Bytes,
}

impl RawIbftMessage {
    pub fn new(code: u8, data: Bytes) -> Self {
        Self { code, data }
    }

    /// Identity used for duplicate detection and gossip history: `keccak256(code ++ data)`.
    pub fn hash(&self) -> Hash {
        let mut preimage = Vec::with_capacity(1 + self.data.len());
        preimage.push(self.code);
        preimage.extend_from_slice(&self.data);
        keccak256(&preimage)
    }
}

impl fmt::Display for RawIbftMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} bytes)", ibft_v2::message_name(self.code), self.data.len())
    }
}

/// An authenticated, decoded consensus message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IbftMessage {
    Proposal(Proposal),
    Prepare(Prepare),
    Commit(Commit),
    RoundChange(RoundChange),
    NewRound(NewRound),
}

fn decode_exact<T: Decodable>(data: &[u8]) -> Result<T, IbftError> {
    let mut buf = data;
    let decoded = T::decode(&mut buf)?;
    if !buf.is_empty() {
        return Err(IbftError::RlpDecodingError(format!("{} trailing bytes after message", buf.len())));
    }
    Ok(decoded)
}

impl IbftMessage {
    /// Decodes and authenticates a raw message. Every nested signature is recovered;
    /// a failed recovery is reported as [`IbftError::AuthenticationFailed`].
    pub fn decode(raw: &RawIbftMessage) -> Result<Self, IbftError> {
        match raw.code {
            ibft_v2::PROPOSAL => decode_exact(&raw.data).map(IbftMessage::Proposal),
            ibft_v2::PREPARE => decode_exact(&raw.data).map(IbftMessage::Prepare),
            ibft_v2::COMMIT => decode_exact(&raw.data).map(IbftMessage::Commit),
            ibft_v2::ROUND_CHANGE => decode_exact(&raw.data).map(IbftMessage::RoundChange),
            ibft_v2::NEW_ROUND => decode_exact(&raw.data).map(IbftMessage::NewRound),
            other => Err(IbftError::InvalidMessageType(other)),
        }
    }

    pub fn to_raw(&self) -> RawIbftMessage {
        match self {
            IbftMessage::Proposal(m) => RawIbftMessage::new(ibft_v2::PROPOSAL, m.encode_to_bytes()),
            IbftMessage::Prepare(m) => RawIbftMessage::new(ibft_v2::PREPARE, m.encode_to_bytes()),
            IbftMessage::Commit(m) => RawIbftMessage::new(ibft_v2::COMMIT, m.encode_to_bytes()),
            IbftMessage::RoundChange(m) => RawIbftMessage::new(ibft_v2::ROUND_CHANGE, m.encode_to_bytes()),
            IbftMessage::NewRound(m) => RawIbftMessage::new(ibft_v2::NEW_ROUND, m.encode_to_bytes()),
        }
    }

    pub fn author(&self) -> Address {
        match self {
            IbftMessage::Proposal(m) => m.author(),
            IbftMessage::Prepare(m) => m.author(),
            IbftMessage::Commit(m) => m.author(),
            IbftMessage::RoundChange(m) => m.author(),
            IbftMessage::NewRound(m) => m.author(),
        }
    }

    pub fn round_identifier(&self) -> ConsensusRoundIdentifier {
        match self {
            IbftMessage::Proposal(m) => *m.round_identifier(),
            IbftMessage::Prepare(m) => *m.round_identifier(),
            IbftMessage::Commit(m) => *m.round_identifier(),
            IbftMessage::RoundChange(m) => *m.round_identifier(),
            IbftMessage::NewRound(m) => *m.round_identifier(),
        }
    }

    pub fn message_type(&self) -> u8 {
        match self {
            IbftMessage::Proposal(_) => ibft_v2::PROPOSAL,
            IbftMessage::Prepare(_) => ibft_v2::PREPARE,
            IbftMessage::Commit(_) => ibft_v2::COMMIT,
            IbftMessage::RoundChange(_) => ibft_v2::ROUND_CHANGE,
            IbftMessage::NewRound(_) => ibft_v2::NEW_ROUND,
        }
    }
}

impl From<Proposal> for IbftMessage {
    fn from(m: Proposal) -> Self {
        IbftMessage::Proposal(m)
    }
}

impl From<Prepare> for IbftMessage {
    fn from(m: Prepare) -> Self {
        IbftMessage::Prepare(m)
    }
}

impl From<Commit> for IbftMessage {
    fn from(m: Commit) -> Self {
        IbftMessage::Commit(m)
    }
}

impl From<RoundChange> for IbftMessage {
    fn from(m: RoundChange) -> Self {
        IbftMessage::RoundChange(m)
    }
}

impl From<NewRound> for IbftMessage {
    fn from(m: NewRound) -> Self {
        IbftMessage::NewRound(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::MessageFactory;
    use crate::validation::tests::common_helpers::{create_block, deterministic_node_key};
    use std::sync::Arc;

    fn factory(seed: u8) -> MessageFactory {
        MessageFactory::new(Arc::new(deterministic_node_key(seed)))
    }

    #[test]
    fn raw_round_trip_preserves_author_and_round() {
        let f = factory(1);
        let round = ConsensusRoundIdentifier::new(4, 2);
        let block = create_block(4, 2);
        let proposal = f.create_signed_proposal_payload(round, block).unwrap();
        let rc = f.create_round_change(round.with_round(3), None).unwrap();
        let nr = f
            .create_new_round(
                round,
                crate::payload::RoundChangeCertificate::new(vec![rc.signed_payload().clone()]),
                proposal,
            )
            .unwrap();

        let message = IbftMessage::NewRound(nr);
        let raw = message.to_raw();
        assert_eq!(raw.code, ibft_v2::NEW_ROUND);

        let decoded = IbftMessage::decode(&raw).expect("decode");
        assert_eq!(decoded, message);
        assert_eq!(decoded.author(), f.local_address());
        assert_eq!(decoded.round_identifier(), round);
    }

    #[test]
    fn unknown_code_is_rejected() {
        let raw = RawIbftMessage::new(9, Bytes::from_static(&[0xc0]));
        assert_eq!(IbftMessage::decode(&raw), Err(IbftError::InvalidMessageType(9)));
    }

    #[test]
    fn payload_decoded_under_the_wrong_code_fails() {
        let f = factory(2);
        let prepare = f.create_prepare(ConsensusRoundIdentifier::new(1, 0), Hash::repeat_byte(3)).unwrap();
        let raw = RawIbftMessage::new(ibft_v2::COMMIT, prepare.encode_to_bytes());
        let err = IbftMessage::decode(&raw).unwrap_err();
        assert!(err.is_discardable_input());
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let f = factory(3);
        let prepare = f.create_prepare(ConsensusRoundIdentifier::new(1, 0), Hash::repeat_byte(3)).unwrap();
        let mut data = prepare.encode_to_bytes().to_vec();
        data.push(0x80);
        let raw = RawIbftMessage::new(ibft_v2::PREPARE, data.into());
        assert!(matches!(IbftMessage::decode(&raw), Err(IbftError::RlpDecodingError(_))));
    }

    #[test]
    fn hash_covers_the_code() {
        let data = Bytes::from_static(&[0xc0]);
        assert_ne!(RawIbftMessage::new(1, data.clone()).hash(), RawIbftMessage::new(2, data).hash());
    }
}
