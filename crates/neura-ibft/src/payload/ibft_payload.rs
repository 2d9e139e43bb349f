use crate::types::ConsensusRoundIdentifier;
use alloy_rlp::{Decodable, Encodable};

/// Trait for IBFT message payloads.
/// Payloads are the core data signed in messages.
pub trait IbftPayload:
    Encodable + Decodable + Clone + PartialEq + Eq + Send + Sync + std::fmt::Debug
{
    /// Returns the consensus round identifier (height and round) this payload pertains to.
    fn round_identifier(&self) -> &ConsensusRoundIdentifier;

    /// Returns the message code from `messagedata::ibft_v2`. It is prefixed to the
    /// payload RLP before hashing for signature.
    fn message_type(&self) -> u8;
}
