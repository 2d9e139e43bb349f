use crate::messagewrappers::RawIbftMessage;
use crate::types::{ConsensusRoundIdentifier, IbftBlockHeader};

/// Everything the consensus loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IbftEvent {
    /// A consensus message from a peer, still encoded.
    MessageReceived(RawIbftMessage),
    /// The chain imported a new head.
    NewChainHead(IbftBlockHeader),
    BlockTimerExpiry(ConsensusRoundIdentifier),
    RoundExpiry(ConsensusRoundIdentifier),
}

impl IbftEvent {
    pub fn name(&self) -> &'static str {
        match self {
            IbftEvent::MessageReceived(_) => "MessageReceived",
            IbftEvent::NewChainHead(_) => "NewChainHead",
            IbftEvent::BlockTimerExpiry(_) => "BlockTimerExpiry",
            IbftEvent::RoundExpiry(_) => "RoundExpiry",
        }
    }
}
