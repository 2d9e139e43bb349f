use crate::error::IbftError;
use crate::types::{ConsensusRoundIdentifier, IbftBlock, IbftBlockHeader};

pub trait BlockCreator: Send + Sync {
    /// Creates a new block proposal on top of `parent_header`.
    ///
    /// The block's extra data must carry `round_identifier.round_number` and the
    /// block number must be `parent_header.number + 1`.
    fn create_block(
        &self,
        parent_header: &IbftBlockHeader,
        round_identifier: &ConsensusRoundIdentifier,
        timestamp_seconds: u64,
    ) -> Result<IbftBlock, IbftError>;
}
