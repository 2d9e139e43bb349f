use crate::error::IbftError;
use crate::messagewrappers::{Commit, NewRound, Prepare, Proposal, RoundChange};
use crate::statemachine::block_height_manager::BlockHeightManager;
use crate::types::{ConsensusRoundIdentifier, IbftBlock, IbftBlockHeader};
use alloy_primitives::Address;
use std::sync::Arc;

/// Stands in for a height at which the local node is not a validator. It follows
/// the chain but never votes.
pub struct NoOpBlockHeightManager {
    parent_header: Arc<IbftBlockHeader>,
}

impl NoOpBlockHeightManager {
    pub fn new(parent_header: Arc<IbftBlockHeader>) -> Self {
        Self { parent_header }
    }
}

impl BlockHeightManager for NoOpBlockHeightManager {
    fn start(&mut self) {}

    fn handle_block_timer_expiry(&mut self, _round: &ConsensusRoundIdentifier) -> Result<Option<IbftBlock>, IbftError> {
        Ok(None)
    }

    fn round_expired(&mut self, _round: &ConsensusRoundIdentifier) -> Result<Option<IbftBlock>, IbftError> {
        Ok(None)
    }

    fn handle_proposal_payload(&mut self, _msg: Proposal) -> Result<Option<IbftBlock>, IbftError> {
        Ok(None)
    }

    fn handle_prepare_payload(&mut self, _msg: Prepare) -> Result<Option<IbftBlock>, IbftError> {
        Ok(None)
    }

    fn handle_commit_payload(&mut self, _msg: Commit) -> Result<Option<IbftBlock>, IbftError> {
        Ok(None)
    }

    fn handle_round_change_payload(&mut self, _msg: RoundChange) -> Result<Option<IbftBlock>, IbftError> {
        Ok(None)
    }

    fn handle_new_round_payload(&mut self, _msg: NewRound) -> Result<Option<IbftBlock>, IbftError> {
        Ok(None)
    }

    fn chain_height(&self) -> u64 {
        self.parent_header.number + 1
    }

    fn parent_block_header(&self) -> &IbftBlockHeader {
        &self.parent_header
    }

    fn current_round_identifier(&self) -> Option<ConsensusRoundIdentifier> {
        None
    }

    fn is_known_validator(&self, _address: &Address) -> bool {
        false
    }
}
