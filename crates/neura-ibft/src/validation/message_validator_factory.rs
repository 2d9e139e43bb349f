use crate::helpers::prepare_message_count_for_quorum;
use crate::proposer_selector::ProposerSelector;
use crate::types::{BlockValidator, ConsensusRoundIdentifier, ValidatorSet};
use crate::validation::{
    MessageValidator, NewRoundMessageValidator, ProposalBlockConsistencyChecker, RoundChangeMessageValidator,
    RoundChangePayloadValidator,
};
use std::sync::Arc;

/// Builds the validators used while a height is being decided.
///
/// Everything here is fixed for the height: the validator set read at the parent
/// header, the proposer rotation and the chain height being agreed on.
#[derive(Clone)]
pub struct MessageValidatorFactory {
    validators: Arc<ValidatorSet>,
    proposer_selector: Arc<ProposerSelector>,
    block_validator: Arc<dyn BlockValidator>,
    chain_height: u64,
}

impl MessageValidatorFactory {
    pub fn new(
        validators: Arc<ValidatorSet>,
        proposer_selector: Arc<ProposerSelector>,
        block_validator: Arc<dyn BlockValidator>,
        chain_height: u64,
    ) -> Self {
        Self { validators, proposer_selector, block_validator, chain_height }
    }

    pub fn validators(&self) -> &Arc<ValidatorSet> {
        &self.validators
    }

    pub fn proposer_selector(&self) -> &Arc<ProposerSelector> {
        &self.proposer_selector
    }

    pub fn chain_height(&self) -> u64 {
        self.chain_height
    }

    /// A fresh validator for the Proposal, Prepare and Commit messages of `round_identifier`.
    pub fn create_message_validator(&self, round_identifier: ConsensusRoundIdentifier) -> MessageValidator {
        MessageValidator::new(
            self.validators.clone(),
            self.proposer_selector.select_proposer_for_round(&round_identifier),
            round_identifier,
            ProposalBlockConsistencyChecker::new(self.block_validator.clone()),
        )
    }

    pub fn create_round_change_payload_validator(&self) -> RoundChangePayloadValidator {
        RoundChangePayloadValidator::new(
            self.clone(),
            self.validators.clone(),
            prepare_message_count_for_quorum(self.validators.quorum_size()),
            self.chain_height,
        )
    }

    pub fn create_round_change_message_validator(&self) -> RoundChangeMessageValidator {
        RoundChangeMessageValidator::new(self.create_round_change_payload_validator())
    }

    pub fn create_new_round_validator(&self) -> NewRoundMessageValidator {
        NewRoundMessageValidator::new(
            self.proposer_selector.clone(),
            self.clone(),
            self.validators.quorum_size(),
            self.chain_height,
        )
    }
}
