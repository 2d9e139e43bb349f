use crate::error::IbftError;
use crate::messagewrappers::{Commit, NewRound, Prepare, Proposal, RoundChange};
use crate::statemachine::ibft_round::IbftRound;
use crate::statemachine::round_change_manager::RoundChangeManager;
use crate::statemachine::round_state::{PreparedRoundArtifacts, RoundState};
use crate::types::{ConsensusRoundIdentifier, IbftBlock, IbftBlockHeader, IbftFinalState};
use crate::validation::{MessageValidatorFactory, NewRoundMessageValidator};
use alloy_primitives::Address;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Consensus for a single height. Every handler returns the block it imported,
/// if any, so the caller can move on to the next height.
pub trait BlockHeightManager: Send {
    fn start(&mut self);

    fn handle_block_timer_expiry(&mut self, round: &ConsensusRoundIdentifier) -> Result<Option<IbftBlock>, IbftError>;

    fn round_expired(&mut self, round: &ConsensusRoundIdentifier) -> Result<Option<IbftBlock>, IbftError>;

    fn handle_proposal_payload(&mut self, msg: Proposal) -> Result<Option<IbftBlock>, IbftError>;

    fn handle_prepare_payload(&mut self, msg: Prepare) -> Result<Option<IbftBlock>, IbftError>;

    fn handle_commit_payload(&mut self, msg: Commit) -> Result<Option<IbftBlock>, IbftError>;

    fn handle_round_change_payload(&mut self, msg: RoundChange) -> Result<Option<IbftBlock>, IbftError>;

    fn handle_new_round_payload(&mut self, msg: NewRound) -> Result<Option<IbftBlock>, IbftError>;

    fn chain_height(&self) -> u64;

    fn parent_block_header(&self) -> &IbftBlockHeader;

    fn current_round_identifier(&self) -> Option<ConsensusRoundIdentifier>;

    /// Whether `address` may take part in consensus at this height.
    fn is_known_validator(&self, address: &Address) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageAge {
    PriorRound,
    CurrentRound,
    FutureRound,
    /// Further ahead than `future_messages_max_distance` rounds.
    TooFarAhead,
}

pub struct IbftBlockHeightManager {
    parent_header: Arc<IbftBlockHeader>,
    final_state: Arc<IbftFinalState>,
    validator_factory: MessageValidatorFactory,
    new_round_validator: NewRoundMessageValidator,
    round_change_manager: RoundChangeManager,
    quorum: usize,

    current_round: Option<IbftRound>,
    latest_prepared_round_artifacts: Option<PreparedRoundArtifacts>,
    future_round_state_buffer: BTreeMap<u32, RoundState>,
}

impl IbftBlockHeightManager {
    pub fn new(
        parent_header: Arc<IbftBlockHeader>,
        final_state: Arc<IbftFinalState>,
        validator_factory: MessageValidatorFactory,
    ) -> Self {
        let quorum = validator_factory.validators().quorum_size();
        let round_change_manager =
            RoundChangeManager::new(quorum, validator_factory.create_round_change_message_validator());
        let new_round_validator = validator_factory.create_new_round_validator();

        Self {
            parent_header,
            final_state,
            validator_factory,
            new_round_validator,
            round_change_manager,
            quorum,
            current_round: None,
            latest_prepared_round_artifacts: None,
            future_round_state_buffer: BTreeMap::new(),
        }
    }

    pub fn current_round(&self) -> Option<&IbftRound> {
        self.current_round.as_ref()
    }

    pub fn round_change_manager(&self) -> &RoundChangeManager {
        &self.round_change_manager
    }

    pub fn buffered_future_rounds(&self) -> Vec<u32> {
        self.future_round_state_buffer.keys().copied().collect()
    }

    fn current_round_mut(&mut self) -> Result<&mut IbftRound, IbftError> {
        self.current_round
            .as_mut()
            .ok_or_else(|| IbftError::InvalidState("height manager has no active round".to_string()))
    }

    fn is_local_node_proposer_for_round(&self, round: &ConsensusRoundIdentifier) -> bool {
        self.validator_factory
            .proposer_selector()
            .is_local_node_proposer_for_round(&self.final_state.local_address(), round)
    }

    fn timestamp_for_block(&self, round: &ConsensusRoundIdentifier) -> u64 {
        self.final_state.block_timer().get_timestamp_for_future_block(round, self.parent_header.timestamp)
    }

    fn new_round_state(&self, round_identifier: ConsensusRoundIdentifier) -> RoundState {
        RoundState::new(
            round_identifier,
            self.validator_factory.create_message_validator(round_identifier),
            self.quorum,
        )
    }

    fn start_new_round(&mut self, round_number: u32) {
        let round_identifier = ConsensusRoundIdentifier::new(self.chain_height(), round_number);
        log::debug!("Starting new round {}", round_identifier);

        let round_state = match self.future_round_state_buffer.remove(&round_number) {
            Some(buffered) => buffered,
            None => self.new_round_state(round_identifier),
        };
        self.future_round_state_buffer.retain(|buffered_round, _| *buffered_round > round_number);

        self.current_round = Some(IbftRound::new(round_state, self.final_state.clone(), self.parent_header.clone()));
        self.round_change_manager.discard_rounds_prior_to(&round_identifier);
    }

    fn determine_age_of_payload(&self, round: &ConsensusRoundIdentifier) -> Option<MessageAge> {
        let current_round_number = self.current_round.as_ref()?.round_identifier().round_number;
        let age = if round.round_number < current_round_number {
            MessageAge::PriorRound
        } else if round.round_number == current_round_number {
            MessageAge::CurrentRound
        } else if u64::from(round.round_number - current_round_number)
            > self.final_state.config().future_messages_max_distance
        {
            MessageAge::TooFarAhead
        } else {
            MessageAge::FutureRound
        };
        Some(age)
    }

    fn action_or_buffer_message<M>(
        &mut self,
        round: ConsensusRoundIdentifier,
        msg: M,
        in_round_handler: impl FnOnce(&mut IbftRound, M) -> Result<Option<IbftBlock>, IbftError>,
        buffer: impl FnOnce(&mut RoundState, M),
    ) -> Result<Option<IbftBlock>, IbftError> {
        match self.determine_age_of_payload(&round) {
            Some(MessageAge::CurrentRound) => in_round_handler(self.current_round_mut()?, msg),
            Some(MessageAge::FutureRound) => {
                if !self.future_round_state_buffer.contains_key(&round.round_number) {
                    let round_state = self.new_round_state(round);
                    self.future_round_state_buffer.insert(round.round_number, round_state);
                }
                if let Some(round_state) = self.future_round_state_buffer.get_mut(&round.round_number) {
                    buffer(round_state, msg);
                }
                Ok(None)
            }
            Some(MessageAge::TooFarAhead) => {
                log::warn!("Discarding message for round too far in the future. round={}", round);
                Ok(None)
            }
            Some(MessageAge::PriorRound) | None => {
                log::trace!("Discarding message for prior round. round={}", round);
                Ok(None)
            }
        }
    }
}

impl BlockHeightManager for IbftBlockHeightManager {
    fn start(&mut self) {
        self.start_new_round(0);
        if let Some(round) = self.current_round.as_ref() {
            let round_identifier = *round.round_identifier();
            self.final_state.block_timer().start_timer(round_identifier, &self.parent_header);
        }
    }

    fn handle_block_timer_expiry(&mut self, round: &ConsensusRoundIdentifier) -> Result<Option<IbftBlock>, IbftError> {
        let is_current = self.current_round.as_ref().is_some_and(|r| r.round_identifier() == round);
        if !is_current {
            log::trace!("Block timer expired for a round other than current. round={}", round);
            return Ok(None);
        }
        if !self.is_local_node_proposer_for_round(round) {
            return Ok(None);
        }

        let timestamp = self.timestamp_for_block(round);
        self.current_round_mut()?.create_and_send_proposal_message(timestamp)
    }

    fn round_expired(&mut self, expired_round: &ConsensusRoundIdentifier) -> Result<Option<IbftBlock>, IbftError> {
        let Some(current_round) = self.current_round.as_ref() else {
            return Ok(None);
        };
        if current_round.round_identifier() != expired_round {
            log::trace!("Ignoring round timer expired which does not match current round. round={}", expired_round);
            return Ok(None);
        }

        log::debug!("Round has expired, creating PreparedCertificate and notifying peers. round={}", expired_round);
        if let Some(artifacts) = current_round.construct_prepared_round_artifacts() {
            self.latest_prepared_round_artifacts = Some(artifacts);
        }

        let next_round_number = expired_round
            .round_number
            .checked_add(1)
            .ok_or_else(|| IbftError::InvalidState("round number overflow".to_string()))?;
        self.start_new_round(next_round_number);

        let prepared_certificate = self.latest_prepared_round_artifacts.as_ref().map(|a| a.prepared_certificate());
        let local_round_change = self
            .final_state
            .message_factory()
            .create_round_change(expired_round.with_round(next_round_number), prepared_certificate)?;
        self.final_state.validator_multicaster().multicast_round_change(&local_round_change);

        self.handle_round_change_payload(local_round_change)
    }

    fn handle_proposal_payload(&mut self, msg: Proposal) -> Result<Option<IbftBlock>, IbftError> {
        log::debug!("Received a Proposal Payload. round={}", msg.round_identifier());
        // Above round 0 a proposal is only justified inside a NewRound.
        if msg.round_identifier().round_number > 0 {
            log::info!("Discarding Proposal outside a NewRound. round={}", msg.round_identifier());
            return Ok(None);
        }
        self.action_or_buffer_message(
            *msg.round_identifier(),
            msg,
            |current, proposal| current.handle_proposal_message(&proposal),
            |round_state, proposal| {
                round_state.set_proposed_block(&proposal);
            },
        )
    }

    fn handle_prepare_payload(&mut self, msg: Prepare) -> Result<Option<IbftBlock>, IbftError> {
        log::debug!("Received a Prepare Payload. round={}", msg.round_identifier());
        self.action_or_buffer_message(
            *msg.round_identifier(),
            msg,
            IbftRound::handle_prepare_message,
            RoundState::add_prepare_message,
        )
    }

    fn handle_commit_payload(&mut self, msg: Commit) -> Result<Option<IbftBlock>, IbftError> {
        log::debug!("Received a Commit Payload. round={}", msg.round_identifier());
        self.action_or_buffer_message(
            *msg.round_identifier(),
            msg,
            IbftRound::handle_commit_message,
            RoundState::add_commit_message,
        )
    }

    fn handle_round_change_payload(&mut self, msg: RoundChange) -> Result<Option<IbftBlock>, IbftError> {
        let target_round = *msg.round_identifier();
        log::debug!("Received a RoundChange Payload. round={}", target_round);

        let message_age = match self.determine_age_of_payload(&target_round) {
            Some(MessageAge::CurrentRound) => MessageAge::CurrentRound,
            Some(MessageAge::FutureRound) => MessageAge::FutureRound,
            Some(MessageAge::TooFarAhead) => {
                log::warn!("Discarding RoundChange for round too far in the future. round={}", target_round);
                return Ok(None);
            }
            Some(MessageAge::PriorRound) | None => {
                log::trace!("Received RoundChange Payload for a prior round. round={}", target_round);
                return Ok(None);
            }
        };

        let Some(artifacts) = self.round_change_manager.append_round_change_message(msg) else {
            return Ok(None);
        };

        if message_age == MessageAge::FutureRound {
            self.start_new_round(target_round.round_number);
        }
        if self.is_local_node_proposer_for_round(&target_round) {
            let timestamp = self.timestamp_for_block(&target_round);
            return self.current_round_mut()?.start_round_with(&artifacts, timestamp);
        }
        Ok(None)
    }

    fn handle_new_round_payload(&mut self, msg: NewRound) -> Result<Option<IbftBlock>, IbftError> {
        let target_round = *msg.round_identifier();
        log::debug!("Received a NewRound Payload. round={}", target_round);

        let message_age = match self.determine_age_of_payload(&target_round) {
            Some(MessageAge::CurrentRound) => MessageAge::CurrentRound,
            Some(MessageAge::FutureRound) => MessageAge::FutureRound,
            Some(MessageAge::TooFarAhead) => {
                log::warn!("Discarding NewRound for round too far in the future. round={}", target_round);
                return Ok(None);
            }
            Some(MessageAge::PriorRound) | None => {
                log::trace!("Received NewRound Payload for a prior round. round={}", target_round);
                return Ok(None);
            }
        };

        if !self.new_round_validator.validate_new_round_message(&msg) {
            log::info!("Failed to process NewRound: message did not pass validation. round={}", target_round);
            return Ok(None);
        }

        if message_age == MessageAge::FutureRound {
            self.start_new_round(target_round.round_number);
        }
        self.current_round_mut()?.handle_proposal_from_new_round(&msg)
    }

    fn chain_height(&self) -> u64 {
        self.parent_header.number + 1
    }

    fn parent_block_header(&self) -> &IbftBlockHeader {
        &self.parent_header
    }

    fn current_round_identifier(&self) -> Option<ConsensusRoundIdentifier> {
        self.current_round.as_ref().map(|round| *round.round_identifier())
    }

    fn is_known_validator(&self, address: &Address) -> bool {
        self.validator_factory.validators().contains(address)
    }
}
