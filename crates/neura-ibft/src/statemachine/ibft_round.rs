use crate::error::IbftError;
use crate::helpers::{create_sealed_block, replace_round_in_block};
use crate::messagewrappers::{Commit, NewRound, Prepare, Proposal};
use crate::statemachine::round_change_manager::RoundChangeArtifacts;
use crate::statemachine::round_state::{PreparedRoundArtifacts, RoundState};
use crate::types::{ConsensusRoundIdentifier, IbftBlock, IbftBlockHeader, IbftFinalState};
use std::sync::Arc;

/// Drives a single round: proposing, preparing, committing and finally importing
/// the agreed block.
///
/// Every handler returns the sealed block when it caused the round to commit and
/// the import succeeded.
pub struct IbftRound {
    round_state: RoundState,
    final_state: Arc<IbftFinalState>,
    parent_header: Arc<IbftBlockHeader>,
}

impl IbftRound {
    pub fn new(round_state: RoundState, final_state: Arc<IbftFinalState>, parent_header: Arc<IbftBlockHeader>) -> Self {
        final_state.round_timer().start_timer(*round_state.round_identifier());
        Self { round_state, final_state, parent_header }
    }

    pub fn round_identifier(&self) -> &ConsensusRoundIdentifier {
        self.round_state.round_identifier()
    }

    pub fn round_state(&self) -> &RoundState {
        &self.round_state
    }

    pub fn create_and_send_proposal_message(&mut self, timestamp_seconds: u64) -> Result<Option<IbftBlock>, IbftError> {
        let round = *self.round_identifier();
        let block = self.final_state.block_creator().create_block(&self.parent_header, &round, timestamp_seconds)?;
        log::debug!("Creating proposed block. round={}", round);

        let proposal = self.final_state.message_factory().create_proposal(round, block)?;
        self.final_state.validator_multicaster().multicast_proposal(&proposal);
        self.update_state_with_proposed_block(&proposal).map(|(_, imported)| imported)
    }

    pub fn start_round_with(
        &mut self,
        round_change_artifacts: &RoundChangeArtifacts,
        timestamp_seconds: u64,
    ) -> Result<Option<IbftBlock>, IbftError> {
        let round = *self.round_identifier();
        let block = match round_change_artifacts.block() {
            Some(prepared_block) => {
                log::debug!("Re-proposing block {:?} from round change certificate. round={}", prepared_block.hash(), round);
                replace_round_in_block(prepared_block, round.round_number)
            }
            None => {
                log::debug!("Sending NewRound with a new block. round={}", round);
                self.final_state.block_creator().create_block(&self.parent_header, &round, timestamp_seconds)?
            }
        };

        let message_factory = self.final_state.message_factory();
        let signed_proposal = message_factory.create_signed_proposal_payload(round, block)?;
        let new_round = message_factory.create_new_round(
            round,
            round_change_artifacts.round_change_certificate().clone(),
            signed_proposal.clone(),
        )?;
        self.final_state.validator_multicaster().multicast_new_round(&new_round);
        self.update_state_with_proposed_block(&Proposal::new(signed_proposal)).map(|(_, imported)| imported)
    }

    pub fn handle_proposal_message(&mut self, msg: &Proposal) -> Result<Option<IbftBlock>, IbftError> {
        log::debug!("Received a Proposal message. round={}", self.round_identifier());
        self.accept_proposal_and_prepare(msg)
    }

    pub fn handle_proposal_from_new_round(&mut self, msg: &NewRound) -> Result<Option<IbftBlock>, IbftError> {
        log::debug!("Received a NewRound message. round={}", self.round_identifier());
        self.accept_proposal_and_prepare(&msg.proposal())
    }

    fn accept_proposal_and_prepare(&mut self, proposal: &Proposal) -> Result<Option<IbftBlock>, IbftError> {
        let (accepted, imported) = self.update_state_with_proposed_block(proposal)?;
        if !accepted || imported.is_some() {
            return Ok(imported);
        }

        log::debug!("Sending Prepare message. round={}", self.round_identifier());
        let local_prepare = self.final_state.message_factory().create_prepare(*self.round_identifier(), proposal.block().hash())?;
        self.final_state.validator_multicaster().multicast_prepare(&local_prepare);
        self.peer_is_prepared(local_prepare)
    }

    pub fn handle_prepare_message(&mut self, msg: Prepare) -> Result<Option<IbftBlock>, IbftError> {
        log::debug!("Received a Prepare message. round={}", self.round_identifier());
        self.peer_is_prepared(msg)
    }

    pub fn handle_commit_message(&mut self, msg: Commit) -> Result<Option<IbftBlock>, IbftError> {
        log::debug!("Received a Commit message. round={}", self.round_identifier());
        self.peer_is_committed(msg)
    }

    pub fn construct_prepared_round_artifacts(&self) -> Option<PreparedRoundArtifacts> {
        self.round_state.construct_prepared_round_artifacts()
    }

    /// Returns whether the proposal was accepted, and the imported block if that
    /// acceptance completed the round.
    fn update_state_with_proposed_block(&mut self, msg: &Proposal) -> Result<(bool, Option<IbftBlock>), IbftError> {
        let was_prepared = self.round_state.is_prepared();
        let was_committed = self.round_state.is_committed();
        let block_accepted = self.round_state.set_proposed_block(msg);

        if block_accepted {
            let round = *self.round_identifier();
            let block = msg.block();
            let message_factory = self.final_state.message_factory();
            let commit_seal = message_factory.create_commit_seal(block)?;
            let local_commit = message_factory.create_commit(round, block.hash(), commit_seal)?;

            // Buffered prepares can be enough to be prepared as soon as the proposal lands.
            if was_prepared != self.round_state.is_prepared() {
                log::debug!("Sending Commit message. round={}", round);
                self.final_state.validator_multicaster().multicast_commit(&local_commit);
            }

            self.round_state.add_commit_message(local_commit);
        }

        let imported = if was_committed != self.round_state.is_committed() { self.import_block_to_chain() } else { None };
        Ok((block_accepted, imported))
    }

    fn peer_is_prepared(&mut self, msg: Prepare) -> Result<Option<IbftBlock>, IbftError> {
        let was_prepared = self.round_state.is_prepared();
        let was_committed = self.round_state.is_committed();
        self.round_state.add_prepare_message(msg);

        if was_prepared != self.round_state.is_prepared() {
            if let Some(block) = self.round_state.proposed_block() {
                let round = *self.round_identifier();
                log::debug!("Sending Commit message. round={}", round);
                let message_factory = self.final_state.message_factory();
                let commit_seal = message_factory.create_commit_seal(block)?;
                let commit = message_factory.create_commit(round, block.hash(), commit_seal)?;
                self.final_state.validator_multicaster().multicast_commit(&commit);
            }
        }

        // The local commit is already held, so the prepared edge can also complete the round.
        if was_committed != self.round_state.is_committed() {
            return Ok(self.import_block_to_chain());
        }
        Ok(None)
    }

    fn peer_is_committed(&mut self, msg: Commit) -> Result<Option<IbftBlock>, IbftError> {
        let was_committed = self.round_state.is_committed();
        self.round_state.add_commit_message(msg);
        if was_committed != self.round_state.is_committed() {
            return Ok(self.import_block_to_chain());
        }
        Ok(None)
    }

    fn import_block_to_chain(&self) -> Option<IbftBlock> {
        let proposed_block = self.round_state.proposed_block()?;
        let block_to_import = create_sealed_block(proposed_block, self.round_state.commit_seals());
        log::info!(
            "Importing block to chain. round={}, hash={:?}",
            self.round_identifier(),
            block_to_import.hash()
        );

        match self.final_state.block_importer().import_block(&block_to_import) {
            Ok(()) => {
                self.final_state.mined_block_notifier().notify(&block_to_import);
                Some(block_to_import)
            }
            Err(e) => {
                log::error!(
                    "Failed to import block to chain. block={}, hash={:?}: {}",
                    block_to_import.number(),
                    block_to_import.hash(),
                    e
                );
                None
            }
        }
    }
}
