use crate::helpers::{find_latest_prepared_certificate, replace_round_in_block};
use crate::messagewrappers::NewRound;
use crate::payload::RoundChangeCertificate;
use crate::proposer_selector::ProposerSelector;
use crate::types::{ConsensusRoundIdentifier, IbftBlock};
use crate::validation::{MessageValidatorFactory, RoundChangePayloadValidator};
use std::collections::HashSet;
use std::sync::Arc;

/// Validates NewRound messages: the proposer's justification for starting a
/// round above 0 and the proposal it carries.
#[derive(Clone)]
pub struct NewRoundMessageValidator {
    proposer_selector: Arc<ProposerSelector>,
    message_validator_factory: MessageValidatorFactory,
    round_change_payload_validator: RoundChangePayloadValidator,
    quorum: usize,
    chain_height: u64,
}

impl NewRoundMessageValidator {
    pub fn new(
        proposer_selector: Arc<ProposerSelector>,
        message_validator_factory: MessageValidatorFactory,
        quorum: usize,
        chain_height: u64,
    ) -> Self {
        let round_change_payload_validator = message_validator_factory.create_round_change_payload_validator();
        Self {
            proposer_selector,
            message_validator_factory,
            round_change_payload_validator,
            quorum,
            chain_height,
        }
    }

    pub fn validate_new_round_message(&self, msg: &NewRound) -> bool {
        let root_round_identifier = *msg.round_identifier();

        if msg.author() != self.proposer_selector.select_proposer_for_round(&root_round_identifier) {
            log::info!("Invalid NewRound message, did not originate from expected proposer.");
            return false;
        }

        if root_round_identifier.sequence_number != self.chain_height {
            log::info!(
                "Invalid NewRound message, not valid for local chain height {} (got {}).",
                self.chain_height,
                root_round_identifier.sequence_number
            );
            return false;
        }

        if root_round_identifier.round_number == 0 {
            log::info!("Invalid NewRound message, illegally targets a new round of 0.");
            return false;
        }

        let proposal = &msg.payload().proposal;
        let mut proposal_validator = self.message_validator_factory.create_message_validator(root_round_identifier);
        if !proposal_validator.add_signed_proposal_payload(proposal) {
            log::info!("Invalid NewRound message, embedded proposal failed validation.");
            return false;
        }

        if !self.validate_round_change_messages_and_ensure_target_round_matches_root(
            &root_round_identifier,
            msg.round_change_certificate(),
        ) {
            return false;
        }

        self.validate_proposal_message_matches_latest_prepare_certificate(
            msg.round_change_certificate(),
            &proposal.payload().block,
        )
    }

    fn validate_round_change_messages_and_ensure_target_round_matches_root(
        &self,
        expected_round: &ConsensusRoundIdentifier,
        certificate: &RoundChangeCertificate,
    ) -> bool {
        let round_changes = &certificate.round_changes;

        if round_changes.len() < self.quorum {
            log::info!(
                "Invalid NewRound message, RoundChange certificate has {} entries but a quorum is {}.",
                round_changes.len(),
                self.quorum
            );
            return false;
        }

        let distinct_authors: HashSet<_> = round_changes.iter().map(|rc| rc.author()).collect();
        if distinct_authors.len() != round_changes.len() {
            log::info!("Invalid NewRound message, RoundChange certificate contains duplicate authors.");
            return false;
        }

        if !round_changes.iter().all(|rc| rc.payload().round_identifier == *expected_round) {
            log::info!("Invalid NewRound message, not all embedded RoundChange messages have a matching target round.");
            return false;
        }

        for round_change in round_changes {
            if !self.round_change_payload_validator.validate_payload(round_change) {
                log::info!("Invalid NewRound message, embedded RoundChange message failed validation.");
                return false;
            }
        }

        true
    }

    fn validate_proposal_message_matches_latest_prepare_certificate(
        &self,
        certificate: &RoundChangeCertificate,
        proposed_block: &IbftBlock,
    ) -> bool {
        let Some(latest) = find_latest_prepared_certificate(&certificate.round_changes) else {
            log::debug!("No round change messages have a prepared certificate, any valid block may be proposed.");
            return true;
        };

        // The proposal carries the new round in its extra data; the certificate's
        // digest was computed with the round it was prepared in.
        let block_with_prepared_round = replace_round_in_block(proposed_block, latest.proposal_round());
        if block_with_prepared_round.hash() != latest.digest() {
            log::info!("Invalid NewRound message, block in latest RoundChange does not match proposed block.");
            return false;
        }

        true
    }
}
