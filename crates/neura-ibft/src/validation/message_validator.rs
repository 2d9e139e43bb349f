use crate::payload::{CommitPayload, IbftPayload, PreparePayload, ProposalPayload};
use crate::types::signed_data::recover_address;
use crate::types::{ConsensusRoundIdentifier, SignedData, ValidatorSet};
use crate::validation::ProposalBlockConsistencyChecker;
use alloy_primitives::Address;
use std::sync::Arc;

/// Validates the Proposal, Prepare and Commit messages of a single round.
///
/// The first proposal that passes validation is remembered; prepares and commits
/// are only valid against it. The validator is created per round and is owned by
/// that round's `RoundState`.
#[derive(Clone)]
pub struct MessageValidator {
    validators: Arc<ValidatorSet>,
    expected_proposer: Address,
    round_identifier: ConsensusRoundIdentifier,
    proposal_block_consistency_checker: ProposalBlockConsistencyChecker,
    proposal: Option<SignedData<ProposalPayload>>,
}

impl MessageValidator {
    pub fn new(
        validators: Arc<ValidatorSet>,
        expected_proposer: Address,
        round_identifier: ConsensusRoundIdentifier,
        proposal_block_consistency_checker: ProposalBlockConsistencyChecker,
    ) -> Self {
        Self { validators, expected_proposer, round_identifier, proposal_block_consistency_checker, proposal: None }
    }

    pub fn round_identifier(&self) -> &ConsensusRoundIdentifier {
        &self.round_identifier
    }

    /// Validates a proposal and, when it is the first valid one, remembers it.
    /// A repeat of the accepted proposal is accepted again; anything else is rejected.
    pub fn add_signed_proposal_payload(&mut self, msg: &SignedData<ProposalPayload>) -> bool {
        if let Some(accepted) = &self.proposal {
            return Self::handle_subsequent_proposal(accepted, msg);
        }

        if !self.validate_signed_proposal_payload(msg) {
            return false;
        }

        self.proposal = Some(msg.clone());
        true
    }

    fn handle_subsequent_proposal(accepted: &SignedData<ProposalPayload>, msg: &SignedData<ProposalPayload>) -> bool {
        if accepted.author() != msg.author() {
            log::info!("Received subsequent invalid Proposal message; sender differs from original.");
            return false;
        }

        let accepted_payload = accepted.payload();
        let payload = msg.payload();
        if accepted_payload.round_identifier != payload.round_identifier || accepted_payload.digest != payload.digest {
            log::info!("Received subsequent invalid Proposal message; content differs from original.");
            return false;
        }

        true
    }

    fn validate_signed_proposal_payload(&self, msg: &SignedData<ProposalPayload>) -> bool {
        if msg.payload().round_identifier != self.round_identifier {
            log::info!(
                "Invalid Proposal message, does not match current round {} (got {})",
                self.round_identifier,
                msg.payload().round_identifier
            );
            return false;
        }

        if msg.author() != self.expected_proposer {
            log::info!(
                "Invalid Proposal message, was not created by the proposer expected for round {} (author {:?}, expected {:?})",
                self.round_identifier,
                msg.author(),
                self.expected_proposer
            );
            return false;
        }

        self.proposal_block_consistency_checker.validate_proposal_matches_block(msg)
    }

    pub fn validate_prepare(&self, msg: &SignedData<PreparePayload>) -> bool {
        let Some(proposal) = &self.proposal else {
            log::info!("Unable to validate Prepare message. No Proposal exists against which to validate.");
            return false;
        };

        if msg.author() == self.expected_proposer {
            log::info!("Illegal Prepare message; was sent by the round's proposer.");
            return false;
        }

        self.validate_digest_match(proposal, msg, "Prepare", msg.payload().digest)
    }

    pub fn validate_commit(&self, msg: &SignedData<CommitPayload>) -> bool {
        let Some(proposal) = &self.proposal else {
            log::info!("Unable to validate Commit message. No Proposal exists against which to validate.");
            return false;
        };

        let proposed_hash = proposal.payload().digest;
        match recover_address(proposed_hash, &msg.payload().commit_seal) {
            Ok(seal_author) if seal_author == msg.author() => {}
            Ok(seal_author) => {
                log::info!(
                    "Invalid Commit message. Seal was not created by the message transmitter (seal {:?}, author {:?}).",
                    seal_author,
                    msg.author()
                );
                return false;
            }
            Err(e) => {
                log::info!("Invalid Commit message. Unable to recover the commit seal author: {}", e);
                return false;
            }
        }

        self.validate_digest_match(proposal, msg, "Commit", msg.payload().digest)
    }

    fn validate_digest_match<P: IbftPayload>(
        &self,
        proposal: &SignedData<ProposalPayload>,
        msg: &SignedData<P>,
        message_name: &str,
        digest: alloy_primitives::B256,
    ) -> bool {
        if !self.is_message_for_current_round(msg.payload().round_identifier()) {
            log::info!(
                "Invalid {} message, does not match current round {} (got {})",
                message_name,
                self.round_identifier,
                msg.payload().round_identifier()
            );
            return false;
        }

        if !self.validators.contains(&msg.author()) {
            log::info!("Invalid {} message, was not transmitted by a validator for the associated round.", message_name);
            return false;
        }

        if digest != proposal.payload().digest {
            log::info!("Illegal {} message, digest does not match the digest in the Proposal.", message_name);
            return false;
        }

        true
    }

    fn is_message_for_current_round(&self, round_identifier: &ConsensusRoundIdentifier) -> bool {
        *round_identifier == self.round_identifier
    }
}
