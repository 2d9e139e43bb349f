use crate::payload::{PreparedCertificate, RoundChangePayload};
use crate::types::{ConsensusRoundIdentifier, SignedData, ValidatorSet};
use crate::validation::MessageValidatorFactory;
use std::collections::HashSet;
use std::sync::Arc;

/// Validates a signed round-change payload, including any prepared certificate it carries.
#[derive(Clone)]
pub struct RoundChangePayloadValidator {
    message_validator_factory: MessageValidatorFactory,
    validators: Arc<ValidatorSet>,
    minimum_prepare_messages_in_certificate: usize,
    chain_height: u64,
}

impl RoundChangePayloadValidator {
    pub fn new(
        message_validator_factory: MessageValidatorFactory,
        validators: Arc<ValidatorSet>,
        minimum_prepare_messages_in_certificate: usize,
        chain_height: u64,
    ) -> Self {
        Self { message_validator_factory, validators, minimum_prepare_messages_in_certificate, chain_height }
    }

    pub fn validate_payload(&self, msg: &SignedData<RoundChangePayload>) -> bool {
        if !self.validators.contains(&msg.author()) {
            log::info!("Invalid RoundChange message, was not transmitted by a validator for the associated round.");
            return false;
        }

        let target_round = msg.payload().round_identifier;
        if target_round.sequence_number != self.chain_height {
            log::info!(
                "Invalid RoundChange message, not valid for local chain height {} (targets {}).",
                self.chain_height,
                target_round
            );
            return false;
        }

        match &msg.payload().prepared_certificate {
            Some(certificate) => self.validate_prepared_certificate(certificate, &target_round),
            None => true,
        }
    }

    fn validate_prepared_certificate(
        &self,
        certificate: &PreparedCertificate,
        round_change_target: &ConsensusRoundIdentifier,
    ) -> bool {
        let proposal_round = certificate.proposal.payload().round_identifier;

        if proposal_round.sequence_number != round_change_target.sequence_number {
            log::info!("Invalid RoundChange message, PreparedCertificate is not for local chain height.");
            return false;
        }

        if proposal_round.round_number >= round_change_target.round_number {
            log::info!(
                "Invalid RoundChange message, PreparedCertificate round {} is not older than the target round {}.",
                proposal_round.round_number,
                round_change_target.round_number
            );
            return false;
        }

        self.validate_consistency_of_prepare_certificate_messages(certificate, proposal_round)
    }

    fn validate_consistency_of_prepare_certificate_messages(
        &self,
        certificate: &PreparedCertificate,
        proposal_round: ConsensusRoundIdentifier,
    ) -> bool {
        let mut message_validator = self.message_validator_factory.create_message_validator(proposal_round);

        if !message_validator.add_signed_proposal_payload(&certificate.proposal) {
            log::info!("Invalid RoundChange message, embedded Proposal message failed validation.");
            return false;
        }

        if certificate.prepares.len() < self.minimum_prepare_messages_in_certificate {
            log::info!(
                "Invalid RoundChange message, insufficient Prepare messages exist to justify prepare certificate ({} < {}).",
                certificate.prepares.len(),
                self.minimum_prepare_messages_in_certificate
            );
            return false;
        }

        let mut authors = HashSet::with_capacity(certificate.prepares.len());
        for prepare in &certificate.prepares {
            if !message_validator.validate_prepare(prepare) {
                log::info!("Invalid RoundChange message, embedded Prepare message failed validation.");
                return false;
            }
            if !authors.insert(prepare.author()) {
                log::info!("Invalid RoundChange message, PreparedCertificate holds two Prepares from {:?}.", prepare.author());
                return false;
            }
        }

        true
    }
}
