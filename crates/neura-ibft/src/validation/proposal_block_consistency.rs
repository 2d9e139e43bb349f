use crate::payload::ProposalPayload;
use crate::types::{BlockValidator, SignedData};
use std::sync::Arc;

/// Checks that a proposal's block is the block the payload claims, and that the
/// block itself is acceptable to the chain.
#[derive(Clone)]
pub struct ProposalBlockConsistencyChecker {
    block_validator: Arc<dyn BlockValidator>,
}

impl ProposalBlockConsistencyChecker {
    pub fn new(block_validator: Arc<dyn BlockValidator>) -> Self {
        Self { block_validator }
    }

    pub fn validate_proposal_matches_block(&self, signed_proposal: &SignedData<ProposalPayload>) -> bool {
        let payload = signed_proposal.payload();
        let block = &payload.block;
        let block_hash = block.hash();

        if block_hash != payload.digest {
            log::info!(
                "Invalid Proposal message, block hash {:?} does not match proposal digest {:?}",
                block_hash,
                payload.digest
            );
            return false;
        }

        if block.header.round() != payload.round_identifier.round_number {
            log::info!(
                "Invalid Proposal message, block round {} does not match proposal round {}",
                block.header.round(),
                payload.round_identifier.round_number
            );
            return false;
        }

        if block.number() != payload.round_identifier.sequence_number {
            log::info!(
                "Invalid Proposal message, block number {} does not match proposal sequence {}",
                block.number(),
                payload.round_identifier.sequence_number
            );
            return false;
        }

        if !self.block_validator.validate_block(block) {
            log::info!("Invalid Proposal message, block {:?} did not pass block validation", block_hash);
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::replace_round_in_block;
    use crate::mocks::{AcceptAllBlockValidator, RejectAllBlockValidator};
    use crate::payload::MessageFactory;
    use crate::types::ConsensusRoundIdentifier;
    use crate::validation::tests::common_helpers::{create_block, deterministic_node_key};

    fn checker() -> ProposalBlockConsistencyChecker {
        ProposalBlockConsistencyChecker::new(Arc::new(AcceptAllBlockValidator))
    }

    #[test]
    fn consistent_proposal_is_accepted() {
        let factory = MessageFactory::new(Arc::new(deterministic_node_key(1)));
        let signed = factory
            .create_signed_proposal_payload(ConsensusRoundIdentifier::new(3, 1), create_block(3, 1))
            .unwrap();
        assert!(checker().validate_proposal_matches_block(&signed));
    }

    #[test]
    fn round_number_and_rejection_are_checked() {
        let factory = MessageFactory::new(Arc::new(deterministic_node_key(1)));

        let wrong_round = factory
            .create_signed_proposal_payload(ConsensusRoundIdentifier::new(3, 1), create_block(3, 2))
            .unwrap();
        assert!(!checker().validate_proposal_matches_block(&wrong_round));

        let wrong_number = factory
            .create_signed_proposal_payload(ConsensusRoundIdentifier::new(3, 1), create_block(4, 1))
            .unwrap();
        assert!(!checker().validate_proposal_matches_block(&wrong_number));

        let good = factory
            .create_signed_proposal_payload(ConsensusRoundIdentifier::new(3, 1), create_block(3, 1))
            .unwrap();
        let rejecting = ProposalBlockConsistencyChecker::new(Arc::new(RejectAllBlockValidator));
        assert!(!rejecting.validate_proposal_matches_block(&good));
    }

    #[test]
    fn digest_must_match_block_hash() {
        let key = deterministic_node_key(1);
        let block = create_block(3, 1);
        let mut payload = ProposalPayload::new(ConsensusRoundIdentifier::new(3, 1), block.clone());
        payload.digest = replace_round_in_block(&block, 0).hash();
        let signed = SignedData::sign(payload, &key).unwrap();
        assert!(!checker().validate_proposal_matches_block(&signed));
    }
}
