// crates/neura-ibft/src/proposer_selector.rs

use crate::types::{ConsensusRoundIdentifier, IbftBlockHeader, ValidatorSet};
use alloy_primitives::Address;
use std::sync::Arc;

/// Round-robin proposer rotation for one height.
///
/// Rotation starts at the validator following the parent block's proposer, and
/// every round moves one position further along the sorted validator list.
#[derive(Debug, Clone)]
pub struct ProposerSelector {
    validators: Arc<ValidatorSet>,
    base_index: usize,
}

impl ProposerSelector {
    pub fn new(validators: Arc<ValidatorSet>, parent_header: &IbftBlockHeader) -> Self {
        let previous_proposer = (parent_header.number != 0).then_some(parent_header.beneficiary);
        let base_index = calculate_base_index(&validators, previous_proposer);
        Self { validators, base_index }
    }

    pub fn select_proposer_for_round(&self, round_identifier: &ConsensusRoundIdentifier) -> Address {
        let validators = self.validators.as_slice();
        let index = (self.base_index + round_identifier.round_number as usize) % validators.len();
        validators[index]
    }

    pub fn is_local_node_proposer_for_round(&self, local_address: &Address, round: &ConsensusRoundIdentifier) -> bool {
        self.select_proposer_for_round(round) == *local_address
    }
}

/// Index of the first validator strictly after `previous_proposer`, wrapping to 0.
/// A proposer that has since left the set still anchors the rotation.
fn calculate_base_index(validators: &ValidatorSet, previous_proposer: Option<Address>) -> usize {
    match previous_proposer {
        None => 0,
        Some(previous) => validators.as_slice().partition_point(|v| *v <= previous) % validators.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::tests::common_helpers::create_parent_header;

    fn validators() -> Arc<ValidatorSet> {
        Arc::new(
            ValidatorSet::new(vec![Address::repeat_byte(0x10), Address::repeat_byte(0x20), Address::repeat_byte(0x30)])
                .unwrap(),
        )
    }

    #[test]
    fn genesis_parent_starts_at_first_validator() {
        let parent = create_parent_header(0, Address::repeat_byte(0x20));
        let selector = ProposerSelector::new(validators(), &parent);
        assert_eq!(selector.select_proposer_for_round(&ConsensusRoundIdentifier::new(1, 0)), Address::repeat_byte(0x10));
        assert_eq!(selector.select_proposer_for_round(&ConsensusRoundIdentifier::new(1, 1)), Address::repeat_byte(0x20));
    }

    #[test]
    fn rotation_follows_previous_proposer_and_round() {
        let parent = create_parent_header(5, Address::repeat_byte(0x20));
        let selector = ProposerSelector::new(validators(), &parent);
        let at = |round| selector.select_proposer_for_round(&ConsensusRoundIdentifier::new(6, round));

        assert_eq!(at(0), Address::repeat_byte(0x30));
        assert_eq!(at(1), Address::repeat_byte(0x10));
        assert_eq!(at(2), Address::repeat_byte(0x20));
        assert_eq!(at(3), Address::repeat_byte(0x30));
    }

    #[test]
    fn last_validator_wraps_to_first() {
        let parent = create_parent_header(5, Address::repeat_byte(0x30));
        let selector = ProposerSelector::new(validators(), &parent);
        assert_eq!(selector.select_proposer_for_round(&ConsensusRoundIdentifier::new(6, 0)), Address::repeat_byte(0x10));
    }

    #[test]
    fn removed_proposer_anchors_at_next_greater_validator() {
        let parent = create_parent_header(5, Address::repeat_byte(0x15));
        let selector = ProposerSelector::new(validators(), &parent);
        assert_eq!(selector.select_proposer_for_round(&ConsensusRoundIdentifier::new(6, 0)), Address::repeat_byte(0x20));

        let parent = create_parent_header(5, Address::repeat_byte(0x40));
        let selector = ProposerSelector::new(validators(), &parent);
        assert_eq!(selector.select_proposer_for_round(&ConsensusRoundIdentifier::new(6, 0)), Address::repeat_byte(0x10));
    }

    #[test]
    fn is_local_node_proposer() {
        let parent = create_parent_header(0, Address::ZERO);
        let selector = ProposerSelector::new(validators(), &parent);
        let round = ConsensusRoundIdentifier::new(1, 2);
        assert!(selector.is_local_node_proposer_for_round(&Address::repeat_byte(0x30), &round));
        assert!(!selector.is_local_node_proposer_for_round(&Address::repeat_byte(0x10), &round));
    }
}
