//! Fixtures wiring a validator's node-wide state out of recording mocks.

pub use crate::validation::tests::common_helpers::*;

use crate::config::IbftConfig;
use crate::events::MinedBlockNotifier;
use crate::messagewrappers::{IbftMessage, Proposal};
use crate::mocks::{
    AcceptAllBlockValidator, FixedValidatorSetProvider, MockBlockCreator, MockBlockTimer, MockRoundTimer,
    RecordingBlockImporter, RecordingGossiper, RecordingMulticaster,
};
use crate::statemachine::{IbftBlockHeightManager, IbftController, RoundState};
use crate::types::{ConsensusRoundIdentifier, IbftBlockHeader, IbftFinalState, NodeKey};
use std::sync::Arc;

pub const BLOCK_PERIOD_SECONDS: u64 = 1;

/// One validator's collaborators, all observable from the test.
pub struct TestNode {
    pub final_state: Arc<IbftFinalState>,
    pub multicaster: RecordingMulticaster,
    pub importer: RecordingBlockImporter,
    pub round_timer: MockRoundTimer,
    pub block_timer: MockBlockTimer,
    pub gossiper: RecordingGossiper,
    pub block_creator: Arc<MockBlockCreator>,
    pub validator_provider: FixedValidatorSetProvider,
    pub mined_block_notifier: MinedBlockNotifier,
}

impl TestNode {
    pub fn new(tv: &TestValidators, index: usize) -> Self {
        Self::with_key(tv, tv.keys[index].clone())
    }

    pub fn with_key(tv: &TestValidators, node_key: Arc<NodeKey>) -> Self {
        let validators = tv.validators.as_slice().to_vec();
        let multicaster = RecordingMulticaster::new();
        let importer = RecordingBlockImporter::new();
        let round_timer = MockRoundTimer::new();
        let block_timer = MockBlockTimer::new(BLOCK_PERIOD_SECONDS);
        let mined_block_notifier = MinedBlockNotifier::default();
        let block_creator = Arc::new(MockBlockCreator::new(address_from_key(&node_key), validators.clone()));
        let validator_provider = FixedValidatorSetProvider::new(validators);

        let final_state = Arc::new(IbftFinalState::new(
            node_key,
            block_creator.clone(),
            Arc::new(importer.clone()),
            Arc::new(AcceptAllBlockValidator),
            Arc::new(multicaster.clone()),
            Arc::new(round_timer.clone()),
            Arc::new(block_timer.clone()),
            Arc::new(validator_provider.clone()),
            mined_block_notifier.clone(),
            Arc::new(IbftConfig { block_period_seconds: BLOCK_PERIOD_SECONDS, ..Default::default() }),
        ));

        Self {
            final_state,
            multicaster,
            importer,
            round_timer,
            block_timer,
            gossiper: RecordingGossiper::default(),
            block_creator,
            validator_provider,
            mined_block_notifier,
        }
    }

    /// A manager for height 1 on top of the fixture's genesis header.
    pub fn height_manager(&self, tv: &TestValidators) -> IbftBlockHeightManager {
        IbftBlockHeightManager::new(
            Arc::new(tv.parent_header.clone()),
            self.final_state.clone(),
            tv.validator_factory.clone(),
        )
    }

    pub fn controller(&self, chain_head: IbftBlockHeader) -> IbftController {
        IbftController::new(self.final_state.clone(), chain_head, Arc::new(self.gossiper.clone()))
    }
}

pub fn round_state(tv: &TestValidators, round: ConsensusRoundIdentifier) -> RoundState {
    RoundState::new(round, tv.validator_factory.create_message_validator(round), tv.validators.quorum_size())
}

/// The round's proposal, signed by its proposer, for the fixture block.
pub fn proposal_for_round(tv: &TestValidators, round: &ConsensusRoundIdentifier) -> Proposal {
    Proposal::new(tv.signed_proposal(round, tv.block_for_round(round)))
}

pub fn message_types(messages: &[IbftMessage]) -> Vec<u8> {
    messages.iter().map(IbftMessage::message_type).collect()
}
