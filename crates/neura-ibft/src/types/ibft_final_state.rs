use crate::config::IbftConfig;
use crate::error::IbftError;
use crate::events::MinedBlockNotifier;
use crate::messagewrappers::{Commit, NewRound, Prepare, Proposal, RoundChange};
use crate::payload::MessageFactory;
use crate::types::{
    BlockCreator, BlockImporter, ConsensusRoundIdentifier, IbftBlock, IbftBlockHeader, NodeKey,
};
use alloy_primitives::Address;
use std::sync::Arc;

/// Fires once per round, unless cancelled, to trigger a local round change.
pub trait RoundTimer: Send + Sync {
    /// Arms the timer for `round`, replacing any timer already running.
    fn start_timer(&self, round: ConsensusRoundIdentifier);
    fn cancel_timer(&self);
}

/// Paces proposal creation to the configured block period.
pub trait BlockTimer: Send + Sync {
    fn start_timer(&self, round: ConsensusRoundIdentifier, parent_header: &IbftBlockHeader);
    fn cancel_timer(&self);
    fn get_timestamp_for_future_block(&self, round: &ConsensusRoundIdentifier, parent_timestamp_seconds: u64) -> u64;
}

/// Sends locally created messages to the other validators.
pub trait ValidatorMulticaster: Send + Sync {
    fn multicast_proposal(&self, proposal: &Proposal);
    fn multicast_prepare(&self, prepare: &Prepare);
    fn multicast_commit(&self, commit: &Commit);
    fn multicast_round_change(&self, round_change: &RoundChange);
    fn multicast_new_round(&self, new_round: &NewRound);
}

/// Vote-tally view of the chain.
pub trait ValidatorSetProvider: Send + Sync {
    /// The validators in force for the block built on top of `parent_header`.
    fn validators_after_block(&self, parent_header: &IbftBlockHeader) -> Result<Vec<Address>, IbftError>;
}

/// Semantic validation of a proposed block (header rules, execution).
pub trait BlockValidator: Send + Sync {
    fn validate_block(&self, block: &IbftBlock) -> bool;
}

/// Node-wide dependencies shared by every height this node takes part in.
pub struct IbftFinalState {
    node_key: Arc<NodeKey>,
    local_address: Address,
    message_factory: Arc<MessageFactory>,
    block_creator: Arc<dyn BlockCreator>,
    block_importer: Arc<dyn BlockImporter>,
    block_validator: Arc<dyn BlockValidator>,
    validator_multicaster: Arc<dyn ValidatorMulticaster>,
    round_timer: Arc<dyn RoundTimer>,
    block_timer: Arc<dyn BlockTimer>,
    validator_set_provider: Arc<dyn ValidatorSetProvider>,
    mined_block_notifier: MinedBlockNotifier,
    config: Arc<IbftConfig>,
}

impl IbftFinalState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        node_key: Arc<NodeKey>,
        block_creator: Arc<dyn BlockCreator>,
        block_importer: Arc<dyn BlockImporter>,
        block_validator: Arc<dyn BlockValidator>,
        validator_multicaster: Arc<dyn ValidatorMulticaster>,
        round_timer: Arc<dyn RoundTimer>,
        block_timer: Arc<dyn BlockTimer>,
        validator_set_provider: Arc<dyn ValidatorSetProvider>,
        mined_block_notifier: MinedBlockNotifier,
        config: Arc<IbftConfig>,
    ) -> Self {
        let message_factory = Arc::new(MessageFactory::new(node_key.clone()));
        Self {
            local_address: message_factory.local_address(),
            node_key,
            message_factory,
            block_creator,
            block_importer,
            block_validator,
            validator_multicaster,
            round_timer,
            block_timer,
            validator_set_provider,
            mined_block_notifier,
            config,
        }
    }

    pub fn node_key(&self) -> Arc<NodeKey> {
        self.node_key.clone()
    }

    pub fn local_address(&self) -> Address {
        self.local_address
    }

    pub fn message_factory(&self) -> &Arc<MessageFactory> {
        &self.message_factory
    }

    pub fn block_creator(&self) -> &Arc<dyn BlockCreator> {
        &self.block_creator
    }

    pub fn block_importer(&self) -> &Arc<dyn BlockImporter> {
        &self.block_importer
    }

    pub fn block_validator(&self) -> &Arc<dyn BlockValidator> {
        &self.block_validator
    }

    pub fn validator_multicaster(&self) -> &Arc<dyn ValidatorMulticaster> {
        &self.validator_multicaster
    }

    pub fn round_timer(&self) -> &Arc<dyn RoundTimer> {
        &self.round_timer
    }

    pub fn block_timer(&self) -> &Arc<dyn BlockTimer> {
        &self.block_timer
    }

    pub fn validator_set_provider(&self) -> &Arc<dyn ValidatorSetProvider> {
        &self.validator_set_provider
    }

    pub fn mined_block_notifier(&self) -> &MinedBlockNotifier {
        &self.mined_block_notifier
    }

    pub fn config(&self) -> &Arc<IbftConfig> {
        &self.config
    }
}
