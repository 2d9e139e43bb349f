use crate::error::IbftError;
use crate::events::{IbftEvent, IbftEventQueue};
use crate::messagewrappers::{IbftMessage, RawIbftMessage};
use crate::network::{Gossiper, IbftGossip, MessageTracker};
use crate::statemachine::block_height_manager::BlockHeightManager;
use crate::statemachine::block_height_manager_factory::IbftBlockHeightManagerFactory;
use crate::statemachine::future_message_buffer::FutureMessageBuffer;
use crate::types::{ConsensusRoundIdentifier, IbftBlock, IbftBlockHeader, IbftFinalState};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// Single consumer of the consensus event queue. Owns the manager for the
/// current height and everything that decides which height a message is for.
pub struct IbftController {
    height_manager_factory: IbftBlockHeightManagerFactory,
    current_height_manager: Option<Box<dyn BlockHeightManager>>,
    initial_chain_head: Arc<IbftBlockHeader>,
    future_message_buffer: FutureMessageBuffer<IbftMessage>,
    duplicate_message_tracker: MessageTracker,
    gossip: IbftGossip,
}

impl IbftController {
    pub fn new(final_state: Arc<IbftFinalState>, chain_head: IbftBlockHeader, gossiper: Arc<dyn Gossiper>) -> Self {
        let config = final_state.config().clone();
        // Anchored at the chain head so the first height is held until start().
        let future_message_buffer = FutureMessageBuffer::new(
            config.future_messages_max_distance,
            config.future_messages_limit,
            chain_head.number,
        );

        Self {
            height_manager_factory: IbftBlockHeightManagerFactory::new(final_state),
            current_height_manager: None,
            initial_chain_head: Arc::new(chain_head),
            future_message_buffer,
            duplicate_message_tracker: MessageTracker::new(config.duplicate_message_limit),
            gossip: IbftGossip::new(gossiper, config.gossiped_history_limit),
        }
    }

    /// Begins consensus on the height after the chain head given at construction.
    pub fn start(&mut self) -> Result<(), IbftError> {
        if self.current_height_manager.is_some() {
            return Ok(());
        }
        let chain_head = self.initial_chain_head.clone();
        self.start_new_height_manager(chain_head)
    }

    pub fn current_height(&self) -> Option<u64> {
        self.current_height_manager.as_ref().map(|manager| manager.chain_height())
    }

    pub fn current_round(&self) -> Option<ConsensusRoundIdentifier> {
        self.current_height_manager.as_ref().and_then(|manager| manager.current_round_identifier())
    }

    pub fn future_message_count(&self) -> usize {
        self.future_message_buffer.total_messages_size()
    }

    /// Consumes events until every sender has been dropped. Errors are logged
    /// and never end the loop.
    pub async fn run(&mut self, mut events: IbftEventQueue) {
        if let Err(e) = self.start() {
            error!(target: "consensus::ibft", "Failed to start consensus: {}", e);
        }

        while let Some(event) = events.poll().await {
            let event_name = event.name();
            if let Err(e) = self.handle_event(event) {
                warn!(target: "consensus::ibft", "Error handling {} event: {}", event_name, e);
            }
        }
        info!(target: "consensus::ibft", "Consensus event queue closed, stopping controller");
    }

    pub fn handle_event(&mut self, event: IbftEvent) -> Result<(), IbftError> {
        match event {
            IbftEvent::MessageReceived(raw) => self.handle_message_event(raw),
            IbftEvent::NewChainHead(header) => self.handle_new_block_event(header),
            IbftEvent::BlockTimerExpiry(round) => {
                self.handle_timer_for_current_height(round, "block timer", |manager, round| {
                    manager.handle_block_timer_expiry(round)
                })
            }
            IbftEvent::RoundExpiry(round) => {
                self.handle_timer_for_current_height(round, "round", |manager, round| manager.round_expired(round))
            }
        }
    }

    fn handle_message_event(&mut self, raw: RawIbftMessage) -> Result<(), IbftError> {
        if self.duplicate_message_tracker.has_seen_message(&raw) {
            trace!(target: "consensus::ibft", "Discarding duplicate message {}", raw);
            return Ok(());
        }
        self.duplicate_message_tracker.add_seen_message(&raw);

        let message = match IbftMessage::decode(&raw) {
            Ok(message) => message,
            Err(e) if e.is_discardable_input() => {
                debug!(target: "consensus::ibft", "Discarding undecodable message {}: {}", raw, e);
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        self.consume_message(message)
    }

    fn consume_message(&mut self, message: IbftMessage) -> Result<(), IbftError> {
        let round = message.round_identifier();
        let Some(current_height) = self.current_height() else {
            self.future_message_buffer.add_message(round.sequence_number, message);
            return Ok(());
        };

        match round.sequence_number.cmp(&current_height) {
            Ordering::Equal => {
                let from_validator = self
                    .current_height_manager
                    .as_ref()
                    .is_some_and(|manager| manager.is_known_validator(&message.author()));
                if !from_validator {
                    trace!(target: "consensus::ibft", "Discarding message from {:?}, not a known validator (or local node is not one)", message.author());
                    return Ok(());
                }

                self.gossip.relay(&message.to_raw());
                let imported = self.dispatch_to_height_manager(message)?;
                self.handle_imported_block(imported)
            }
            Ordering::Greater => {
                trace!(target: "consensus::ibft", "Buffering message for future height {}", round.sequence_number);
                self.future_message_buffer.add_message(round.sequence_number, message);
                Ok(())
            }
            Ordering::Less => {
                trace!(target: "consensus::ibft", "Discarding message from previous height {}", round.sequence_number);
                Ok(())
            }
        }
    }

    fn dispatch_to_height_manager(&mut self, message: IbftMessage) -> Result<Option<IbftBlock>, IbftError> {
        let manager = self
            .current_height_manager
            .as_mut()
            .ok_or_else(|| IbftError::InvalidState("controller has not been started".to_string()))?;

        match message {
            IbftMessage::Proposal(msg) => manager.handle_proposal_payload(msg),
            IbftMessage::Prepare(msg) => manager.handle_prepare_payload(msg),
            IbftMessage::Commit(msg) => manager.handle_commit_payload(msg),
            IbftMessage::RoundChange(msg) => manager.handle_round_change_payload(msg),
            IbftMessage::NewRound(msg) => manager.handle_new_round_payload(msg),
        }
    }

    fn handle_timer_for_current_height(
        &mut self,
        round: ConsensusRoundIdentifier,
        timer_name: &str,
        on_expiry: impl FnOnce(&mut dyn BlockHeightManager, &ConsensusRoundIdentifier) -> Result<Option<IbftBlock>, IbftError>,
    ) -> Result<(), IbftError> {
        let Some(manager) = self.current_height_manager.as_mut() else {
            return Ok(());
        };
        if round.sequence_number != manager.chain_height() {
            trace!(target: "consensus::ibft", "Ignoring {} expiry for round {}, not the current height", timer_name, round);
            return Ok(());
        }

        let imported = on_expiry(manager.as_mut(), &round)?;
        self.handle_imported_block(imported)
    }

    fn handle_new_block_event(&mut self, header: IbftBlockHeader) -> Result<(), IbftError> {
        if let Some(current_height) = self.current_height() {
            if header.number < current_height {
                trace!(target: "consensus::ibft", "Discarding new chain head {}, already working on height {}", header.number, current_height);
                return Ok(());
            }
        }
        info!(target: "consensus::ibft", "New chain head {} ({:?}), starting next height", header.number, header.hash());
        self.start_new_height_manager(Arc::new(header))
    }

    fn handle_imported_block(&mut self, imported: Option<IbftBlock>) -> Result<(), IbftError> {
        match imported {
            Some(block) => {
                info!(target: "consensus::ibft", "Imported block {} ({:?}), moving to next height", block.number(), block.hash());
                self.start_new_height_manager(Arc::new(block.header))
            }
            None => Ok(()),
        }
    }

    fn start_new_height_manager(&mut self, parent_header: Arc<IbftBlockHeader>) -> Result<(), IbftError> {
        let mut manager = self.height_manager_factory.create(parent_header)?;
        manager.start();
        let new_height = manager.chain_height();
        self.current_height_manager = Some(manager);
        debug!(target: "consensus::ibft", "Started height manager for height {}", new_height);

        for message in self.future_message_buffer.retrieve_messages_for_height(new_height) {
            if let Err(e) = self.consume_message(message) {
                warn!(target: "consensus::ibft", "Error replaying buffered message for height {}: {}", new_height, e);
            }
        }
        Ok(())
    }
}
