use crate::helpers::find_latest_prepared_certificate;
use crate::messagewrappers::RoundChange;
use crate::payload::RoundChangeCertificate;
use crate::types::{ConsensusRoundIdentifier, IbftBlock};
use crate::validation::RoundChangeMessageValidator;
use alloy_primitives::Address;
use std::collections::{BTreeMap, HashMap};

/// What a proposer needs to start a round entered through round change: the
/// certificate justifying it and the block it must re-propose, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundChangeArtifacts {
    round_change_certificate: RoundChangeCertificate,
    block: Option<IbftBlock>,
}

impl RoundChangeArtifacts {
    pub fn new(round_change_certificate: RoundChangeCertificate, block: Option<IbftBlock>) -> Self {
        Self { round_change_certificate, block }
    }

    pub fn round_change_certificate(&self) -> &RoundChangeCertificate {
        &self.round_change_certificate
    }

    /// The block of the prepared certificate with the highest proposal round.
    pub fn block(&self) -> Option<&IbftBlock> {
        self.block.as_ref()
    }

    pub fn create(round_changes: Vec<RoundChange>) -> Self {
        let payloads: Vec<_> = round_changes.iter().map(|rc| rc.signed_payload().clone()).collect();
        let block = find_latest_prepared_certificate(&payloads).map(|cert| cert.block().clone());
        Self::new(RoundChangeCertificate::new(payloads), block)
    }
}

/// The RoundChange messages received for one target round.
struct RoundChangeStatus {
    quorum: usize,
    received_messages: HashMap<Address, RoundChange>,
    actioned: bool,
}

impl RoundChangeStatus {
    fn new(quorum: usize) -> Self {
        Self { quorum, received_messages: HashMap::new(), actioned: false }
    }

    fn add_message(&mut self, msg: RoundChange) {
        if !self.actioned {
            self.received_messages.entry(msg.author()).or_insert(msg);
        }
    }

    fn round_change_ready(&self) -> bool {
        self.received_messages.len() >= self.quorum && !self.actioned
    }

    fn create_round_change_certificate(&mut self) -> Vec<RoundChange> {
        if !self.round_change_ready() {
            return Vec::new();
        }
        self.actioned = true;
        self.received_messages.values().cloned().collect()
    }
}

/// Collects RoundChange messages for one height and reports, once per target
/// round, when a quorum of validators wants to move to it.
pub struct RoundChangeManager {
    round_change_cache: BTreeMap<ConsensusRoundIdentifier, RoundChangeStatus>,
    quorum: usize,
    round_change_message_validator: RoundChangeMessageValidator,
}

impl RoundChangeManager {
    pub fn new(quorum: usize, round_change_message_validator: RoundChangeMessageValidator) -> Self {
        Self { round_change_cache: BTreeMap::new(), quorum, round_change_message_validator }
    }

    /// Returns artifacts only on the message that first brings the target round to quorum.
    pub fn append_round_change_message(&mut self, msg: RoundChange) -> Option<RoundChangeArtifacts> {
        if !self.round_change_message_validator.validate_message(&msg) {
            log::info!("RoundChange message was invalid.");
            return None;
        }

        let quorum = self.quorum;
        let status = self
            .round_change_cache
            .entry(*msg.round_identifier())
            .or_insert_with(|| RoundChangeStatus::new(quorum));
        status.add_message(msg);

        if status.round_change_ready() {
            return Some(RoundChangeArtifacts::create(status.create_round_change_certificate()));
        }
        None
    }

    /// Drops every cached target round earlier than `completed_round_identifier`.
    pub fn discard_rounds_prior_to(&mut self, completed_round_identifier: &ConsensusRoundIdentifier) {
        self.round_change_cache.retain(|round, _| round >= completed_round_identifier);
    }

    pub fn cached_round_count(&self) -> usize {
        self.round_change_cache.len()
    }
}
