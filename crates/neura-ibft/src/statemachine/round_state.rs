use crate::helpers::prepare_message_count_for_quorum;
use crate::messagewrappers::{Commit, Prepare, Proposal};
use crate::payload::PreparedCertificate;
use crate::types::{ConsensusRoundIdentifier, IbftBlock, RlpSignature};
use crate::validation::MessageValidator;
use alloy_primitives::Address;
use std::collections::HashMap;

/// The proposal and prepares that made a round prepared, kept so a later
/// RoundChange can carry them forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRoundArtifacts {
    proposal: Proposal,
    prepares: Vec<Prepare>,
}

impl PreparedRoundArtifacts {
    pub fn new(proposal: Proposal, prepares: Vec<Prepare>) -> Self {
        Self { proposal, prepares }
    }

    pub fn block(&self) -> &IbftBlock {
        self.proposal.block()
    }

    pub fn prepared_certificate(&self) -> PreparedCertificate {
        PreparedCertificate::new(
            self.proposal.signed_payload().clone(),
            self.prepares.iter().map(|p| p.signed_payload().clone()).collect(),
        )
    }
}

/// Accumulates the messages of one round.
///
/// Prepares and commits that arrive before the proposal are kept unvalidated and
/// re-checked once a proposal is accepted.
pub struct RoundState {
    round_identifier: ConsensusRoundIdentifier,
    validator: MessageValidator,
    quorum: usize,

    proposal: Option<Proposal>,
    prepare_messages: HashMap<Address, Prepare>,
    commit_messages: HashMap<Address, Commit>,

    prepared: bool,
    committed: bool,
}

impl RoundState {
    pub fn new(round_identifier: ConsensusRoundIdentifier, validator: MessageValidator, quorum: usize) -> Self {
        Self {
            round_identifier,
            validator,
            quorum,
            proposal: None,
            prepare_messages: HashMap::new(),
            commit_messages: HashMap::new(),
            prepared: false,
            committed: false,
        }
    }

    pub fn round_identifier(&self) -> &ConsensusRoundIdentifier {
        &self.round_identifier
    }

    /// Returns true only when this call accepted the proposal.
    pub fn set_proposed_block(&mut self, msg: &Proposal) -> bool {
        if self.proposal.is_some() {
            return false;
        }
        if !self.validator.add_signed_proposal_payload(msg.signed_payload()) {
            return false;
        }

        self.proposal = Some(msg.clone());
        let validator = &self.validator;
        self.prepare_messages.retain(|_, prepare| validator.validate_prepare(prepare.signed_payload()));
        self.commit_messages.retain(|_, commit| validator.validate_commit(commit.signed_payload()));
        self.update_state();
        true
    }

    pub fn add_prepare_message(&mut self, msg: Prepare) {
        if self.proposal.is_none() || self.validator.validate_prepare(msg.signed_payload()) {
            self.prepare_messages.entry(msg.author()).or_insert(msg);
        }
        self.update_state();
    }

    pub fn add_commit_message(&mut self, msg: Commit) {
        if self.proposal.is_none() || self.validator.validate_commit(msg.signed_payload()) {
            self.commit_messages.entry(msg.author()).or_insert(msg);
        }
        self.update_state();
    }

    fn update_state(&mut self) {
        // The proposal counts as the proposer's prepare.
        self.prepared = self.proposal.is_some()
            && self.prepare_messages.len() >= prepare_message_count_for_quorum(self.quorum);
        self.committed = self.proposal.is_some() && self.commit_messages.len() >= self.quorum;
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn proposed_block(&self) -> Option<&IbftBlock> {
        self.proposal.as_ref().map(|p| p.block())
    }

    pub fn proposal_message(&self) -> Option<&Proposal> {
        self.proposal.as_ref()
    }

    pub fn commit_seals(&self) -> Vec<RlpSignature> {
        self.commit_messages.values().map(|commit| commit.commit_seal()).collect()
    }

    pub fn construct_prepared_round_artifacts(&self) -> Option<PreparedRoundArtifacts> {
        if !self.prepared {
            return None;
        }
        let proposal = self.proposal.clone()?;
        Some(PreparedRoundArtifacts::new(proposal, self.prepare_messages.values().cloned().collect()))
    }
}
