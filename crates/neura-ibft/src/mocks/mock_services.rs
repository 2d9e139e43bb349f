use crate::error::IbftError;
use crate::messagewrappers::{Commit, IbftMessage, NewRound, Prepare, Proposal, RawIbftMessage, RoundChange};
use crate::network::Gossiper;
use crate::types::{BlockImporter, BlockValidator, IbftBlock, IbftBlockHeader, ValidatorMulticaster, ValidatorSetProvider};
use alloy_primitives::Address;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

// --- Block validators ---
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAllBlockValidator;

impl BlockValidator for AcceptAllBlockValidator {
    fn validate_block(&self, _block: &IbftBlock) -> bool {
        true
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RejectAllBlockValidator;

impl BlockValidator for RejectAllBlockValidator {
    fn validate_block(&self, _block: &IbftBlock) -> bool {
        false
    }
}

// --- RecordingMulticaster ---
/// Records every multicast message in send order.
#[derive(Debug, Default, Clone)]
pub struct RecordingMulticaster {
    messages: Arc<Mutex<Vec<IbftMessage>>>,
}

impl RecordingMulticaster {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn messages(&self) -> Vec<IbftMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Removes and returns everything recorded so far.
    pub fn take_messages(&self) -> Vec<IbftMessage> {
        std::mem::take(&mut *self.messages.lock().unwrap())
    }

    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
    }

    pub fn proposals(&self) -> Vec<Proposal> {
        self.filter(|m| match m {
            IbftMessage::Proposal(p) => Some(p.clone()),
            _ => None,
        })
    }

    pub fn prepares(&self) -> Vec<Prepare> {
        self.filter(|m| match m {
            IbftMessage::Prepare(p) => Some(p.clone()),
            _ => None,
        })
    }

    pub fn commits(&self) -> Vec<Commit> {
        self.filter(|m| match m {
            IbftMessage::Commit(c) => Some(c.clone()),
            _ => None,
        })
    }

    pub fn round_changes(&self) -> Vec<RoundChange> {
        self.filter(|m| match m {
            IbftMessage::RoundChange(rc) => Some(rc.clone()),
            _ => None,
        })
    }

    pub fn new_rounds(&self) -> Vec<NewRound> {
        self.filter(|m| match m {
            IbftMessage::NewRound(nr) => Some(nr.clone()),
            _ => None,
        })
    }

    fn filter<T>(&self, pick: impl Fn(&IbftMessage) -> Option<T>) -> Vec<T> {
        self.messages.lock().unwrap().iter().filter_map(pick).collect()
    }

    fn record(&self, message: IbftMessage) {
        log::debug!("RecordingMulticaster: Multicasting {} for round {}", message.message_type(), message.round_identifier());
        self.messages.lock().unwrap().push(message);
    }
}

impl ValidatorMulticaster for RecordingMulticaster {
    fn multicast_proposal(&self, proposal: &Proposal) {
        self.record(proposal.clone().into());
    }

    fn multicast_prepare(&self, prepare: &Prepare) {
        self.record(prepare.clone().into());
    }

    fn multicast_commit(&self, commit: &Commit) {
        self.record(commit.clone().into());
    }

    fn multicast_round_change(&self, round_change: &RoundChange) {
        self.record(round_change.clone().into());
    }

    fn multicast_new_round(&self, new_round: &NewRound) {
        self.record(new_round.clone().into());
    }
}

// --- RecordingGossiper ---
#[derive(Debug, Default, Clone)]
pub struct RecordingGossiper {
    sent: Arc<Mutex<Vec<RawIbftMessage>>>,
}

impl RecordingGossiper {
    pub fn sent(&self) -> Vec<RawIbftMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Gossiper for RecordingGossiper {
    fn send(&self, message: &RawIbftMessage) {
        self.sent.lock().unwrap().push(message.clone());
    }
}

// --- RecordingBlockImporter ---
#[derive(Debug, Default, Clone)]
pub struct RecordingBlockImporter {
    imported_blocks: Arc<Mutex<Vec<IbftBlock>>>,
    fail_on_import: Arc<AtomicBool>,
}

impl RecordingBlockImporter {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn imported_blocks(&self) -> Vec<IbftBlock> {
        self.imported_blocks.lock().unwrap().clone()
    }

    pub fn last_imported_block(&self) -> Option<IbftBlock> {
        self.imported_blocks.lock().unwrap().last().cloned()
    }

    pub fn set_fail_on_import(&self, fail: bool) {
        self.fail_on_import.store(fail, Ordering::SeqCst);
    }
}

impl BlockImporter for RecordingBlockImporter {
    fn import_block(&self, block: &IbftBlock) -> Result<(), IbftError> {
        if self.fail_on_import.load(Ordering::SeqCst) {
            return Err(IbftError::BlockImportFailed(format!("mock importer rejected block {}", block.number())));
        }
        log::info!("RecordingBlockImporter: Importing block {} (Hash: {:?})", block.number(), block.hash());
        self.imported_blocks.lock().unwrap().push(block.clone());
        Ok(())
    }
}

// --- FixedValidatorSetProvider ---
/// The same validators at every height, or none at all once made unavailable.
#[derive(Debug, Clone)]
pub struct FixedValidatorSetProvider {
    validators: Vec<Address>,
    unavailable: Arc<AtomicBool>,
}

impl FixedValidatorSetProvider {
    pub fn new(validators: Vec<Address>) -> Self {
        Self { validators, unavailable: Arc::new(AtomicBool::new(false)) }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl ValidatorSetProvider for FixedValidatorSetProvider {
    fn validators_after_block(&self, parent_header: &IbftBlockHeader) -> Result<Vec<Address>, IbftError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(IbftError::ValidatorSetUnavailable(format!("no vote tally after block {}", parent_header.number)));
        }
        Ok(self.validators.clone())
    }
}
