use crate::types::{BlockTimer, ConsensusRoundIdentifier, IbftBlockHeader, RoundTimer};
use std::sync::{Arc, Mutex};

// --- MockRoundTimer ---
/// Remembers the rounds it was started for; tests fire expiries by hand.
#[derive(Debug, Default, Clone)]
pub struct MockRoundTimer {
    started: Arc<Mutex<Vec<ConsensusRoundIdentifier>>>,
    active: Arc<Mutex<Option<ConsensusRoundIdentifier>>>,
}

impl MockRoundTimer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn started_rounds(&self) -> Vec<ConsensusRoundIdentifier> {
        self.started.lock().unwrap().clone()
    }

    pub fn active_round(&self) -> Option<ConsensusRoundIdentifier> {
        *self.active.lock().unwrap()
    }
}

impl RoundTimer for MockRoundTimer {
    fn start_timer(&self, round: ConsensusRoundIdentifier) {
        log::debug!("MockRoundTimer: Starting timer for round {}", round);
        self.started.lock().unwrap().push(round);
        *self.active.lock().unwrap() = Some(round);
    }

    fn cancel_timer(&self) {
        *self.active.lock().unwrap() = None;
    }
}

// --- MockBlockTimer ---
#[derive(Debug, Default, Clone)]
pub struct MockBlockTimer {
    block_period_seconds: u64,
    started: Arc<Mutex<Vec<ConsensusRoundIdentifier>>>,
    active: Arc<Mutex<Option<ConsensusRoundIdentifier>>>,
}

impl MockBlockTimer {
    pub fn new(block_period_seconds: u64) -> Self {
        Self { block_period_seconds, ..Default::default() }
    }

    pub fn started_rounds(&self) -> Vec<ConsensusRoundIdentifier> {
        self.started.lock().unwrap().clone()
    }

    pub fn active_round(&self) -> Option<ConsensusRoundIdentifier> {
        *self.active.lock().unwrap()
    }
}

impl BlockTimer for MockBlockTimer {
    fn start_timer(&self, round: ConsensusRoundIdentifier, _parent_header: &IbftBlockHeader) {
        log::debug!("MockBlockTimer: Starting timer for round {}", round);
        self.started.lock().unwrap().push(round);
        *self.active.lock().unwrap() = Some(round);
    }

    fn cancel_timer(&self) {
        *self.active.lock().unwrap() = None;
    }

    /// Deterministic: exactly one block period after the parent.
    fn get_timestamp_for_future_block(&self, _round: &ConsensusRoundIdentifier, parent_timestamp_seconds: u64) -> u64 {
        parent_timestamp_seconds + self.block_period_seconds
    }
}
