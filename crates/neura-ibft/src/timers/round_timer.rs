use super::TimerSlot;
use crate::config::IbftConfig;
use crate::events::{IbftEvent, IbftEventSender};
use crate::types::{ConsensusRoundIdentifier, RoundTimer};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, trace, warn};

/// Posts [`IbftEvent::RoundExpiry`] once the round has run for
/// `request_timeout_seconds * 2^round`.
#[derive(Debug)]
pub struct TokioRoundTimer {
    runtime: Handle,
    event_sender: IbftEventSender,
    config: Arc<IbftConfig>,
    slot: TimerSlot,
}

impl TokioRoundTimer {
    pub fn new(runtime: Handle, event_sender: IbftEventSender, config: Arc<IbftConfig>) -> Self {
        Self { runtime, event_sender, config, slot: TimerSlot::default() }
    }

    pub fn is_running(&self) -> bool {
        self.slot.is_running()
    }
}

impl RoundTimer for TokioRoundTimer {
    fn start_timer(&self, round: ConsensusRoundIdentifier) {
        let timeout = self.config.round_timeout_for(round.round_number);
        let event_sender = self.event_sender.clone();

        let task = self.runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            trace!(target: "consensus::ibft::timer", "Round timer expired for round {}", round);
            if let Err(e) = event_sender.add(IbftEvent::RoundExpiry(round)).await {
                warn!(target: "consensus::ibft::timer", "Failed to post round expiry for round {}: {}", round, e);
            }
        });
        self.slot.replace(task);
        debug!(target: "consensus::ibft::timer", "Started round timer for round {} with timeout {:?}", round, timeout);
    }

    fn cancel_timer(&self) {
        self.slot.cancel();
    }
}
