use super::TimerSlot;
use crate::config::IbftConfig;
use crate::events::{IbftEvent, IbftEventSender};
use crate::types::{BlockTimer, ConsensusRoundIdentifier, IbftBlockHeader};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::runtime::Handle;
use tracing::{debug, warn};

fn now_millis() -> u64 {
    let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX)
}

/// Posts [`IbftEvent::BlockTimerExpiry`] once a block period has passed since
/// the parent block, or straight away if it already has.
#[derive(Debug)]
pub struct TokioBlockTimer {
    runtime: Handle,
    event_sender: IbftEventSender,
    config: Arc<IbftConfig>,
    slot: TimerSlot,
}

impl TokioBlockTimer {
    pub fn new(runtime: Handle, event_sender: IbftEventSender, config: Arc<IbftConfig>) -> Self {
        Self { runtime, event_sender, config, slot: TimerSlot::default() }
    }

    pub fn is_running(&self) -> bool {
        self.slot.is_running()
    }
}

impl BlockTimer for TokioBlockTimer {
    fn start_timer(&self, round: ConsensusRoundIdentifier, parent_header: &IbftBlockHeader) {
        let expiry_seconds = parent_header.timestamp.saturating_add(self.config.block_period_seconds);
        let delay = Duration::from_millis(expiry_seconds.saturating_mul(1000).saturating_sub(now_millis()));
        let event_sender = self.event_sender.clone();

        let task = self.runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if let Err(e) = event_sender.add(IbftEvent::BlockTimerExpiry(round)).await {
                warn!(target: "consensus::ibft::timer", "Failed to post block timer expiry for round {}: {}", round, e);
            }
        });
        self.slot.replace(task);
        debug!(target: "consensus::ibft::timer", "Started block timer for round {}, fires in {:?}", round, delay);
    }

    fn cancel_timer(&self) {
        self.slot.cancel();
    }

    fn get_timestamp_for_future_block(&self, _round: &ConsensusRoundIdentifier, parent_timestamp_seconds: u64) -> u64 {
        let earliest = parent_timestamp_seconds.saturating_add(self.config.block_period_seconds);
        earliest.max(now_millis() / 1000)
    }
}
