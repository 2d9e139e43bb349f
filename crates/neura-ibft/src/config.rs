use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const DEFAULT_EPOCH_LENGTH: u64 = 30_000;
const DEFAULT_BLOCK_PERIOD_SECONDS: u64 = 1;
const DEFAULT_ROUND_EXPIRY_SECONDS: u64 = 1;
const DEFAULT_GOSSIPED_HISTORY_LIMIT: usize = 1000;
const DEFAULT_MESSAGE_QUEUE_LIMIT: usize = 1000;
const DEFAULT_DUPLICATE_MESSAGE_LIMIT: usize = 100;
const DEFAULT_FUTURE_MESSAGES_LIMIT: usize = 1000;
const DEFAULT_FUTURE_MESSAGES_MAX_DISTANCE: u64 = 10;
const DEFAULT_MESSAGE_QUEUE_SEND_TIMEOUT_MS: u64 = 1000;

/// Upper bound on the round timer backoff exponent.
const MAX_ROUND_TIMEOUT_EXPONENT: u32 = 20;

/// Configuration for the IBFT consensus engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IbftConfig {
    /// Number of blocks after which pending validator votes are reset.
    /// Consumed by the validator-set provider.
    pub epoch_length: u64,
    /// Minimum interval between a parent block and its child.
    pub block_period_seconds: u64,
    /// Base duration of the round timer; doubled for every round.
    pub request_timeout_seconds: u64,
    /// Number of relayed message hashes remembered to avoid re-gossip.
    pub gossiped_history_limit: usize,
    /// Capacity of the consensus event queue.
    pub message_queue_limit: usize,
    /// Number of message hashes remembered by the duplicate tracker.
    pub duplicate_message_limit: usize,
    /// Total number of messages held for future heights.
    pub future_messages_limit: usize,
    /// How far ahead of the current height (or round) a message may be and still be buffered.
    pub future_messages_max_distance: u64,
    /// How long a producer waits for queue capacity before giving up.
    pub message_queue_send_timeout_ms: u64,
}

impl Default for IbftConfig {
    fn default() -> Self {
        Self {
            epoch_length: DEFAULT_EPOCH_LENGTH,
            block_period_seconds: DEFAULT_BLOCK_PERIOD_SECONDS,
            request_timeout_seconds: DEFAULT_ROUND_EXPIRY_SECONDS,
            gossiped_history_limit: DEFAULT_GOSSIPED_HISTORY_LIMIT,
            message_queue_limit: DEFAULT_MESSAGE_QUEUE_LIMIT,
            duplicate_message_limit: DEFAULT_DUPLICATE_MESSAGE_LIMIT,
            future_messages_limit: DEFAULT_FUTURE_MESSAGES_LIMIT,
            future_messages_max_distance: DEFAULT_FUTURE_MESSAGES_MAX_DISTANCE,
            message_queue_send_timeout_ms: DEFAULT_MESSAGE_QUEUE_SEND_TIMEOUT_MS,
        }
    }
}

impl IbftConfig {
    /// Round timer duration: `request_timeout_seconds * 2^round`.
    pub fn round_timeout_for(&self, round_number: u32) -> Duration {
        let exponent = round_number.min(MAX_ROUND_TIMEOUT_EXPONENT);
        let base_ms = self.request_timeout_seconds.saturating_mul(1000);
        Duration::from_millis(base_ms.saturating_mul(1u64 << exponent))
    }

    pub fn block_period(&self) -> Duration {
        Duration::from_secs(self.block_period_seconds)
    }

    pub fn message_queue_send_timeout(&self) -> Duration {
        Duration::from_millis(self.message_queue_send_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = IbftConfig::default();
        assert_eq!(config.epoch_length, 30_000);
        assert_eq!(config.block_period_seconds, 1);
        assert_eq!(config.request_timeout_seconds, 1);
        assert_eq!(config.gossiped_history_limit, 1000);
        assert_eq!(config.message_queue_limit, 1000);
        assert_eq!(config.duplicate_message_limit, 100);
        assert_eq!(config.future_messages_limit, 1000);
        assert_eq!(config.future_messages_max_distance, 10);
    }

    #[test]
    fn round_timeout_doubles_per_round() {
        let config = IbftConfig { request_timeout_seconds: 2, ..Default::default() };
        assert_eq!(config.round_timeout_for(0), Duration::from_secs(2));
        assert_eq!(config.round_timeout_for(1), Duration::from_secs(4));
        assert_eq!(config.round_timeout_for(3), Duration::from_secs(16));
        // Very large rounds are capped rather than overflowing.
        assert_eq!(config.round_timeout_for(u32::MAX), config.round_timeout_for(MAX_ROUND_TIMEOUT_EXPONENT));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_partial_config_with_defaults() {
        let config: IbftConfig =
            serde_json::from_str(r#"{"block_period_seconds": 5, "future_messages_max_distance": 3}"#)
                .expect("valid config");
        assert_eq!(config.block_period_seconds, 5);
        assert_eq!(config.future_messages_max_distance, 3);
        assert_eq!(config.duplicate_message_limit, 100);
    }
}
