use crate::messagewrappers::RawIbftMessage;
use alloy_primitives::B256;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Transport used to relay a received message to the rest of the network.
pub trait Gossiper: Send + Sync {
    fn send(&self, message: &RawIbftMessage);
}

/// Relays consensus messages, each at most once.
pub struct IbftGossip {
    gossiper: Arc<dyn Gossiper>,
    gossiped_history: LruCache<B256, ()>,
}

impl IbftGossip {
    pub fn new(gossiper: Arc<dyn Gossiper>, gossiped_history_limit: usize) -> Self {
        let capacity = NonZeroUsize::new(gossiped_history_limit).unwrap_or(NonZeroUsize::MIN);
        Self { gossiper, gossiped_history: LruCache::new(capacity) }
    }

    /// Returns false when the message was already relayed.
    pub fn relay(&mut self, message: &RawIbftMessage) -> bool {
        let hash = message.hash();
        if self.gossiped_history.contains(&hash) {
            return false;
        }
        self.gossiped_history.put(hash, ());
        self.gossiper.send(message);
        true
    }
}
