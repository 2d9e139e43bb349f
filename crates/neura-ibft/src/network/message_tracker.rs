use crate::messagewrappers::RawIbftMessage;
use alloy_primitives::B256;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Remembers the hashes of recently seen messages so duplicates delivered by
/// several peers are processed once.
#[derive(Debug)]
pub struct MessageTracker {
    seen_messages: LruCache<B256, ()>,
}

impl MessageTracker {
    pub fn new(message_tracking_limit: usize) -> Self {
        let capacity = NonZeroUsize::new(message_tracking_limit).unwrap_or(NonZeroUsize::MIN);
        Self { seen_messages: LruCache::new(capacity) }
    }

    pub fn add_seen_message(&mut self, message: &RawIbftMessage) {
        self.seen_messages.put(message.hash(), ());
    }

    pub fn has_seen_message(&mut self, message: &RawIbftMessage) -> bool {
        // `get` refreshes recency; a message that keeps arriving stays tracked.
        self.seen_messages.get(&message.hash()).is_some()
    }

    pub fn len(&self) -> usize {
        self.seen_messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen_messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messagedata::ibft_v2;
    use alloy_primitives::Bytes;

    fn raw(code: u8, data: &'static [u8]) -> RawIbftMessage {
        RawIbftMessage::new(code, Bytes::from_static(data))
    }

    #[test]
    fn tracks_seen_messages() {
        let mut tracker = MessageTracker::new(10);
        let msg = raw(ibft_v2::PREPARE, b"abc");

        assert!(!tracker.has_seen_message(&msg));
        tracker.add_seen_message(&msg);
        assert!(tracker.has_seen_message(&msg));
    }

    #[test]
    fn same_data_with_different_code_is_distinct() {
        let mut tracker = MessageTracker::new(10);
        tracker.add_seen_message(&raw(ibft_v2::PREPARE, b"abc"));
        assert!(!tracker.has_seen_message(&raw(ibft_v2::COMMIT, b"abc")));
    }

    #[test]
    fn evicts_least_recently_used_when_full() {
        let mut tracker = MessageTracker::new(2);
        let first = raw(ibft_v2::PROPOSAL, b"1");
        let second = raw(ibft_v2::PROPOSAL, b"2");
        let third = raw(ibft_v2::PROPOSAL, b"3");

        tracker.add_seen_message(&first);
        tracker.add_seen_message(&second);
        // Touch `first` so `second` becomes the eviction candidate.
        assert!(tracker.has_seen_message(&first));
        tracker.add_seen_message(&third);

        assert_eq!(tracker.len(), 2);
        assert!(tracker.has_seen_message(&first));
        assert!(!tracker.has_seen_message(&second));
        assert!(tracker.has_seen_message(&third));
    }

    #[test]
    fn zero_limit_still_tracks_latest_message() {
        let mut tracker = MessageTracker::new(0);
        let msg = raw(ibft_v2::COMMIT, b"x");
        tracker.add_seen_message(&msg);
        assert!(tracker.has_seen_message(&msg));
    }
}
