use std::collections::BTreeMap;

/// Holds messages for heights the node has not reached yet, so they can be
/// replayed when it gets there.
///
/// Only heights in `(chain_height, chain_height + max_distance]` are accepted and
/// at most `limit` messages are held in total. On overflow the most recently
/// added message at the highest buffered height is dropped first.
#[derive(Debug)]
pub struct FutureMessageBuffer<M> {
    buffer: BTreeMap<u64, Vec<M>>,
    max_distance: u64,
    limit: usize,
    chain_height: u64,
    total_messages: usize,
}

impl<M> FutureMessageBuffer<M> {
    pub fn new(max_distance: u64, limit: usize, chain_height: u64) -> Self {
        Self { buffer: BTreeMap::new(), max_distance, limit, chain_height, total_messages: 0 }
    }

    pub fn add_message(&mut self, msg_chain_height: u64, msg: M) {
        if self.limit == 0 || !self.is_valid_message_height(msg_chain_height) {
            return;
        }

        self.buffer.entry(msg_chain_height).or_default().push(msg);
        self.total_messages += 1;
        if self.total_messages > self.limit {
            self.evict_message();
        }
    }

    fn is_valid_message_height(&self, msg_chain_height: u64) -> bool {
        msg_chain_height > self.chain_height
            && msg_chain_height <= self.chain_height.saturating_add(self.max_distance)
    }

    fn evict_message(&mut self) {
        let Some(mut highest) = self.buffer.last_entry() else {
            return;
        };
        if highest.get_mut().pop().is_some() {
            self.total_messages -= 1;
        }
        if highest.get().is_empty() {
            highest.remove();
        }
    }

    /// Moves the buffer to `height`, returning its messages in arrival order and
    /// dropping everything at or below it.
    pub fn retrieve_messages_for_height(&mut self, height: u64) -> Vec<M> {
        self.chain_height = height;
        let messages = self.buffer.remove(&height).unwrap_or_default();
        self.buffer.retain(|buffered_height, _| *buffered_height > height);
        self.total_messages = self.buffer.values().map(Vec::len).sum();
        messages
    }

    pub fn total_messages_size(&self) -> usize {
        self.total_messages
    }

    pub fn chain_height(&self) -> u64 {
        self.chain_height
    }
}
