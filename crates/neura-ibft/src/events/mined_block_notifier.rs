use crate::types::IbftBlock;
use tokio::sync::broadcast;

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Publishes every block this node imports as the result of consensus.
///
/// Subscribers that fall behind lose the oldest blocks rather than slowing
/// the consensus loop.
#[derive(Debug, Clone)]
pub struct MinedBlockNotifier {
    sender: broadcast::Sender<IbftBlock>,
}

impl Default for MinedBlockNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl MinedBlockNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IbftBlock> {
        self.sender.subscribe()
    }

    pub fn notify(&self, block: &IbftBlock) {
        // No subscribers is not an error.
        if self.sender.send(block.clone()).is_err() {
            log::trace!("No subscribers for mined block {}", block.number());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
