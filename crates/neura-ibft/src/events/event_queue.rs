use crate::config::IbftConfig;
use crate::error::IbftError;
use crate::events::IbftEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{SendTimeoutError, TrySendError};

/// Producer side of the consensus event queue. Cheap to clone; timers, the
/// network layer and the chain observer each hold one.
#[derive(Debug, Clone)]
pub struct IbftEventSender {
    sender: mpsc::Sender<IbftEvent>,
    send_timeout: Duration,
}

impl IbftEventSender {
    /// Waits up to the configured send timeout for capacity.
    pub async fn add(&self, event: IbftEvent) -> Result<(), IbftError> {
        self.sender.send_timeout(event, self.send_timeout).await.map_err(|e| match e {
            SendTimeoutError::Timeout(_) => IbftError::EventQueueFull,
            SendTimeoutError::Closed(_) => IbftError::EventQueueClosed,
        })
    }

    pub fn try_add(&self, event: IbftEvent) -> Result<(), IbftError> {
        self.sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => IbftError::EventQueueFull,
            TrySendError::Closed(_) => IbftError::EventQueueClosed,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Consumer side, owned by the controller.
#[derive(Debug)]
pub struct IbftEventQueue {
    receiver: mpsc::Receiver<IbftEvent>,
}

impl IbftEventQueue {
    pub fn new(config: &IbftConfig) -> (IbftEventSender, IbftEventQueue) {
        Self::with_capacity(config.message_queue_limit, config.message_queue_send_timeout())
    }

    pub fn with_capacity(capacity: usize, send_timeout: Duration) -> (IbftEventSender, IbftEventQueue) {
        // tokio rejects a zero-capacity channel
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (IbftEventSender { sender, send_timeout }, IbftEventQueue { receiver })
    }

    /// Returns `None` once every sender is gone and the queue is drained.
    pub async fn poll(&mut self) -> Option<IbftEvent> {
        self.receiver.recv().await
    }

    pub fn try_poll(&mut self) -> Option<IbftEvent> {
        self.receiver.try_recv().ok()
    }

    pub fn size(&self) -> usize {
        self.receiver.len()
    }

    pub fn close(&mut self) {
        self.receiver.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConsensusRoundIdentifier;

    fn round_expiry(round: u32) -> IbftEvent {
        IbftEvent::RoundExpiry(ConsensusRoundIdentifier::new(1, round))
    }

    #[tokio::test]
    async fn events_are_delivered_in_order() {
        let (sender, mut queue) = IbftEventQueue::with_capacity(4, Duration::from_millis(10));
        sender.add(round_expiry(0)).await.unwrap();
        sender.try_add(round_expiry(1)).unwrap();

        assert_eq!(queue.size(), 2);
        assert_eq!(queue.poll().await, Some(round_expiry(0)));
        assert_eq!(queue.poll().await, Some(round_expiry(1)));
        assert_eq!(queue.try_poll(), None);
    }

    #[tokio::test]
    async fn full_queue_rejects_after_timeout() {
        let (sender, mut queue) = IbftEventQueue::with_capacity(1, Duration::from_millis(10));
        sender.add(round_expiry(0)).await.unwrap();

        assert_eq!(sender.try_add(round_expiry(1)), Err(IbftError::EventQueueFull));
        assert_eq!(sender.add(round_expiry(1)).await, Err(IbftError::EventQueueFull));

        // Draining frees capacity again.
        assert_eq!(queue.poll().await, Some(round_expiry(0)));
        assert_eq!(sender.add(round_expiry(2)).await, Ok(()));
    }

    #[tokio::test]
    async fn blocked_producer_proceeds_when_consumer_drains() {
        let (sender, mut queue) = IbftEventQueue::with_capacity(1, Duration::from_secs(5));
        sender.add(round_expiry(0)).await.unwrap();

        let producer = {
            let sender = sender.clone();
            tokio::spawn(async move { sender.add(round_expiry(1)).await })
        };
        assert_eq!(queue.poll().await, Some(round_expiry(0)));
        assert_eq!(producer.await.unwrap(), Ok(()));
        assert_eq!(queue.poll().await, Some(round_expiry(1)));
    }

    #[tokio::test]
    async fn closed_queue_reports_closed() {
        let (sender, queue) = IbftEventQueue::with_capacity(4, Duration::from_millis(10));
        drop(queue);

        assert!(sender.is_closed());
        assert_eq!(sender.try_add(round_expiry(0)), Err(IbftError::EventQueueClosed));
        assert_eq!(sender.add(round_expiry(0)).await, Err(IbftError::EventQueueClosed));
    }

    #[tokio::test]
    async fn queue_ends_when_all_senders_dropped() {
        let (sender, mut queue) = IbftEventQueue::with_capacity(4, Duration::from_millis(10));
        sender.try_add(round_expiry(3)).unwrap();
        drop(sender);

        assert_eq!(queue.poll().await, Some(round_expiry(3)));
        assert_eq!(queue.poll().await, None);
    }
}
