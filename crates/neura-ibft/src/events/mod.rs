// crates/neura-ibft/src/events/mod.rs

pub mod event_queue;
pub mod ibft_event;
pub mod mined_block_notifier;

pub use event_queue::{IbftEventQueue, IbftEventSender};
pub use ibft_event::IbftEvent;
pub use mined_block_notifier::MinedBlockNotifier;
