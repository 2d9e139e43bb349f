// crates/neura-ibft/src/network/mod.rs

pub mod gossip;
pub mod message_tracker;

pub use gossip::{Gossiper, IbftGossip};
pub use message_tracker::MessageTracker;
