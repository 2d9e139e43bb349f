// crates/neura-ibft/src/lib.rs

//! IBFT 2.0 consensus core.
//!
//! Validators agree, round by round, on the next block at each height. Inbound
//! messages are authenticated when decoded, validated against the round they
//! address, accumulated in a [`statemachine::RoundState`] and, once a quorum of
//! commits is reached, the sealed block is handed to the block importer.

pub mod config;
pub mod error;
pub mod events;
pub mod helpers;
pub mod messagedata;
pub mod messagewrappers;
pub mod network;
pub mod payload;
pub mod proposer_selector;
pub mod statemachine;
pub mod timers;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use config::IbftConfig;
pub use error::IbftError;
pub use types::{ConsensusRoundIdentifier, IbftBlock, IbftBlockHeader, SignedData};
