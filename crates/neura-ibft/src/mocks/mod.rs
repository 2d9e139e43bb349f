// crates/neura-ibft/src/mocks/mod.rs

//! Test doubles for the collaborators the consensus core talks to.

pub mod mock_block_creator;
pub mod mock_services;
pub mod mock_timers;

pub use mock_block_creator::MockBlockCreator;
pub use mock_services::{
    AcceptAllBlockValidator, FixedValidatorSetProvider, RecordingBlockImporter, RecordingGossiper,
    RecordingMulticaster, RejectAllBlockValidator,
};
pub use mock_timers::{MockBlockTimer, MockRoundTimer};
