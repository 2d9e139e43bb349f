// crates/neura-ibft/src/statemachine/mod.rs

pub mod block_height_manager;
pub mod block_height_manager_factory;
pub mod future_message_buffer;
pub mod ibft_controller;
pub mod ibft_round;
pub mod no_op_block_height_manager;
pub mod round_change_manager;
pub mod round_state;

#[cfg(test)]
mod tests;

pub use block_height_manager::{BlockHeightManager, IbftBlockHeightManager};
pub use block_height_manager_factory::IbftBlockHeightManagerFactory;
pub use future_message_buffer::FutureMessageBuffer;
pub use ibft_controller::IbftController;
pub use ibft_round::IbftRound;
pub use no_op_block_height_manager::NoOpBlockHeightManager;
pub use round_change_manager::{RoundChangeArtifacts, RoundChangeManager};
pub use round_state::{PreparedRoundArtifacts, RoundState};
