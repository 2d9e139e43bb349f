// crates/neura-ibft/src/messagewrappers/mod.rs

pub mod bft_message;
pub mod commit;
pub mod ibft_message;
pub mod new_round;
pub mod prepare;
pub mod proposal;
pub mod round_change;

pub use bft_message::BftMessage;
pub use commit::Commit;
pub use ibft_message::{IbftMessage, RawIbftMessage};
pub use new_round::NewRound;
pub use prepare::Prepare;
pub use proposal::Proposal;
pub use round_change::RoundChange;
