// crates/neura-ibft/src/validation/mod.rs

pub mod message_validator;
pub mod message_validator_factory;
pub mod new_round_message_validator;
pub mod proposal_block_consistency;
pub mod round_change_message_validator;
pub mod round_change_payload_validator;

#[cfg(test)]
pub(crate) mod tests;

pub use message_validator::MessageValidator;
pub use message_validator_factory::MessageValidatorFactory;
pub use new_round_message_validator::NewRoundMessageValidator;
pub use proposal_block_consistency::ProposalBlockConsistencyChecker;
pub use round_change_message_validator::RoundChangeMessageValidator;
pub use round_change_payload_validator::RoundChangePayloadValidator;
