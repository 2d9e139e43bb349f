// crates/neura-ibft/src/types/mod.rs

pub mod block;
pub mod block_creator;
pub mod block_importer;
pub mod consensus_round_identifier;
pub mod extra_data;
pub mod header;
pub mod ibft_final_state;
pub mod rlp_signature;
pub mod signed_data;
pub mod validator_set;

pub type NodeKey = k256::ecdsa::SigningKey;

pub use block::{IbftBlock, Transaction};
pub use block_creator::BlockCreator;
pub use block_importer::BlockImporter;
pub use consensus_round_identifier::ConsensusRoundIdentifier;
pub use extra_data::{IbftExtraData, Vote};
pub use header::{IbftBlockHeader, EXPECTED_MIX_HASH};
pub use ibft_final_state::{
    BlockTimer, BlockValidator, IbftFinalState, RoundTimer, ValidatorMulticaster, ValidatorSetProvider,
};
pub use rlp_signature::RlpSignature;
pub use signed_data::SignedData;
pub use validator_set::ValidatorSet;
