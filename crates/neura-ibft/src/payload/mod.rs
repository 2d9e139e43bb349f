// crates/neura-ibft/src/payload/mod.rs

pub mod commit_payload;
pub mod ibft_payload;
pub mod message_factory;
pub mod new_round_payload;
pub mod prepare_payload;
pub mod prepared_certificate;
pub mod proposal_payload;
pub mod round_change_certificate;
pub mod round_change_payload;

pub use commit_payload::CommitPayload;
pub use ibft_payload::IbftPayload;
pub use message_factory::MessageFactory;
pub use new_round_payload::NewRoundPayload;
pub use prepare_payload::PreparePayload;
pub use prepared_certificate::PreparedCertificate;
pub use proposal_payload::ProposalPayload;
pub use round_change_certificate::RoundChangeCertificate;
pub use round_change_payload::RoundChangePayload;
