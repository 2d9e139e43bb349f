// crates/neura-ibft/src/messagedata/mod.rs

pub mod ibft_v2;
