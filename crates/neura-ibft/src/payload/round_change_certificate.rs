use crate::payload::RoundChangePayload;
use crate::types::SignedData;
use alloy_rlp::{RlpDecodable, RlpEncodable};

/// A quorum of round-change payloads justifying a NewRound.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct RoundChangeCertificate {
    pub round_changes: Vec<SignedData<RoundChangePayload>>,
}

impl RoundChangeCertificate {
    pub fn new(round_changes: Vec<SignedData<RoundChangePayload>>) -> Self {
        Self { round_changes }
    }
}
