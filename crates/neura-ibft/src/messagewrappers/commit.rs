use crate::messagewrappers::bft_message::BftMessage;
use crate::payload::CommitPayload;
use crate::types::{RlpSignature, SignedData};
use alloy_rlp::{BufMut, Decodable, Encodable};
use std::ops::Deref;

/// Represents an IBFT Commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    inner: BftMessage<CommitPayload>,
}

impl Deref for Commit {
    type Target = BftMessage<CommitPayload>;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Commit {
    pub fn new(signed_payload: SignedData<CommitPayload>) -> Self {
        Self { inner: BftMessage::new(signed_payload) }
    }

    pub fn commit_seal(&self) -> RlpSignature {
        self.payload().commit_seal
    }
}

impl Encodable for Commit {
    fn encode(&self, out: &mut dyn BufMut) {
        self.inner.signed_payload.encode(out);
    }
    fn length(&self) -> usize {
        self.inner.signed_payload.length()
    }
}

impl Decodable for Commit {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self::new(SignedData::<CommitPayload>::decode(buf)?))
    }
}
