use crate::messagewrappers::bft_message::BftMessage;
use crate::payload::ProposalPayload;
use crate::types::{IbftBlock, SignedData};
use alloy_rlp::{BufMut, Decodable, Encodable};
use std::ops::Deref;

/// Represents an IBFT Proposal message. The proposed block travels inside the signed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    inner: BftMessage<ProposalPayload>,
}

impl Deref for Proposal {
    type Target = BftMessage<ProposalPayload>;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Proposal {
    pub fn new(signed_payload: SignedData<ProposalPayload>) -> Self {
        Self { inner: BftMessage::new(signed_payload) }
    }

    pub fn block(&self) -> &IbftBlock {
        &self.payload().block
    }
}

impl Encodable for Proposal {
    fn encode(&self, out: &mut dyn BufMut) {
        self.inner.signed_payload.encode(out);
    }
    fn length(&self) -> usize {
        self.inner.signed_payload.length()
    }
}

impl Decodable for Proposal {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self::new(SignedData::<ProposalPayload>::decode(buf)?))
    }
}
