use crate::messagewrappers::bft_message::BftMessage;
use crate::payload::PreparePayload;
use crate::types::SignedData;
use alloy_rlp::{BufMut, Decodable, Encodable};
use std::ops::Deref;

/// Represents an IBFT Prepare message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepare {
    inner: BftMessage<PreparePayload>,
}

impl Deref for Prepare {
    type Target = BftMessage<PreparePayload>;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Prepare {
    pub fn new(signed_payload: SignedData<PreparePayload>) -> Self {
        Self { inner: BftMessage::new(signed_payload) }
    }

    pub fn into_signed_payload(self) -> SignedData<PreparePayload> {
        self.inner.signed_payload
    }
}

impl Encodable for Prepare {
    fn encode(&self, out: &mut dyn BufMut) {
        self.inner.signed_payload.encode(out);
    }
    fn length(&self) -> usize {
        self.inner.signed_payload.length()
    }
}

impl Decodable for Prepare {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self::new(SignedData::<PreparePayload>::decode(buf)?))
    }
}
