use crate::messagewrappers::bft_message::BftMessage;
use crate::payload::{PreparedCertificate, RoundChangePayload};
use crate::types::{IbftBlock, SignedData};
use alloy_rlp::{BufMut, Decodable, Encodable};
use std::ops::Deref;

/// Represents an IBFT RoundChange message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundChange {
    inner: BftMessage<RoundChangePayload>,
}

impl Deref for RoundChange {
    type Target = BftMessage<RoundChangePayload>;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl RoundChange {
    pub fn new(signed_payload: SignedData<RoundChangePayload>) -> Self {
        Self { inner: BftMessage::new(signed_payload) }
    }

    pub fn prepared_certificate(&self) -> Option<&PreparedCertificate> {
        self.payload().prepared_certificate.as_ref()
    }

    /// The block this author prepared earlier in the height, if any.
    pub fn prepared_block(&self) -> Option<&IbftBlock> {
        self.prepared_certificate().map(PreparedCertificate::block)
    }
}

impl Encodable for RoundChange {
    fn encode(&self, out: &mut dyn BufMut) {
        self.inner.signed_payload.encode(out);
    }
    fn length(&self) -> usize {
        self.inner.signed_payload.length()
    }
}

impl Decodable for RoundChange {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self::new(SignedData::<RoundChangePayload>::decode(buf)?))
    }
}
