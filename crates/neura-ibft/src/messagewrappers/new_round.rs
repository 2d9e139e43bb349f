use crate::messagewrappers::bft_message::BftMessage;
use crate::messagewrappers::Proposal;
use crate::payload::{NewRoundPayload, RoundChangeCertificate};
use crate::types::SignedData;
use alloy_rlp::{BufMut, Decodable, Encodable};
use std::ops::Deref;

/// Represents an IBFT NewRound message: the proposal for a round entered via
/// round change, justified by a round-change certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRound {
    inner: BftMessage<NewRoundPayload>,
}

impl Deref for NewRound {
    type Target = BftMessage<NewRoundPayload>;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl NewRound {
    pub fn new(signed_payload: SignedData<NewRoundPayload>) -> Self {
        Self { inner: BftMessage::new(signed_payload) }
    }

    pub fn round_change_certificate(&self) -> &RoundChangeCertificate {
        &self.payload().round_change_certificate
    }

    /// The embedded proposal as a standalone message.
    pub fn proposal(&self) -> Proposal {
        Proposal::new(self.payload().proposal.clone())
    }
}

impl Encodable for NewRound {
    fn encode(&self, out: &mut dyn BufMut) {
        self.inner.signed_payload.encode(out);
    }
    fn length(&self) -> usize {
        self.inner.signed_payload.length()
    }
}

impl Decodable for NewRound {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self::new(SignedData::<NewRoundPayload>::decode(buf)?))
    }
}
