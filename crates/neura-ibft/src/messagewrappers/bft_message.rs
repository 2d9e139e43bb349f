use crate::payload::IbftPayload;
use crate::types::{ConsensusRoundIdentifier, SignedData};
use alloy_primitives::{Address, Bytes};
use alloy_rlp::Encodable;

/// Generic BFT message wrapper around an authenticated signed payload.
///
/// The wire form of every concrete message is the RLP of its `SignedData`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BftMessage<P: IbftPayload> {
    pub signed_payload: SignedData<P>,
}

impl<P: IbftPayload> BftMessage<P> {
    pub fn new(signed_payload: SignedData<P>) -> Self {
        Self { signed_payload }
    }

    pub fn author(&self) -> Address {
        self.signed_payload.author()
    }

    pub fn payload(&self) -> &P {
        self.signed_payload.payload()
    }

    pub fn signed_payload(&self) -> &SignedData<P> {
        &self.signed_payload
    }

    pub fn round_identifier(&self) -> &ConsensusRoundIdentifier {
        self.payload().round_identifier()
    }

    pub fn message_type(&self) -> u8 {
        self.payload().message_type()
    }

    pub fn encode_to_bytes(&self) -> Bytes {
        let mut out = Vec::with_capacity(self.signed_payload.length());
        self.signed_payload.encode(&mut out);
        out.into()
    }
}
