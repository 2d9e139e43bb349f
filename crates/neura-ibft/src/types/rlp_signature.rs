use alloy_primitives::{Signature, U256};
use alloy_rlp::{BufMut, Decodable, Encodable, Error as RlpError, Header};

/// Encoded size of a recoverable signature: `r(32) || s(32) || v(1)`.
pub const SIGNATURE_LENGTH: usize = 65;

/// A wrapper around alloy_primitives::Signature carried on the wire as a single
/// 65-byte RLP string `r || s || v`, where v is the recovery id (0 or 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RlpSignature(pub Signature);

impl RlpSignature {
    pub fn new(signature: Signature) -> Self {
        Self(signature)
    }

    pub fn into_inner(self) -> Signature {
        self.0
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(&self.0.r().to_be_bytes::<32>());
        bytes[32..64].copy_from_slice(&self.0.s().to_be_bytes::<32>());
        bytes[64] = u8::from(self.0.v());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RlpError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(RlpError::Custom("RlpSignature must be 65 bytes"));
        }
        let y_parity = match bytes[64] {
            0 => false,
            1 => true,
            _ => return Err(RlpError::Custom("Invalid recovery id for RlpSignature")),
        };
        let r = U256::from_be_slice(&bytes[..32]);
        let s = U256::from_be_slice(&bytes[32..64]);
        Ok(RlpSignature(Signature::new(r, s, y_parity)))
    }
}

impl std::ops::Deref for RlpSignature {
    type Target = Signature;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Encodable for RlpSignature {
    fn encode(&self, out: &mut dyn BufMut) {
        self.to_bytes().as_slice().encode(out);
    }

    fn length(&self) -> usize {
        Header { list: false, payload_length: SIGNATURE_LENGTH }.length() + SIGNATURE_LENGTH
    }
}

impl Decodable for RlpSignature {
    fn decode(buf: &mut &[u8]) -> Result<Self, RlpError> {
        let bytes = Header::decode_bytes(buf, false)?;
        Self::from_bytes(bytes)
    }
}

impl From<Signature> for RlpSignature {
    fn from(sig: Signature) -> Self {
        RlpSignature(sig)
    }
}

impl From<RlpSignature> for Signature {
    fn from(rlp_sig: RlpSignature) -> Self {
        rlp_sig.0
    }
}
