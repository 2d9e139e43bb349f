use crate::error::IbftError;
use crate::types::RlpSignature;
use alloy_primitives::{Address, Bytes, B256};
use alloy_rlp::{BufMut, Decodable, Encodable, Error as RlpError, Header};

/// Length of the vanity prefix at the start of IBFT extra data.
pub const EXTRA_VANITY_LENGTH: usize = 32;

pub const ADD_VOTE: u8 = 0xFF;
pub const DROP_VOTE: u8 = 0x00;

/// A validator-set change vote cast by the block proposer.
///
/// Wire layout: `RLP_LIST[recipient, vote_type]`, the vote type written as a raw
/// one-byte string (a drop vote is `0x00`, not the empty string).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vote {
    pub recipient: Address,
    pub vote_type: u8,
}

impl Vote {
    pub fn add(recipient: Address) -> Self {
        Self { recipient, vote_type: ADD_VOTE }
    }

    pub fn drop(recipient: Address) -> Self {
        Self { recipient, vote_type: DROP_VOTE }
    }

    fn rlp_payload_length(&self) -> usize {
        self.recipient.length() + [self.vote_type].as_slice().length()
    }
}

impl Encodable for Vote {
    fn encode(&self, out: &mut dyn BufMut) {
        Header { list: true, payload_length: self.rlp_payload_length() }.encode(out);
        self.recipient.encode(out);
        [self.vote_type].as_slice().encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.rlp_payload_length();
        Header { list: true, payload_length }.length() + payload_length
    }
}

fn decode_vote_type(buf: &mut &[u8]) -> alloy_rlp::Result<u8> {
    match Header::decode_bytes(buf, false)? {
        [vote_type] => Ok(*vote_type),
        _ => Err(RlpError::Custom("IbftExtraData vote type must be a single byte")),
    }
}

/// The structured contents of an IBFT block header's extra-data field.
///
/// Wire layout: `RLP_LIST[vanity(32), [validators], vote | [], round(4 bytes BE), [seals]]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IbftExtraData {
    pub vanity_data: B256,
    pub validators: Vec<Address>,
    pub vote: Option<Vote>,
    pub round: u32,
    pub seals: Vec<RlpSignature>,
}

impl IbftExtraData {
    pub fn new(vanity_data: B256, validators: Vec<Address>, vote: Option<Vote>, round: u32) -> Self {
        Self { vanity_data, validators, vote, round, seals: Vec::new() }
    }

    /// The same extra data without commit seals, as covered by the block hash.
    pub fn without_seals(&self) -> Self {
        Self { seals: Vec::new(), ..self.clone() }
    }

    pub fn with_round(&self, round: u32) -> Self {
        Self { round, ..self.clone() }
    }

    pub fn with_seals(&self, seals: Vec<RlpSignature>) -> Self {
        Self { seals, ..self.clone() }
    }

    pub fn encode_to_bytes(&self) -> Bytes {
        let mut out = Vec::with_capacity(self.length());
        self.encode(&mut out);
        Bytes::from(out)
    }

    pub fn decode_from_bytes(bytes: &[u8]) -> Result<Self, IbftError> {
        let mut buf = bytes;
        let decoded = Self::decode(&mut buf)
            .map_err(|e| IbftError::RlpDecodingError(format!("IbftExtraData: {}", e)))?;
        if !buf.is_empty() {
            return Err(IbftError::RlpDecodingError("IbftExtraData: trailing bytes".into()));
        }
        Ok(decoded)
    }

    fn vote_length(&self) -> usize {
        match &self.vote {
            Some(vote) => vote.length(),
            None => Header { list: true, payload_length: 0 }.length(),
        }
    }

    fn rlp_payload_length(&self) -> usize {
        self.vanity_data.length()
            + self.validators.length()
            + self.vote_length()
            + self.round.to_be_bytes().as_slice().length()
            + self.seals.length()
    }
}

impl Encodable for IbftExtraData {
    fn encode(&self, out: &mut dyn BufMut) {
        Header { list: true, payload_length: self.rlp_payload_length() }.encode(out);
        self.vanity_data.encode(out);
        self.validators.encode(out);
        match &self.vote {
            Some(vote) => vote.encode(out),
            None => Header { list: true, payload_length: 0 }.encode(out),
        }
        self.round.to_be_bytes().as_slice().encode(out);
        self.seals.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.rlp_payload_length();
        Header { list: true, payload_length }.length() + payload_length
    }
}

impl Decodable for IbftExtraData {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(RlpError::Custom("IbftExtraData RLP must be a list"));
        }
        let remaining_before = buf.len();

        let vanity_data = B256::decode(buf)?;
        let validators = Vec::<Address>::decode(buf)?;

        let vote_header = Header::decode(buf)?;
        if !vote_header.list {
            return Err(RlpError::Custom("IbftExtraData vote must be a list"));
        }
        let vote = if vote_header.payload_length == 0 {
            None
        } else {
            let vote_start = buf.len();
            let recipient = Address::decode(buf)?;
            let vote_type = decode_vote_type(buf)?;
            if vote_start - buf.len() != vote_header.payload_length {
                return Err(RlpError::UnexpectedLength);
            }
            if vote_type != ADD_VOTE && vote_type != DROP_VOTE {
                return Err(RlpError::Custom("IbftExtraData vote type must be 0x00 or 0xFF"));
            }
            Some(Vote { recipient, vote_type })
        };

        let round_bytes = Header::decode_bytes(buf, false)?;
        let round_array: [u8; 4] = round_bytes
            .try_into()
            .map_err(|_| RlpError::Custom("IbftExtraData round must be 4 bytes"))?;
        let seals = Vec::<RlpSignature>::decode(buf)?;

        if remaining_before - buf.len() != header.payload_length {
            return Err(RlpError::UnexpectedLength);
        }
        Ok(Self { vanity_data, validators, vote, round: u32::from_be_bytes(round_array), seals })
    }
}
