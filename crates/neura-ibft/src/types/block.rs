use crate::types::header::IbftBlockHeader;
use alloy_primitives::{Bytes, B256 as Hash};
use alloy_rlp::{BufMut, Decodable, Encodable, Error as RlpError, Header as RlpHeader, RlpDecodable, RlpEncodable};

/// An opaque, already-encoded transaction. Execution is the block creator's concern.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct Transaction {
    pub rlp: Bytes,
}

/// RLP: `RLP_LIST[header, [transactions], [ommers]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbftBlock {
    pub header: IbftBlockHeader,
    pub body_transactions: Vec<Transaction>,
    pub body_ommers: Vec<IbftBlockHeader>,
}

impl IbftBlock {
    pub fn new(header: IbftBlockHeader, transactions: Vec<Transaction>, ommers: Vec<IbftBlockHeader>) -> Self {
        Self { header, body_transactions: transactions, body_ommers: ommers }
    }

    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    pub fn number(&self) -> u64 {
        self.header.number
    }

    fn rlp_payload_length(&self) -> usize {
        self.header.length() + self.body_transactions.length() + self.body_ommers.length()
    }
}

impl Encodable for IbftBlock {
    fn encode(&self, out: &mut dyn BufMut) {
        RlpHeader { list: true, payload_length: self.rlp_payload_length() }.encode(out);
        self.header.encode(out);
        self.body_transactions.encode(out);
        self.body_ommers.encode(out);
    }

    fn length(&self) -> usize {
        let payload_len = self.rlp_payload_length();
        RlpHeader { list: true, payload_length: payload_len }.length() + payload_len
    }
}

impl Decodable for IbftBlock {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let rlp_header = RlpHeader::decode(buf)?;
        if !rlp_header.list {
            return Err(RlpError::Custom("IbftBlock RLP must be a list"));
        }
        let remaining_len_before = buf.len();

        let header = IbftBlockHeader::decode(buf)?;
        let body_transactions = Vec::<Transaction>::decode(buf)?;
        let body_ommers = Vec::<IbftBlockHeader>::decode(buf)?;

        if remaining_len_before - buf.len() != rlp_header.payload_length {
            return Err(RlpError::UnexpectedLength);
        }
        Ok(Self { header, body_transactions, body_ommers })
    }
}
